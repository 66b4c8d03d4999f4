use catalog_api::domain::types::{Product, ProductDraft, ProductPatch};
use catalog_api::error::ApiError;
use catalog_api::usecase::owned::{
    CreateOwnedUseCase, DeleteOwnedUseCase, GetOwnedUseCase, ListOwnedUseCase, UpdateOwnedUseCase,
};
use catalog_domain::id::{ProductId, UserId};

use crate::helpers::MemoryOwnedRepository;

fn chair() -> ProductDraft {
    ProductDraft {
        name: "Chair".to_owned(),
        description: "Oak dining chair".to_owned(),
        price: 50.0,
    }
}

async fn seed(store: &MemoryOwnedRepository<Product>, owner: UserId) -> Product {
    CreateOwnedUseCase {
        store: store.clone(),
    }
    .execute(owner, chair())
    .await
    .unwrap()
}

// ── CreateOwnedUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_stamp_creator_as_owner() {
    let store = MemoryOwnedRepository::<Product>::empty();
    let owner = UserId::generate();

    let product = seed(&store, owner).await;

    assert_eq!(product.owner_id, owner);
    assert_eq!(product.created_at, product.updated_at);
    assert_eq!(store.records_handle().lock().unwrap().len(), 1);
}

// ── ListOwnedUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_callers_records() {
    let store = MemoryOwnedRepository::<Product>::empty();
    let alice = UserId::generate();
    let bob = UserId::generate();
    seed(&store, alice).await;
    seed(&store, alice).await;
    seed(&store, bob).await;

    let list = ListOwnedUseCase {
        store: store.clone(),
    };
    assert_eq!(list.execute(alice).await.unwrap().len(), 2);
    assert_eq!(list.execute(bob).await.unwrap().len(), 1);
    assert!(list.execute(UserId::generate()).await.unwrap().is_empty());
}

// ── cross-owner access ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_foreign_record_exactly_like_missing_one() {
    let store = MemoryOwnedRepository::<Product>::empty();
    let owner = UserId::generate();
    let intruder = UserId::generate();
    let product = seed(&store, owner).await;

    let get = GetOwnedUseCase {
        store: store.clone(),
    };
    let foreign = get.execute(intruder, product.id).await.unwrap_err();
    let missing = get.execute(owner, ProductId::generate()).await.unwrap_err();

    assert!(matches!(foreign, ApiError::NotFound("Product")));
    assert_eq!(foreign.to_string(), missing.to_string());
    assert_eq!(foreign.kind(), missing.kind());
}

#[tokio::test]
async fn should_refuse_foreign_update_and_leave_record_untouched() {
    let store = MemoryOwnedRepository::<Product>::empty();
    let owner = UserId::generate();
    let product = seed(&store, owner).await;

    let result = UpdateOwnedUseCase {
        store: store.clone(),
    }
    .execute(
        UserId::generate(),
        product.id,
        ProductPatch {
            price: Some(1.0),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound("Product"))));
    let records = store.records_handle();
    let stored = records.lock().unwrap();
    assert_eq!(stored[0].price, 50.0);
}

#[tokio::test]
async fn should_refuse_foreign_delete() {
    let store = MemoryOwnedRepository::<Product>::empty();
    let owner = UserId::generate();
    let product = seed(&store, owner).await;

    let result = DeleteOwnedUseCase {
        store: store.clone(),
    }
    .execute(UserId::generate(), product.id)
    .await;

    assert!(matches!(result, Err(ApiError::NotFound("Product"))));
    assert_eq!(store.records_handle().lock().unwrap().len(), 1);
}

// ── UpdateOwnedUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_partial_update_for_owner() {
    let store = MemoryOwnedRepository::<Product>::empty();
    let owner = UserId::generate();
    let product = seed(&store, owner).await;

    let updated = UpdateOwnedUseCase {
        store: store.clone(),
    }
    .execute(
        owner,
        product.id,
        ProductPatch {
            name: Some("Armchair".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Armchair");
    assert_eq!(updated.description, product.description);
    assert_eq!(updated.price, product.price);
    assert_eq!(updated.owner_id, owner);
    assert!(updated.updated_at >= product.updated_at);
}

// ── DeleteOwnedUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_not_found_on_second_delete() {
    let store = MemoryOwnedRepository::<Product>::empty();
    let owner = UserId::generate();
    let product = seed(&store, owner).await;
    let delete = DeleteOwnedUseCase {
        store: store.clone(),
    };

    delete.execute(owner, product.id).await.unwrap();
    let second = delete.execute(owner, product.id).await;

    assert!(matches!(second, Err(ApiError::NotFound("Product"))));
    assert!(store.records_handle().lock().unwrap().is_empty());
}
