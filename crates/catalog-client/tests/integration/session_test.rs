use catalog_client::error::SessionError;
use catalog_client::guard::{Navigation, Route};
use catalog_client::session::{
    OWNER_FIELD, PRODUCTS_COLLECTION, ProfileUpdate, Registration, SessionPhase, USERS_COLLECTION,
};
use catalog_testing::provider::{MemoryDocumentStore, MemoryIdentityProvider};
use serde_json::json;

use crate::helpers::{PASSWORD, start, start_with_store, until};

fn registration(email: &str) -> Registration {
    Registration {
        email: email.to_owned(),
        password: PASSWORD.to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone: None,
    }
}

#[tokio::test]
async fn should_let_navigation_through_until_first_event() {
    let h = start(MemoryIdentityProvider::silent());
    tokio::task::yield_now().await;

    assert_eq!(h.session.snapshot().phase(), SessionPhase::Uninitialized);
    assert_eq!(h.session.before_navigate(Route::Profile), Navigation::Proceed);

    h.provider.announce();
    let state = h.session.wait_ready().await;
    assert_eq!(state.phase(), SessionPhase::SignedOut);
    assert_eq!(
        h.session.before_navigate(Route::Profile),
        Navigation::Redirect(Route::Auth)
    );
}

#[tokio::test]
async fn should_stay_ready_after_sign_out() {
    let h = start(MemoryIdentityProvider::new().signed_in_as("a@x.com", PASSWORD));
    let state = h.session.wait_ready().await;
    assert_eq!(state.phase(), SessionPhase::SignedIn);

    h.session.logout().await.unwrap();
    let state = until(&h.session, |s| s.identity.is_none()).await;
    assert!(state.ready);
    assert_eq!(h.session.before_navigate(Route::Auth), Navigation::Proceed);
}

#[tokio::test]
async fn should_restore_basic_profile_when_document_missing() {
    let h = start(MemoryIdentityProvider::new().signed_in_as("a@x.com", PASSWORD));
    let state = h.session.wait_ready().await;

    let profile = state.identity.unwrap();
    assert_eq!(profile.email.as_deref(), Some("a@x.com"));
    assert_eq!(profile.first_name, "");
}

#[tokio::test]
async fn should_fall_back_to_basic_profile_when_store_fails() {
    let store = MemoryDocumentStore::new();
    store.fail_with(Some(catalog_client::error::ProviderError::new(
        "unavailable",
        "store offline",
    )));
    let h = start_with_store(
        MemoryIdentityProvider::new().signed_in_as("a@x.com", PASSWORD),
        store,
    );

    let state = h.session.wait_ready().await;
    assert_eq!(state.phase(), SessionPhase::SignedIn);
    assert_eq!(state.identity.unwrap().last_name, "");
}

#[tokio::test]
async fn should_register_and_store_profile_document() {
    let h = start(MemoryIdentityProvider::new());
    h.session.wait_ready().await;

    let profile = h.session.register(registration("ada@x.com")).await.unwrap();
    assert_eq!(profile.first_name, "Ada");

    let doc = h.store.document(USERS_COLLECTION, &profile.uid).unwrap();
    assert_eq!(doc["firstName"], "Ada");
    assert_eq!(doc["email"], "ada@x.com");
    assert!(doc.get("phone").is_none());

    let state = until(&h.session, |s| s.identity.as_ref().is_some_and(|p| p.last_name == "Lovelace")).await;
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn should_record_error_message_on_failed_login() {
    let h = start(MemoryIdentityProvider::new().with_account("a@x.com", PASSWORD));
    h.session.wait_ready().await;

    let err = h.session.login("a@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, SessionError::Provider(ref e) if e.code == "auth/wrong-password"));

    let state = h.session.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("The password is invalid"));
    assert!(!state.is_authenticated());

    h.session.login("a@x.com", PASSWORD).await.unwrap();
    let state = until(&h.session, |s| s.is_authenticated()).await;
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn should_load_stored_profile_on_login() {
    let provider = MemoryIdentityProvider::new().with_account("a@x.com", PASSWORD);
    let store = MemoryDocumentStore::new();
    store.insert(
        USERS_COLLECTION,
        "uid-1",
        json!({ "email": "a@x.com", "firstName": "Grace", "lastName": "Hopper" }),
    );
    let h = start_with_store(provider, store);
    h.session.wait_ready().await;

    h.session.login("a@x.com", PASSWORD).await.unwrap();
    let state = until(&h.session, |s| s.is_authenticated()).await;
    assert_eq!(state.identity.unwrap().first_name, "Grace");
    assert_eq!(
        h.session.before_navigate(Route::Auth),
        Navigation::Redirect(Route::Home)
    );
}

#[tokio::test]
async fn should_require_identity_for_account_operations() {
    let h = start(MemoryIdentityProvider::new());
    h.session.wait_ready().await;

    let err = h
        .session
        .update_profile(ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotAuthenticated));
    assert_eq!(err.to_string(), "No authenticated user");

    assert!(matches!(
        h.session.change_password(PASSWORD, "next").await.unwrap_err(),
        SessionError::NotAuthenticated
    ));
    assert!(matches!(
        h.session.delete_account(PASSWORD).await.unwrap_err(),
        SessionError::NotAuthenticated
    ));
    assert_eq!(h.session.fetch_profile().await.unwrap(), None);
}

#[tokio::test]
async fn should_merge_profile_update() {
    let h = start(MemoryIdentityProvider::new());
    h.session.wait_ready().await;
    let profile = h.session.register(registration("ada@x.com")).await.unwrap();
    until(&h.session, |s| s.is_authenticated()).await;

    let updated = h
        .session
        .update_profile(ProfileUpdate {
            phone: Some("555-0100".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));

    let doc = h.store.document(USERS_COLLECTION, &profile.uid).unwrap();
    assert_eq!(doc["phone"], "555-0100");
    assert_eq!(doc["lastName"], "Lovelace");

    let fetched = h.session.fetch_profile().await.unwrap().unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn should_reject_password_change_with_wrong_current_password() {
    let h = start(MemoryIdentityProvider::new().signed_in_as("a@x.com", PASSWORD));
    h.session.wait_ready().await;

    let err = h.session.change_password("wrong", "next-pass").await.unwrap_err();
    assert!(matches!(err, SessionError::ReauthenticationFailed(_)));
    assert_eq!(h.provider.password_of("a@x.com").as_deref(), Some(PASSWORD));

    h.session.change_password(PASSWORD, "next-pass").await.unwrap();
    assert_eq!(h.provider.password_of("a@x.com").as_deref(), Some("next-pass"));
}

#[tokio::test]
async fn should_delete_only_owned_products_with_account() {
    let h = start(MemoryIdentityProvider::new().with_account("other@x.com", PASSWORD));
    h.session.wait_ready().await;
    let profile = h.session.register(registration("ada@x.com")).await.unwrap();
    until(&h.session, |s| s.is_authenticated()).await;

    h.store.insert(PRODUCTS_COLLECTION, "p1", json!({ OWNER_FIELD: profile.uid, "name": "Lamp" }));
    h.store.insert(PRODUCTS_COLLECTION, "p2", json!({ OWNER_FIELD: profile.uid, "name": "Desk" }));
    h.store.insert(PRODUCTS_COLLECTION, "p3", json!({ OWNER_FIELD: "uid-1", "name": "Chair" }));

    let err = h.session.delete_account("wrong").await.unwrap_err();
    assert!(matches!(err, SessionError::ReauthenticationFailed(_)));
    assert_eq!(h.store.ids(PRODUCTS_COLLECTION).len(), 3);

    h.session.delete_account(PASSWORD).await.unwrap();
    assert_eq!(h.store.ids(PRODUCTS_COLLECTION), vec!["p3".to_owned()]);
    assert!(h.store.document(USERS_COLLECTION, &profile.uid).is_none());
    assert_eq!(h.provider.account_count(), 1);

    let state = until(&h.session, |s| s.identity.is_none()).await;
    assert!(state.ready);
}
