use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel as _, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};

use catalog_api_schema::{products, users};
use catalog_domain::id::{ProductId, UserId};
use catalog_domain::owned::OwnedRecord as _;

use crate::domain::repository::{OwnedRepository, UserRepository};
use crate::domain::types::{Product, ProductPatch, ProfilePatch, User};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id.0),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            phone: Set(user.phone.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            // Lost a race with a concurrent registration for the same email.
            Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::DuplicateEmail,
            _ => ApiError::Internal(anyhow::Error::new(e).context("create user")),
        })?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<User>, ApiError> {
        let Some(model) = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user for profile update")?
        else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        if let Some(first_name) = &patch.first_name {
            am.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            am.last_name = Set(last_name.clone());
        }
        if let Some(phone) = &patch.phone {
            am.phone = Set(Some(phone.clone()));
        }
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.db).await.context("update user profile")?;
        Ok(Some(user_from_model(updated)))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl OwnedRepository for DbProductRepository {
    type Record = Product;

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Product>, ApiError> {
        let models = products::Entity::find()
            .filter(products::Column::UserId.eq(owner.0))
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list products by owner")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_owned(&self, owner: UserId, id: ProductId) -> Result<Option<Product>, ApiError> {
        let model = products::Entity::find_by_id(id.0)
            .filter(products::Column::UserId.eq(owner.0))
            .one(&self.db)
            .await
            .context("find owned product")?;
        Ok(model.map(product_from_model))
    }

    async fn insert(&self, product: &Product) -> Result<(), ApiError> {
        products::ActiveModel {
            id: Set(product.id.0),
            user_id: Set(product.owner_id.0),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert product")?;
        Ok(())
    }

    async fn update_owned(
        &self,
        owner: UserId,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, ApiError> {
        let patch = patch.clone();
        let updated = self
            .db
            .transaction::<_, Option<Product>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) = products::Entity::find_by_id(id.0)
                        .filter(products::Column::UserId.eq(owner.0))
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };

                    let mut product = product_from_model(model.clone());
                    product.apply_patch(&patch, Utc::now());

                    let mut am = model.into_active_model();
                    am.name = Set(product.name);
                    am.description = Set(product.description);
                    am.price = Set(product.price);
                    am.updated_at = Set(product.updated_at);
                    let saved = am.update(txn).await?;
                    Ok(Some(product_from_model(saved)))
                })
            })
            .await
            .context("update owned product")?;
        Ok(updated)
    }

    async fn delete_owned(&self, owner: UserId, id: ProductId) -> Result<bool, ApiError> {
        let result = products::Entity::delete_many()
            .filter(products::Column::Id.eq(id.0))
            .filter(products::Column::UserId.eq(owner.0))
            .exec(&self.db)
            .await
            .context("delete owned product")?;
        Ok(result.rows_affected > 0)
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: ProductId(model.id),
        owner_id: UserId(model.user_id),
        name: model.name,
        description: model.description,
        price: model.price,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
