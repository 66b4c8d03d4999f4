use chrono::{DateTime, Utc};

use catalog_domain::id::{ProductId, UserId};
use catalog_domain::owned::OwnedRecord;

/// Registered account. `password_hash` stays inside the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields a user may change after registration.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone.is_none()
    }
}

/// A catalog product, visible only to the user that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl OwnedRecord for Product {
    type Id = ProductId;
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const RESOURCE: &'static str = "Product";

    fn id(&self) -> ProductId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn new_id() -> ProductId {
        ProductId::generate()
    }

    fn from_draft(id: ProductId, owner: UserId, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: owner,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = now;
    }
}

/// A design-news headline served by `GET /api/news`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: String,
}
