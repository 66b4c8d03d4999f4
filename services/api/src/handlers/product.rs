use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use catalog_auth_types::identity::BearerIdentity;
use catalog_domain::id::ProductId;
use catalog_domain::owned::OwnedRecord;

use crate::domain::types::{Product, ProductDraft, ProductPatch};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::owned::{
    CreateOwnedUseCase, DeleteOwnedUseCase, GetOwnedUseCase, ListOwnedUseCase, UpdateOwnedUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub user_id: String,
    #[serde(serialize_with = "catalog_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "catalog_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            description: product.description,
            price: product.price,
            user_id: product.owner_id.to_string(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ProductEnvelope {
    pub status: &'static str,
    pub product: ProductResponse,
}

impl ProductEnvelope {
    fn success(product: Product) -> Self {
        Self {
            status: "success",
            product: product.into(),
        }
    }
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub status: &'static str,
    pub results: usize,
    pub products: Vec<ProductResponse>,
}

/// A malformed id cannot name an existing product.
fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(Product::RESOURCE))
}

// ── GET /api/products ────────────────────────────────────────────────────────

pub async fn list_products(
    identity: BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let usecase = ListOwnedUseCase {
        store: state.product_repo(),
    };
    let products: Vec<ProductResponse> = usecase
        .execute(identity.user_id)
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();
    Ok(Json(ProductListResponse {
        status: "success",
        results: products.len(),
        products,
    }))
}

// ── POST /api/products ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
}

pub async fn create_product(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductEnvelope>), ApiError> {
    let usecase = CreateOwnedUseCase {
        store: state.product_repo(),
    };
    let product = usecase
        .execute(
            identity.user_id,
            ProductDraft {
                name: body.name,
                description: body.description,
                price: body.price,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ProductEnvelope::success(product))))
}

// ── GET /api/products/{id} ───────────────────────────────────────────────────

pub async fn get_product(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductEnvelope>, ApiError> {
    let id = parse_product_id(&id)?;
    let usecase = GetOwnedUseCase {
        store: state.product_repo(),
    };
    let product = usecase.execute(identity.user_id, id).await?;
    Ok(Json(ProductEnvelope::success(product)))
}

// ── PATCH /api/products/{id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

pub async fn update_product(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductEnvelope>, ApiError> {
    let id = parse_product_id(&id)?;
    let usecase = UpdateOwnedUseCase {
        store: state.product_repo(),
    };
    let product = usecase
        .execute(
            identity.user_id,
            id,
            ProductPatch {
                name: body.name,
                description: body.description,
                price: body.price,
            },
        )
        .await?;
    Ok(Json(ProductEnvelope::success(product)))
}

// ── DELETE /api/products/{id} ────────────────────────────────────────────────

pub async fn delete_product(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_product_id(&id)?;
    let usecase = DeleteOwnedUseCase {
        store: state.product_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
