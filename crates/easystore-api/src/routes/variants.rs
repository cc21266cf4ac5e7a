//! Product variant and stock routes (auth and outlet scope required)
//!
//! Variants are addressed through their product, and the product through
//! the scoped outlet, so a variant of another outlet is never visible.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use easystore_db::{Product, ProductVariant, UpdateProductVariant};
use tracing::info;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::tenant::OutletScope;

use super::products::new_variant;
use super::types::{
    StockRequest, StockResult, VariantRequest, VariantResult, VariantsResult, non_empty,
};

async fn scoped_product(
    state: &AppState,
    scope: &OutletScope,
    product_id: i64,
) -> Result<Product, ApiError> {
    state
        .db
        .get_product(scope.outlet_id, product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))
}

async fn scoped_variant(
    state: &AppState,
    scope: &OutletScope,
    product_id: i64,
    variant_id: i64,
) -> Result<ProductVariant, ApiError> {
    let product = scoped_product(state, scope, product_id).await?;
    state
        .db
        .get_variant(product.id, variant_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product variant"))
}

// ==================== Variant Routes ====================

/// POST /api/v1/outlet/{outlet_id}/product/{product_id}/product-variant
async fn create_variant(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id)): Path<(String, i64)>,
    Json(request): Json<VariantRequest>,
) -> Result<ApiResponse<VariantResult>, ApiError> {
    let variant = new_variant(&request)?;
    let product = scoped_product(&state, &scope, product_id).await?;

    let variant = state.db.insert_variant(product.id, variant).await?;

    info!("Product {}: created variant {}", product.id, variant.id);

    Ok(ApiResponse::created(
        "Product variant created successfully",
        VariantResult { variant },
    ))
}

/// GET /api/v1/outlet/{outlet_id}/product/{product_id}/product-variant
async fn list_variants(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id)): Path<(String, i64)>,
) -> Result<ApiResponse<VariantsResult>, ApiError> {
    let product = scoped_product(&state, &scope, product_id).await?;
    let variants = state.db.list_variants(product.id).await?;

    Ok(ApiResponse::ok(
        "Product variants fetched successfully",
        VariantsResult { variants },
    ))
}

/// GET /api/v1/outlet/{outlet_id}/product/{product_id}/product-variant/{variant_id}
async fn get_variant(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id, variant_id)): Path<(String, i64, i64)>,
) -> Result<ApiResponse<VariantResult>, ApiError> {
    let variant = scoped_variant(&state, &scope, product_id, variant_id).await?;

    Ok(ApiResponse::ok(
        "Product variant fetched successfully",
        VariantResult { variant },
    ))
}

/// PUT /api/v1/outlet/{outlet_id}/product/{product_id}/product-variant/{variant_id}
async fn update_variant(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id, variant_id)): Path<(String, i64, i64)>,
    Json(request): Json<VariantRequest>,
) -> Result<ApiResponse<VariantResult>, ApiError> {
    let product = scoped_product(&state, &scope, product_id).await?;

    let update = UpdateProductVariant {
        name: non_empty(request.name),
        selling_price: request.selling_price,
        mrp: request.mrp,
    };

    let variant = state
        .db
        .update_variant(product.id, variant_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Product variant"))?;

    info!("Product {}: updated variant {}", product.id, variant.id);

    Ok(ApiResponse::ok(
        "Product variant updated successfully",
        VariantResult { variant },
    ))
}

// ==================== Stock Routes ====================

/// GET .../product-variant/{variant_id}/stock
async fn get_stock(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id, variant_id)): Path<(String, i64, i64)>,
) -> Result<ApiResponse<StockResult>, ApiError> {
    let variant = scoped_variant(&state, &scope, product_id, variant_id).await?;

    // No stock row yet means nothing on hand
    let quantity = state
        .db
        .get_stock(variant.id)
        .await?
        .map(|stock| stock.quantity)
        .unwrap_or(0);

    Ok(ApiResponse::ok(
        "Stock fetched successfully",
        StockResult {
            variant_id: variant.id,
            quantity,
        },
    ))
}

/// PUT .../product-variant/{variant_id}/stock
async fn set_stock(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id, variant_id)): Path<(String, i64, i64)>,
    Json(request): Json<StockRequest>,
) -> Result<ApiResponse<StockResult>, ApiError> {
    let quantity = request
        .quantity
        .ok_or_else(|| ApiError::bad_request("Quantity is required"))?;
    if quantity < 0 {
        return Err(ApiError::bad_request("Quantity must not be negative"));
    }

    let variant = scoped_variant(&state, &scope, product_id, variant_id).await?;
    let stock = state.db.set_stock(variant.id, quantity).await?;

    info!("Variant {}: stock set to {}", stock.variant_id, stock.quantity);

    Ok(ApiResponse::ok(
        "Stock updated successfully",
        StockResult {
            variant_id: stock.variant_id,
            quantity: stock.quantity,
        },
    ))
}

/// Create variant and stock routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/outlet/{outlet_id}/product/{product_id}/product-variant",
            post(create_variant).get(list_variants),
        )
        .route(
            "/outlet/{outlet_id}/product/{product_id}/product-variant/{variant_id}",
            get(get_variant).put(update_variant),
        )
        .route(
            "/outlet/{outlet_id}/product/{product_id}/product-variant/{variant_id}/stock",
            get(get_stock).put(set_stock),
        )
}
