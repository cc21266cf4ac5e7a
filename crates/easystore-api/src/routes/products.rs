//! Product routes (auth and outlet scope required)

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chrono::NaiveDate;
use easystore_db::utils::parse_date;
use easystore_db::{NewProduct, NewProductVariant, UpdateProduct};
use tracing::info;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::tenant::OutletScope;

use super::types::{
    CreateProductRequest, ProductResult, ProductsResult, UpdateProductRequest, VariantRequest,
    non_empty, present,
};

/// Status given to products created without one
const DEFAULT_PRODUCT_STATUS: &str = "active";

fn date_field(value: &Option<String>, name: &str) -> Result<Option<NaiveDate>, ApiError> {
    present(value)
        .map(|raw| {
            parse_date(raw).ok_or_else(|| {
                ApiError::bad_request(format!("{} must be a date in YYYY-MM-DD format", name))
            })
        })
        .transpose()
}

/// Turn a variant payload into an insertable variant
pub(super) fn new_variant(request: &VariantRequest) -> Result<NewProductVariant, ApiError> {
    match (present(&request.name), request.selling_price, request.mrp) {
        (Some(name), Some(selling_price), Some(mrp)) => Ok(NewProductVariant {
            name: name.to_string(),
            selling_price,
            mrp,
        }),
        _ => Err(ApiError::bad_request(
            "Variant name, selling price and MRP are required",
        )),
    }
}

/// Ensure `category_id` names a category of the scoped outlet
async fn require_category(
    state: &AppState,
    scope: &OutletScope,
    category_id: i64,
) -> Result<(), ApiError> {
    state
        .db
        .get_category(scope.outlet_id, category_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("Category"))
}

/// POST /api/v1/outlet/{outlet_id}/product
async fn create_product(
    scope: OutletScope,
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<ApiResponse<ProductResult>, ApiError> {
    let (Some(category_id), Some(title), Some(description)) = (
        request.category_id,
        present(&request.title),
        present(&request.description),
    ) else {
        return Err(ApiError::bad_request(
            "Category, title and description are required",
        ));
    };

    let manufactured_date = date_field(&request.manufactured_date, "Manufactured date")?;
    let expiry_date = date_field(&request.expiry_date, "Expiry date")?;
    let variants = request
        .variants
        .iter()
        .map(new_variant)
        .collect::<Result<Vec<_>, _>>()?;

    require_category(&state, &scope, category_id).await?;

    let product = NewProduct {
        outlet_id: scope.outlet_id,
        category_id,
        title: title.to_string(),
        description: description.to_string(),
        manufactured_date,
        expiry_date,
        status: present(&request.status)
            .unwrap_or(DEFAULT_PRODUCT_STATUS)
            .to_string(),
    };

    let (product, variants) = state
        .db
        .create_product_with_variants(product, variants)
        .await?;

    info!(
        "Outlet {}: created product {} with {} variants",
        scope.outlet_id,
        product.id,
        variants.len()
    );

    Ok(ApiResponse::created(
        "Product created successfully",
        ProductResult { product, variants },
    ))
}

/// GET /api/v1/outlet/{outlet_id}/product
async fn list_products(
    scope: OutletScope,
    State(state): State<AppState>,
) -> Result<ApiResponse<ProductsResult>, ApiError> {
    let products = state.db.list_products(scope.outlet_id).await?;

    Ok(ApiResponse::ok(
        "Products fetched successfully",
        ProductsResult { products },
    ))
}

/// GET /api/v1/outlet/{outlet_id}/product/{product_id}
async fn get_product(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id)): Path<(String, i64)>,
) -> Result<ApiResponse<ProductResult>, ApiError> {
    let product = state
        .db
        .get_product(scope.outlet_id, product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    let variants = state.db.list_variants(product.id).await?;

    Ok(ApiResponse::ok(
        "Product fetched successfully",
        ProductResult { product, variants },
    ))
}

/// PUT /api/v1/outlet/{outlet_id}/product/{product_id}
async fn update_product(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, product_id)): Path<(String, i64)>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<ApiResponse<ProductResult>, ApiError> {
    if let Some(category_id) = request.category_id {
        require_category(&state, &scope, category_id).await?;
    }

    let update = UpdateProduct {
        category_id: request.category_id,
        manufactured_date: date_field(&request.manufactured_date, "Manufactured date")?,
        expiry_date: date_field(&request.expiry_date, "Expiry date")?,
        title: non_empty(request.title),
        description: non_empty(request.description),
        status: non_empty(request.status),
    };

    let product = state
        .db
        .update_product(scope.outlet_id, product_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    let variants = state.db.list_variants(product.id).await?;

    info!("Outlet {}: updated product {}", scope.outlet_id, product.id);

    Ok(ApiResponse::ok(
        "Product updated successfully",
        ProductResult { product, variants },
    ))
}

/// Create product routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/outlet/{outlet_id}/product",
            post(create_product).get(list_products),
        )
        .route(
            "/outlet/{outlet_id}/product/{product_id}",
            get(get_product).put(update_product),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_requires_all_fields() {
        let complete = VariantRequest {
            name: Some("500g".to_string()),
            selling_price: Some(45.0),
            mrp: Some(50.0),
        };
        let variant = new_variant(&complete).unwrap();
        assert_eq!(variant.name, "500g");
        assert_eq!(variant.mrp, 50.0);

        let unnamed = VariantRequest {
            name: Some(" ".to_string()),
            ..complete.clone()
        };
        assert!(new_variant(&unnamed).is_err());

        let unpriced = VariantRequest {
            mrp: None,
            ..complete
        };
        assert!(new_variant(&unpriced).is_err());
    }

    #[test]
    fn test_date_field() {
        assert_eq!(date_field(&None, "Expiry date").unwrap(), None);
        assert_eq!(
            date_field(&Some("2025-06-30".to_string()), "Expiry date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        let err = date_field(&Some("30/06/2025".to_string()), "Expiry date").unwrap_err();
        assert_eq!(err.to_string(), "Expiry date must be a date in YYYY-MM-DD format");
    }
}
