//! Product category routes (auth and outlet scope required)

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use easystore_db::{NewProductCategory, UpdateProductCategory};
use tracing::info;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::tenant::OutletScope;

use super::types::{CategoriesResult, CategoryRequest, CategoryResult, non_empty, present};

/// POST /api/v1/outlet/{outlet_id}/product-category
async fn create_category(
    scope: OutletScope,
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<ApiResponse<CategoryResult>, ApiError> {
    let (Some(title), Some(description)) = (present(&request.title), present(&request.description))
    else {
        return Err(ApiError::bad_request(
            "Title and description should not be empty",
        ));
    };

    let category = state
        .db
        .insert_category(NewProductCategory {
            outlet_id: scope.outlet_id,
            title: title.to_string(),
            description: description.to_string(),
        })
        .await?;

    info!("Outlet {}: created category {}", scope.outlet_id, category.id);

    Ok(ApiResponse::created(
        "Category created successfully",
        CategoryResult { category },
    ))
}

/// GET /api/v1/outlet/{outlet_id}/product-category
async fn list_categories(
    scope: OutletScope,
    State(state): State<AppState>,
) -> Result<ApiResponse<CategoriesResult>, ApiError> {
    let categories = state.db.list_categories(scope.outlet_id).await?;

    Ok(ApiResponse::ok(
        "Categories fetched successfully",
        CategoriesResult { categories },
    ))
}

/// GET /api/v1/outlet/{outlet_id}/product-category/{category_id}
async fn get_category(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, category_id)): Path<(String, i64)>,
) -> Result<ApiResponse<CategoryResult>, ApiError> {
    let category = state
        .db
        .get_category(scope.outlet_id, category_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(ApiResponse::ok(
        "Category fetched successfully",
        CategoryResult { category },
    ))
}

/// PUT /api/v1/outlet/{outlet_id}/product-category/{category_id}
async fn update_category(
    scope: OutletScope,
    State(state): State<AppState>,
    Path((_, category_id)): Path<(String, i64)>,
    Json(request): Json<CategoryRequest>,
) -> Result<ApiResponse<CategoryResult>, ApiError> {
    let update = UpdateProductCategory {
        title: non_empty(request.title),
        description: non_empty(request.description),
    };

    let category = state
        .db
        .update_category(scope.outlet_id, category_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    info!("Outlet {}: updated category {}", scope.outlet_id, category.id);

    Ok(ApiResponse::ok(
        "Category updated successfully",
        CategoryResult { category },
    ))
}

/// Create product category routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/outlet/{outlet_id}/product-category",
            post(create_category).get(list_categories),
        )
        .route(
            "/outlet/{outlet_id}/product-category/{category_id}",
            get(get_category).put(update_category),
        )
}
