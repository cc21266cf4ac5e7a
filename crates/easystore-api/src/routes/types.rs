//! Request/Response DTOs

use easystore_db::{
    Employee, Outlet, OutletEmployee, Product, ProductCategory, ProductVariant, ServicePincode,
};
use serde::{Deserialize, Serialize};

/// Treat a blank string as an absent field
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Owned form of [`present`], for partial updates
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

// ==================== Employee Types ====================

/// Create employee request
#[derive(Deserialize, Default)]
pub struct CreateEmployeeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Update employee request
#[derive(Deserialize, Default)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct EmployeeResult {
    pub employee: Employee,
}

#[derive(Serialize)]
pub struct EmployeesResult {
    pub employees: Vec<Employee>,
}

// ==================== Outlet Types ====================

/// Create outlet request; every field is required
#[derive(Deserialize, Default)]
pub struct CreateOutletRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
}

/// Update outlet request; at least one field is required
#[derive(Deserialize, Default)]
pub struct UpdateOutletRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
}

impl UpdateOutletRequest {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.description,
            &self.location,
            &self.phone,
            &self.email,
            &self.website,
            &self.status,
        ]
        .iter()
        .all(|field| present(field).is_none())
    }
}

#[derive(Deserialize)]
pub struct AssignManagerRequest {
    pub employee_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct AddOutletEmployeeRequest {
    pub employee_id: Option<i64>,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignPincodesRequest {
    #[serde(default)]
    pub pincodes: Vec<String>,
}

#[derive(Serialize)]
pub struct OutletResult {
    pub outlet: Outlet,
}

#[derive(Serialize)]
pub struct OutletsResult {
    pub outlets: Vec<Outlet>,
}

#[derive(Serialize)]
pub struct ManagerResult {
    pub outlet: Outlet,
    pub manager: Employee,
}

#[derive(Serialize)]
pub struct MembershipResult {
    pub membership: OutletEmployee,
}

#[derive(Serialize)]
pub struct MembersResult {
    pub employees: Vec<OutletEmployee>,
}

/// Per-pincode outcome of a bulk assignment
#[derive(Serialize, Default)]
pub struct PincodeAssignment {
    pub success: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Serialize)]
pub struct PincodesResult {
    pub pincodes: Vec<ServicePincode>,
}

// ==================== Catalog Types ====================

#[derive(Deserialize, Default)]
pub struct CategoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryResult {
    pub category: ProductCategory,
}

#[derive(Serialize)]
pub struct CategoriesResult {
    pub categories: Vec<ProductCategory>,
}

/// Create product request, with the variants inserted alongside it
#[derive(Deserialize, Default)]
pub struct CreateProductRequest {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub manufactured_date: Option<String>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantRequest>,
}

#[derive(Deserialize, Default)]
pub struct UpdateProductRequest {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub manufactured_date: Option<String>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize, Default, Clone)]
pub struct VariantRequest {
    pub name: Option<String>,
    pub selling_price: Option<f64>,
    pub mrp: Option<f64>,
}

#[derive(Serialize)]
pub struct ProductResult {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}

#[derive(Serialize)]
pub struct ProductsResult {
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct VariantResult {
    pub variant: ProductVariant,
}

#[derive(Serialize)]
pub struct VariantsResult {
    pub variants: Vec<ProductVariant>,
}

// ==================== Stock Types ====================

#[derive(Deserialize)]
pub struct StockRequest {
    pub quantity: Option<i64>,
}

#[derive(Serialize)]
pub struct StockResult {
    pub variant_id: i64,
    pub quantity: i64,
}
