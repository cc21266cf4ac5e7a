//! Database models

use crate::utils::{parse_date, parse_datetime_or_now};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidRole(String),
    InvalidStatus(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRole(s) => write!(f, "Invalid role: {}", s),
            ParseError::InvalidStatus(s) => write!(f, "Invalid status: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Employee role, also used for the role an employee holds within an outlet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            _ => Err(ParseError::InvalidRole(s.to_string())),
        }
    }
}

/// Lifecycle status of an employee or outlet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }

    /// Read a stored status; anything unrecognised counts as inactive
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(Status::Inactive)
    }
}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            _ => Err(ParseError::InvalidStatus(s.to_string())),
        }
    }
}

// ==================== Employees ====================

/// Employee model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New employee (for insertion)
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: Status,
}

/// Update employee (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub status: Option<Status>,
}

// ==================== Outlets ====================

/// Outlet (store) model; the tenant unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outlet {
    pub id: i64,
    /// Random public identifier
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub manager_id: i64,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New outlet (for insertion)
#[derive(Debug, Clone)]
pub struct NewOutlet {
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub manager_id: i64,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub status: Status,
}

/// Update outlet (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateOutlet {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub status: Option<Status>,
}

/// Membership of an employee in an outlet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutletEmployee {
    pub outlet_id: i64,
    pub employee_id: i64,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Service-area pincode of an outlet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePincode {
    pub id: i64,
    pub outlet_id: i64,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
}

// ==================== Catalog ====================

/// Product category, owned by an outlet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: i64,
    pub outlet_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New product category (for insertion)
#[derive(Debug, Clone)]
pub struct NewProductCategory {
    pub outlet_id: i64,
    pub title: String,
    pub description: String,
}

/// Update product category (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateProductCategory {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub outlet_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub manufactured_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New product (for insertion)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub outlet_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub manufactured_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: String,
}

/// Update product (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub manufactured_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Product variant (size, pack, flavour, ...) with its prices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub selling_price: f64,
    pub mrp: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New product variant (for insertion)
#[derive(Debug, Clone)]
pub struct NewProductVariant {
    pub name: String,
    pub selling_price: f64,
    pub mrp: f64,
}

/// Update product variant (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateProductVariant {
    pub name: Option<String>,
    pub selling_price: Option<f64>,
    pub mrp: Option<f64>,
}

/// Stock level of a variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub variant_id: i64,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for Employee {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_str: String = row.try_get("role")?;
        let status_str: String = row.try_get("status")?;
        Ok(Employee {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: Role::from_str(&role_str).unwrap_or_default(),
            status: Status::from_stored(&status_str),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Outlet {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let status_str: String = row.try_get("status")?;
        Ok(Outlet {
            id: row.try_get("id")?,
            identifier: row.try_get("identifier")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            manager_id: row.try_get("manager_id")?,
            location: row.try_get("location")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            website: row.try_get("website")?,
            status: Status::from_stored(&status_str),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for OutletEmployee {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_str: String = row.try_get("role")?;
        Ok(OutletEmployee {
            outlet_id: row.try_get("outlet_id")?,
            employee_id: row.try_get("employee_id")?,
            role: Role::from_str(&role_str).unwrap_or_default(),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for ServicePincode {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(ServicePincode {
            id: row.try_get("id")?,
            outlet_id: row.try_get("outlet_id")?,
            pincode: row.try_get("pincode")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for ProductCategory {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(ProductCategory {
            id: row.try_get("id")?,
            outlet_id: row.try_get("outlet_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Product {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let manufactured: Option<String> = row.try_get("manufactured_date")?;
        let expiry: Option<String> = row.try_get("expiry_date")?;
        Ok(Product {
            id: row.try_get("id")?,
            outlet_id: row.try_get("outlet_id")?,
            category_id: row.try_get("category_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            manufactured_date: manufactured.as_deref().and_then(parse_date),
            expiry_date: expiry.as_deref().and_then(parse_date),
            status: row.try_get("status")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for ProductVariant {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(ProductVariant {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            name: row.try_get("name")?,
            selling_price: row.try_get("selling_price")?,
            mrp: row.try_get("mrp")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Stock {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Stock {
            variant_id: row.try_get("variant_id")?,
            quantity: row.try_get("quantity")?,
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
