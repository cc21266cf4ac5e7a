//! Database repository implementation

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbError;

// Submodules
mod catalog;
mod employees;
mod outlets;
mod stock;
mod uniqueness;

pub use uniqueness::UniqueField;

/// Database connection and operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        info!("Connecting to database: {}", database_url);

        let pool = SqlitePool::connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Get the underlying pool for advanced usage
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that the database answers queries
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DbError::Migration(e.to_string()))?;
        }

        info!("Database migrations completed");
        Ok(())
    }
}

/// Schema, applied in order on every start
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS outlets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        identifier TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        manager_id INTEGER NOT NULL REFERENCES employees(id),
        location TEXT NOT NULL,
        phone TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        website TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS outlet_employees (
        outlet_id INTEGER NOT NULL REFERENCES outlets(id) ON DELETE CASCADE,
        employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
        role TEXT NOT NULL,
        created_at TEXT NOT NULL,
        PRIMARY KEY (outlet_id, employee_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_outlet_employees_employee ON outlet_employees(employee_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS outlet_service_pincodes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        outlet_id INTEGER NOT NULL REFERENCES outlets(id) ON DELETE CASCADE,
        pincode TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        outlet_id INTEGER NOT NULL REFERENCES outlets(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        outlet_id INTEGER NOT NULL REFERENCES outlets(id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES product_categories(id),
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        manufactured_date TEXT,
        expiry_date TEXT,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_products_outlet ON products(outlet_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_variants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        name TEXT NOT NULL CHECK (length(name) > 0),
        selling_price REAL NOT NULL CHECK (selling_price >= 0),
        mrp REAL NOT NULL CHECK (mrp >= 0),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stocks (
        variant_id INTEGER PRIMARY KEY REFERENCES product_variants(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL CHECK (quantity >= 0),
        updated_at TEXT NOT NULL
    )
    "#,
];

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::Database;
    use crate::models::{NewEmployee, NewOutlet, Employee, Outlet, Role, Status};

    /// Fresh database in a temporary directory; keep the `TempDir` alive for the test
    pub async fn test_db() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        (db, dir)
    }

    pub async fn employee(db: &Database, name: &str, phone: &str, email: &str) -> Employee {
        db.insert_employee(NewEmployee {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Staff,
            status: Status::Active,
        })
        .await
        .unwrap()
    }

    pub async fn outlet(db: &Database, manager_id: i64, suffix: &str) -> Outlet {
        db.insert_outlet(NewOutlet {
            identifier: format!("outlet-{}", suffix),
            name: format!("Outlet {}", suffix),
            description: "Neighbourhood store".to_string(),
            manager_id,
            location: "Attingal, Kerala".to_string(),
            phone: format!("98765432{:0>2}", suffix),
            email: format!("outlet{}@example.com", suffix),
            website: format!("{}.example.com", suffix),
            status: Status::Active,
        })
        .await
        .unwrap()
    }
}
