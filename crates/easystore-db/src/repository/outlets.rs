//! Outlet, membership and service-pincode operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewOutlet, Outlet, OutletEmployee, Role, ServicePincode, UpdateOutlet};
use crate::repository::Database;

const OUTLET_COLUMNS: &str = "id, identifier, name, description, manager_id, location, phone, email, website, status, created_at, updated_at";

impl Database {
    // ==================== Outlet Operations ====================

    /// Insert a new outlet; its manager becomes a member with the manager role
    /// in the same transaction.
    pub async fn insert_outlet(&self, outlet: NewOutlet) -> Result<Outlet, DbError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO outlets (identifier, name, description, manager_id, location, phone, email, website, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&outlet.identifier)
        .bind(&outlet.name)
        .bind(&outlet.description)
        .bind(outlet.manager_id)
        .bind(&outlet.location)
        .bind(&outlet.phone)
        .bind(&outlet.email)
        .bind(&outlet.website)
        .bind(outlet.status.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DbError::from_write(e, "Outlet"))?;

        let id: i64 = result.get("id");

        sqlx::query(
            r#"
            INSERT INTO outlet_employees (outlet_id, employee_id, role, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(outlet.manager_id)
        .bind(Role::Manager.as_str())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from_write(e, "Outlet membership"))?;

        tx.commit().await?;

        Ok(Outlet {
            id,
            identifier: outlet.identifier,
            name: outlet.name,
            description: outlet.description,
            manager_id: outlet.manager_id,
            location: outlet.location,
            phone: outlet.phone,
            email: outlet.email,
            website: outlet.website,
            status: outlet.status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an outlet by ID
    pub async fn get_outlet(&self, id: i64) -> Result<Option<Outlet>, DbError> {
        let sql = format!("SELECT {} FROM outlets WHERE id = ?", OUTLET_COLUMNS);
        let result = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Outlet::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all outlets
    pub async fn list_outlets(&self) -> Result<Vec<Outlet>, DbError> {
        let sql = format!("SELECT {} FROM outlets ORDER BY id", OUTLET_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| Outlet::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update; `None` when the outlet does not exist
    pub async fn update_outlet(
        &self,
        id: i64,
        update: UpdateOutlet,
    ) -> Result<Option<Outlet>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE outlets
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                location = COALESCE(?, location),
                phone = COALESCE(?, phone),
                email = COALESCE(?, email),
                website = COALESCE(?, website),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.name)
        .bind(update.description)
        .bind(update.location)
        .bind(update.phone)
        .bind(update.email)
        .bind(update.website)
        .bind(update.status.map(|s| s.as_str()))
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Outlet"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_outlet(id).await
    }

    /// Make `employee_id` the outlet's manager and give them the manager role
    pub async fn assign_outlet_manager(
        &self,
        outlet_id: i64,
        employee_id: i64,
    ) -> Result<Option<Outlet>, DbError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE outlets SET manager_id = ?, updated_at = ? WHERE id = ?")
            .bind(employee_id)
            .bind(now.to_rfc3339())
            .bind(outlet_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from_write(e, "Outlet"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        upsert_membership(&mut tx, outlet_id, employee_id, Role::Manager).await?;
        tx.commit().await?;

        self.get_outlet(outlet_id).await
    }

    // ==================== Membership Operations ====================

    /// Add an employee to an outlet, or change the role they hold there
    pub async fn add_outlet_employee(
        &self,
        outlet_id: i64,
        employee_id: i64,
        role: Role,
    ) -> Result<OutletEmployee, DbError> {
        let mut tx = self.pool.begin().await?;
        let membership = upsert_membership(&mut tx, outlet_id, employee_id, role).await?;
        tx.commit().await?;
        Ok(membership)
    }

    /// All outlet memberships held by an employee
    pub async fn list_memberships_for_employee(
        &self,
        employee_id: i64,
    ) -> Result<Vec<OutletEmployee>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT outlet_id, employee_id, role, created_at
            FROM outlet_employees
            WHERE employee_id = ?
            ORDER BY outlet_id
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| OutletEmployee::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// All members of an outlet
    pub async fn list_outlet_employees(&self, outlet_id: i64) -> Result<Vec<OutletEmployee>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT outlet_id, employee_id, role, created_at
            FROM outlet_employees
            WHERE outlet_id = ?
            ORDER BY employee_id
            "#,
        )
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| OutletEmployee::try_from(row).map_err(DbError::from))
            .collect()
    }

    // ==================== Service Pincode Operations ====================

    /// Register a service-area pincode for an outlet
    pub async fn insert_service_pincode(
        &self,
        outlet_id: i64,
        pincode: &str,
    ) -> Result<ServicePincode, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO outlet_service_pincodes (outlet_id, pincode, created_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(outlet_id)
        .bind(pincode)
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Pincode"))?;

        Ok(ServicePincode {
            id: result.get("id"),
            outlet_id,
            pincode: pincode.to_string(),
            created_at: now,
        })
    }

    /// Service-area pincodes of an outlet
    pub async fn list_service_pincodes(&self, outlet_id: i64) -> Result<Vec<ServicePincode>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, outlet_id, pincode, created_at
            FROM outlet_service_pincodes
            WHERE outlet_id = ?
            ORDER BY pincode
            "#,
        )
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ServicePincode::try_from(row).map_err(DbError::from))
            .collect()
    }
}

async fn upsert_membership(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    outlet_id: i64,
    employee_id: i64,
    role: Role,
) -> Result<OutletEmployee, DbError> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO outlet_employees (outlet_id, employee_id, role, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(outlet_id, employee_id) DO UPDATE SET role = excluded.role
        "#,
    )
    .bind(outlet_id)
    .bind(employee_id)
    .bind(role.as_str())
    .bind(now.to_rfc3339())
    .execute(&mut **tx)
    .await
    .map_err(|e| DbError::from_write(e, "Outlet membership"))?;

    Ok(OutletEmployee {
        outlet_id,
        employee_id,
        role,
        created_at: now,
    })
}
