//! Employee operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Employee, NewEmployee, UpdateEmployee};
use crate::repository::Database;

const EMPLOYEE_COLUMNS: &str =
    "id, name, phone, email, password_hash, role, status, created_at, updated_at";

impl Database {
    // ==================== Employee Operations ====================

    /// Insert a new employee
    pub async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO employees (name, phone, email, password_hash, role, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.password_hash)
        .bind(employee.role.as_str())
        .bind(employee.status.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Employee"))?;

        let id: i64 = result.get("id");

        Ok(Employee {
            id,
            name: employee.name,
            phone: employee.phone,
            email: employee.email,
            password_hash: employee.password_hash,
            role: employee.role,
            status: employee.status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an employee by ID
    pub async fn get_employee(&self, id: i64) -> Result<Option<Employee>, DbError> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        let result = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Employee::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an employee by email (login lookup)
    pub async fn get_employee_by_email(&self, email: &str) -> Result<Option<Employee>, DbError> {
        let sql = format!("SELECT {} FROM employees WHERE email = ?", EMPLOYEE_COLUMNS);
        let result = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Employee::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all employees
    pub async fn list_employees(&self) -> Result<Vec<Employee>, DbError> {
        let sql = format!("SELECT {} FROM employees ORDER BY id", EMPLOYEE_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| Employee::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update; `None` when the employee does not exist
    pub async fn update_employee(
        &self,
        id: i64,
        update: UpdateEmployee,
    ) -> Result<Option<Employee>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = COALESCE(?, name),
                phone = COALESCE(?, phone),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                role = COALESCE(?, role),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.name)
        .bind(update.phone)
        .bind(update.email)
        .bind(update.password_hash)
        .bind(update.role.map(|r| r.as_str()))
        .bind(update.status.map(|s| s.as_str()))
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Employee"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_employee(id).await
    }

    /// Check if any employees exist
    pub async fn has_employees(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM employees")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}
