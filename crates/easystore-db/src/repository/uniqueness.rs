//! Cross-record uniqueness lookups used by field validation

use sqlx::Row;

use crate::error::DbError;
use crate::repository::Database;

/// A column whose values must be unique across its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    EmployeeEmail,
    EmployeePhone,
    OutletEmail,
    OutletPhone,
    OutletWebsite,
}

impl UniqueField {
    fn table_and_column(&self) -> (&'static str, &'static str) {
        match self {
            UniqueField::EmployeeEmail => ("employees", "email"),
            UniqueField::EmployeePhone => ("employees", "phone"),
            UniqueField::OutletEmail => ("outlets", "email"),
            UniqueField::OutletPhone => ("outlets", "phone"),
            UniqueField::OutletWebsite => ("outlets", "website"),
        }
    }
}

impl Database {
    /// Whether another record already holds `value` in `field`.
    ///
    /// `exclude_id` skips the record being updated, so a record never
    /// conflicts with itself.
    pub async fn is_taken(
        &self,
        field: UniqueField,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DbError> {
        let (table, column) = field.table_and_column();
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE {column} = ? AND id != ?) AS taken"
        );

        let row = sqlx::query(&sql)
            .bind(value)
            // AUTOINCREMENT ids start at 1
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(&self.pool)
            .await?;

        let taken: i64 = row.get("taken");
        Ok(taken != 0)
    }
}
