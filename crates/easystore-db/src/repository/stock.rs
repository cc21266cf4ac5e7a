//! Stock operations

use chrono::Utc;

use crate::error::DbError;
use crate::models::Stock;
use crate::repository::Database;

impl Database {
    /// Get the stock row of a variant, if one has been recorded
    pub async fn get_stock(&self, variant_id: i64) -> Result<Option<Stock>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT variant_id, quantity, updated_at
            FROM stocks
            WHERE variant_id = ?
            "#,
        )
        .bind(variant_id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Stock::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Set the stock quantity of a variant
    pub async fn set_stock(&self, variant_id: i64, quantity: i64) -> Result<Stock, DbError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO stocks (variant_id, quantity, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(variant_id) DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at
            "#,
        )
        .bind(variant_id)
        .bind(quantity)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Stock"))?;

        Ok(Stock {
            variant_id,
            quantity,
            updated_at: now,
        })
    }
}
