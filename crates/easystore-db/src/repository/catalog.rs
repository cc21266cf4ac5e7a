//! Product catalog operations: categories, products and variants

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{
    NewProduct, NewProductCategory, NewProductVariant, Product, ProductCategory, ProductVariant,
    UpdateProduct, UpdateProductCategory, UpdateProductVariant,
};
use crate::repository::Database;
use crate::utils::format_date;

const PRODUCT_COLUMNS: &str = "id, outlet_id, category_id, title, description, manufactured_date, expiry_date, status, created_at, updated_at";

impl Database {
    // ==================== Category Operations ====================

    /// Insert a new product category
    pub async fn insert_category(
        &self,
        category: NewProductCategory,
    ) -> Result<ProductCategory, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO product_categories (outlet_id, title, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(category.outlet_id)
        .bind(&category.title)
        .bind(&category.description)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(ProductCategory {
            id: result.get("id"),
            outlet_id: category.outlet_id,
            title: category.title,
            description: category.description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a category of an outlet
    pub async fn get_category(
        &self,
        outlet_id: i64,
        id: i64,
    ) -> Result<Option<ProductCategory>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, outlet_id, title, description, created_at, updated_at
            FROM product_categories
            WHERE id = ? AND outlet_id = ?
            "#,
        )
        .bind(id)
        .bind(outlet_id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| ProductCategory::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List the categories of an outlet
    pub async fn list_categories(&self, outlet_id: i64) -> Result<Vec<ProductCategory>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, outlet_id, title, description, created_at, updated_at
            FROM product_categories
            WHERE outlet_id = ?
            ORDER BY id
            "#,
        )
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ProductCategory::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Partially update a category of an outlet
    pub async fn update_category(
        &self,
        outlet_id: i64,
        id: i64,
        update: UpdateProductCategory,
    ) -> Result<Option<ProductCategory>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE product_categories
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                updated_at = ?
            WHERE id = ? AND outlet_id = ?
            "#,
        )
        .bind(update.title)
        .bind(update.description)
        .bind(now.to_rfc3339())
        .bind(id)
        .bind(outlet_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_category(outlet_id, id).await
    }

    // ==================== Product Operations ====================

    /// Insert a product together with its variants.
    ///
    /// Runs in a single transaction: if any variant fails to insert, the
    /// product row is rolled back as well.
    pub async fn create_product_with_variants(
        &self,
        product: NewProduct,
        variants: Vec<NewProductVariant>,
    ) -> Result<(Product, Vec<ProductVariant>), DbError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (outlet_id, category_id, title, description, manufactured_date, expiry_date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(product.outlet_id)
        .bind(product.category_id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.manufactured_date.as_ref().map(format_date))
        .bind(product.expiry_date.as_ref().map(format_date))
        .bind(&product.status)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DbError::from_write(e, "Product"))?;

        let product_id: i64 = result.get("id");

        let mut created = Vec::with_capacity(variants.len());
        for variant in variants {
            let row = sqlx::query(
                r#"
                INSERT INTO product_variants (product_id, name, selling_price, mrp, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(product_id)
            .bind(&variant.name)
            .bind(variant.selling_price)
            .bind(variant.mrp)
            .bind(now.to_rfc3339())
            .bind(now.to_rfc3339())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DbError::from_write(e, "Product variant"))?;

            created.push(ProductVariant {
                id: row.get("id"),
                product_id,
                name: variant.name,
                selling_price: variant.selling_price,
                mrp: variant.mrp,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;

        Ok((
            Product {
                id: product_id,
                outlet_id: product.outlet_id,
                category_id: product.category_id,
                title: product.title,
                description: product.description,
                manufactured_date: product.manufactured_date,
                expiry_date: product.expiry_date,
                status: product.status,
                created_at: now,
                updated_at: now,
            },
            created,
        ))
    }

    /// Get a product of an outlet
    pub async fn get_product(&self, outlet_id: i64, id: i64) -> Result<Option<Product>, DbError> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = ? AND outlet_id = ?",
            PRODUCT_COLUMNS
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(outlet_id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Product::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List the products of an outlet
    pub async fn list_products(&self, outlet_id: i64) -> Result<Vec<Product>, DbError> {
        let sql = format!(
            "SELECT {} FROM products WHERE outlet_id = ? ORDER BY id",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(outlet_id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| Product::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Partially update a product of an outlet
    pub async fn update_product(
        &self,
        outlet_id: i64,
        id: i64,
        update: UpdateProduct,
    ) -> Result<Option<Product>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET category_id = COALESCE(?, category_id),
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                manufactured_date = COALESCE(?, manufactured_date),
                expiry_date = COALESCE(?, expiry_date),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ? AND outlet_id = ?
            "#,
        )
        .bind(update.category_id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.manufactured_date.as_ref().map(format_date))
        .bind(update.expiry_date.as_ref().map(format_date))
        .bind(update.status)
        .bind(now.to_rfc3339())
        .bind(id)
        .bind(outlet_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Product"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_product(outlet_id, id).await
    }

    // ==================== Variant Operations ====================

    /// Add a variant to an existing product
    pub async fn insert_variant(
        &self,
        product_id: i64,
        variant: NewProductVariant,
    ) -> Result<ProductVariant, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO product_variants (product_id, name, selling_price, mrp, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(product_id)
        .bind(&variant.name)
        .bind(variant.selling_price)
        .bind(variant.mrp)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Product variant"))?;

        Ok(ProductVariant {
            id: result.get("id"),
            product_id,
            name: variant.name,
            selling_price: variant.selling_price,
            mrp: variant.mrp,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a variant of a product
    pub async fn get_variant(
        &self,
        product_id: i64,
        id: i64,
    ) -> Result<Option<ProductVariant>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, product_id, name, selling_price, mrp, created_at, updated_at
            FROM product_variants
            WHERE id = ? AND product_id = ?
            "#,
        )
        .bind(id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| ProductVariant::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List the variants of a product
    pub async fn list_variants(&self, product_id: i64) -> Result<Vec<ProductVariant>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, name, selling_price, mrp, created_at, updated_at
            FROM product_variants
            WHERE product_id = ?
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ProductVariant::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Partially update a variant of a product
    pub async fn update_variant(
        &self,
        product_id: i64,
        id: i64,
        update: UpdateProductVariant,
    ) -> Result<Option<ProductVariant>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE product_variants
            SET name = COALESCE(?, name),
                selling_price = COALESCE(?, selling_price),
                mrp = COALESCE(?, mrp),
                updated_at = ?
            WHERE id = ? AND product_id = ?
            "#,
        )
        .bind(update.name)
        .bind(update.selling_price)
        .bind(update.mrp)
        .bind(now.to_rfc3339())
        .bind(id)
        .bind(product_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "Product variant"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_variant(product_id, id).await
    }
}
