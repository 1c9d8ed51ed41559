//! # Catalog Repository
//!
//! The product catalog the storefront reads: rental items, extras and
//! slushy mixers. Products are never deleted, only deactivated, so old
//! orders keep pointing at a real id.

use bounce_core::{CatalogProduct, Money, ProductKind};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: String,
    name: String,
    kind: ProductKind,
    price_cents: i64,
    image: Option<String>,
    icon: Option<String>,
    active: bool,
}

impl From<CatalogRow> for CatalogProduct {
    fn from(row: CatalogRow) -> Self {
        CatalogProduct {
            id: row.id,
            name: row.name,
            kind: row.kind,
            price: Money::from_cents(row.price_cents),
            image: row.image,
            icon: row.icon,
            active: row.active,
        }
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT id, name, kind, price_cents, image, icon, active
    FROM catalog_products
"#;

/// Repository for catalog operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a product or updates the existing row with the same id.
    pub async fn upsert(&self, product: &CatalogProduct) -> DbResult<()> {
        debug!(id = %product.id, kind = ?product.kind, "Upserting catalog product");
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO catalog_products (
                id, name, kind, price_cents, image, icon, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                kind = excluded.kind,
                price_cents = excluded.price_cents,
                image = excluded.image,
                icon = excluded.icon,
                active = excluded.active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.kind)
        .bind(product.price.cents())
        .bind(&product.image)
        .bind(&product.icon)
        .bind(product.active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogProduct>> {
        let sql = format!("{} WHERE id = ?1", SELECT_PRODUCT);
        let row: Option<CatalogRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CatalogProduct::from))
    }

    /// Active products of one kind, most expensive first.
    pub async fn list_by_kind(&self, kind: ProductKind) -> DbResult<Vec<CatalogProduct>> {
        let sql = format!(
            "{} WHERE kind = ?1 AND active = 1 ORDER BY price_cents DESC, name",
            SELECT_PRODUCT
        );
        let rows: Vec<CatalogRow> = sqlx::query_as(&sql)
            .bind(kind)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CatalogProduct::from).collect())
    }

    /// Every product, grouped by kind.
    pub async fn list_all(&self) -> DbResult<Vec<CatalogProduct>> {
        let sql = format!("{} ORDER BY kind, price_cents DESC, name", SELECT_PRODUCT);
        let rows: Vec<CatalogRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(CatalogProduct::from).collect())
    }

    /// Hides a product from the storefront.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE catalog_products SET active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Number of products, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn product(id: &str, kind: ProductKind, cents: i64) -> CatalogProduct {
        CatalogProduct {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind,
            price: Money::from_cents(cents),
            image: None,
            icon: None,
            active: true,
        }
    }

    async fn repo() -> CatalogRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().catalog()
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = repo().await;
        repo.upsert(&product("castle", ProductKind::Rental, 15000)).await.unwrap();

        let mut updated = product("castle", ProductKind::Rental, 17500);
        updated.image = Some("castle.png".into());
        repo.upsert(&updated).await.unwrap();

        let stored = repo.get_by_id("castle").await.unwrap().unwrap();
        assert_eq!(stored.price, Money::from_cents(17500));
        assert_eq!(stored.image.as_deref(), Some("castle.png"));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_kind_orders_and_filters() {
        let repo = repo().await;
        repo.upsert(&product("small", ProductKind::Rental, 9000)).await.unwrap();
        repo.upsert(&product("castle", ProductKind::Rental, 15000)).await.unwrap();
        repo.upsert(&product("generator", ProductKind::Extra, 7500)).await.unwrap();
        repo.upsert(&product("retired", ProductKind::Rental, 20000)).await.unwrap();
        repo.deactivate("retired").await.unwrap();

        let rentals = repo.list_by_kind(ProductKind::Rental).await.unwrap();
        let ids: Vec<&str> = rentals.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["castle", "small"]);

        assert_eq!(repo.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_is_not_found() {
        let repo = repo().await;
        let err = repo.deactivate("ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
