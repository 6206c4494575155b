//! # SQLite Store
//!
//! [`SqlStore`] implements every repository trait over one `sqlx` pool.
//! Ids are stored as hyphenated TEXT and timestamps as fixed-width UTC
//! TEXT, so lexical order on `created_at` is chronological order.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::schema::SCHEMA;
use super::{HealthProbe, Page, PersonStore, ProductStore};
use crate::auth::user::{User, UserStore};
use crate::model::{Person, Price, Product, ProductWithOwner};
use crate::query::{like_pattern, FilterOperator, FilterSet, FilterValue, ListQuery, OrderBy};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const PERSON_COLUMNS: &str = "p.id, p.first_name, p.last_name, p.email, p.created_at";

const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.sku, p.price_cents, p.owner_id, p.created_at, \
     o.id AS owner_pk, o.first_name AS owner_first_name, o.last_name AS owner_last_name, \
     o.email AS owner_email, o.created_at AS owner_created_at \
     FROM products p LEFT JOIN persons o ON o.id = p.owner_id";

/// Record store backed by a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Open a pool for `url`, creating the database file if needed.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database is a separate database,
        // so keep exactly one alive for the life of the pool.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .connect_with(options)
                .await?
        };

        info!(url = %url, in_memory, "Connected to database");
        Ok(Self { pool })
    }

    /// A fresh, migrated in-memory database
    pub async fn in_memory() -> StoreResult<Self> {
        let store = Self::connect("sqlite::memory:", 1).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the schema. Safe to run repeatedly.
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!(statements = SCHEMA.len(), "Schema applied");
        Ok(())
    }

    /// Close every connection. Later operations fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ==================
// Encoding
// ==================

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(format!("timestamp {:?}: {}", raw, e)))
}

fn parse_id(raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| StoreError::corrupt(format!("id {:?}: {}", raw, e)))
}

fn person_from_row(row: &SqliteRow) -> StoreResult<Person> {
    Ok(Person {
        id: parse_id(row.try_get("id")?)?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    })
}

fn owner_from_row(row: &SqliteRow) -> StoreResult<Option<Person>> {
    let Some(id) = row.try_get::<Option<&str>, _>("owner_pk")? else {
        return Ok(None);
    };
    Ok(Some(Person {
        id: parse_id(id)?,
        first_name: row.try_get("owner_first_name")?,
        last_name: row.try_get("owner_last_name")?,
        email: row.try_get("owner_email")?,
        created_at: parse_timestamp(row.try_get("owner_created_at")?)?,
    }))
}

fn product_from_row(row: &SqliteRow) -> StoreResult<ProductWithOwner> {
    let owner_id = row
        .try_get::<Option<&str>, _>("owner_id")?
        .map(parse_id)
        .transpose()?;

    let product = Product {
        id: parse_id(row.try_get("id")?)?,
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        price: Price::from_cents(row.try_get("price_cents")?),
        owner_id,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    };

    Ok(ProductWithOwner::new(product, owner_from_row(row)?))
}

fn user_from_row(row: &SqliteRow) -> StoreResult<User> {
    Ok(User {
        id: parse_id(row.try_get("id")?)?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    })
}

// ==================
// Query compilation
// ==================

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filters: &FilterSet) {
    for (i, expr) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        let column = format!("p.{}", expr.column.sql_name());

        match expr.operator {
            FilterOperator::IContains => {
                let text = match &expr.value {
                    FilterValue::Text(text) => text.clone(),
                    FilterValue::Price(price) => price.to_string(),
                };
                builder.push(format!("LOWER({}) LIKE ", column));
                builder.push_bind(like_pattern(&text));
                builder.push(" ESCAPE '\\'");
            }
            FilterOperator::Gte | FilterOperator::Lte => {
                let op = if expr.operator == FilterOperator::Gte { ">=" } else { "<=" };
                builder.push(format!("{} {} ", column, op));
                match &expr.value {
                    FilterValue::Price(price) => builder.push_bind(price.cents()),
                    FilterValue::Text(text) => builder.push_bind(text.clone()),
                };
            }
        }
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Sqlite>, order: &[OrderBy]) {
    builder.push(" ORDER BY ");
    for key in order {
        builder.push(format!(
            "p.{} {}, ",
            key.column.sql_name(),
            if key.descending { "DESC" } else { "ASC" }
        ));
    }
    // Tie-break on id so pages never overlap.
    let id_desc = order.last().map(|k| k.descending).unwrap_or(false);
    builder.push(if id_desc { "p.id DESC" } else { "p.id ASC" });
}

fn push_page(builder: &mut QueryBuilder<'_, Sqlite>, query: &ListQuery) {
    builder.push(" LIMIT ");
    builder.push_bind(query.page.size as i64);
    builder.push(" OFFSET ");
    builder.push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));
}

impl SqlStore {
    /// Count matching rows on the connection that will read the page, so
    /// both statements see one snapshot.
    async fn count(
        conn: &mut SqliteConnection,
        table: &str,
        filters: &FilterSet,
    ) -> StoreResult<usize> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {} p", table));
        push_filters(&mut builder, filters);
        let total: i64 = builder.build_query_scalar().fetch_one(conn).await?;
        Ok(total.max(0) as usize)
    }
}

#[async_trait]
impl PersonStore for SqlStore {
    async fn insert_person(&self, person: &Person) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO persons (id, first_name, last_name, email, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(person.id.to_string())
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(format_timestamp(&person.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_person(&self, id: Uuid) -> StoreResult<Option<Person>> {
        let row = sqlx::query(&format!("SELECT {} FROM persons p WHERE p.id = ?", PERSON_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(person_from_row).transpose()
    }

    async fn update_person(&self, person: &Person) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE persons SET first_name = ?, last_name = ?, email = ? WHERE id = ?",
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(person.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_person(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn query_persons(&self, query: &ListQuery) -> StoreResult<Page<Person>> {
        let mut tx = self.pool.begin().await?;
        let total = Self::count(&mut tx, "persons", &query.filters).await?;

        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM persons p", PERSON_COLUMNS));
        push_filters(&mut builder, &query.filters);
        push_order(&mut builder, &query.order);
        push_page(&mut builder, query);

        let rows = builder.build().fetch_all(&mut *tx).await?;
        tx.commit().await?;

        let items = rows.iter().map(person_from_row).collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total })
    }
}

#[async_trait]
impl ProductStore for SqlStore {
    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO products (id, name, sku, price_cents, owner_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price.cents())
        .bind(product.owner_id.map(|id| id.to_string()))
        .bind(format_timestamp(&product.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<ProductWithOwner>> {
        let row = sqlx::query(&format!("{} WHERE p.id = ?", PRODUCT_SELECT))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn update_product(&self, product: &Product) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE products SET name = ?, sku = ?, price_cents = ?, owner_id = ? WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price.cents())
        .bind(product.owner_id.map(|id| id.to_string()))
        .bind(product.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn sku_exists(&self, sku: &str, excluding: Option<Uuid>) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM products WHERE sku = ? AND (? IS NULL OR id <> ?) LIMIT 1",
        )
        .bind(sku)
        .bind(excluding.map(|id| id.to_string()))
        .bind(excluding.map(|id| id.to_string()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    async fn query_products(&self, query: &ListQuery) -> StoreResult<Page<ProductWithOwner>> {
        let mut tx = self.pool.begin().await?;
        let total = Self::count(&mut tx, "products", &query.filters).await?;

        let mut builder = QueryBuilder::<Sqlite>::new(PRODUCT_SELECT);
        push_filters(&mut builder, &query.filters);
        push_order(&mut builder, &query.order);
        push_page(&mut builder, query);

        let rows = builder.build().fetch_all(&mut *tx).await?;
        tx.commit().await?;

        let items = rows.iter().map(product_from_row).collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total })
    }
}

#[async_trait]
impl UserStore for SqlStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(format_timestamp(&user.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl HealthProbe for SqlStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{parse_person_query, parse_product_query};
    use std::collections::HashMap;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn person(email: &str) -> Person {
        Person::new("Test".into(), "Person".into(), email.into())
    }

    #[tokio::test]
    async fn test_person_roundtrip() {
        let store = SqlStore::in_memory().await.unwrap();
        let p = person("a@example.com");
        store.insert_person(&p).await.unwrap();

        let loaded = store.get_person(p.id).await.unwrap().unwrap();
        assert_eq!(loaded, p);
        assert!(store.get_person(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = SqlStore::in_memory().await.unwrap();
        store.insert_person(&person("dup@example.com")).await.unwrap();

        let err = store.insert_person(&person("dup@example.com")).await.unwrap_err();
        match err {
            StoreError::UniqueViolation { field } => assert_eq!(field, "email"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_owner_clears_reference() {
        let store = SqlStore::in_memory().await.unwrap();
        let owner = person("owner@example.com");
        store.insert_person(&owner).await.unwrap();

        let price = Price::from_cents(100);
        let product = Product::new("Widget".into(), "WID-1".into(), price, Some(owner.id));
        store.insert_product(&product).await.unwrap();
        assert!(store.get_product(product.id).await.unwrap().unwrap().owner.is_some());

        assert!(store.delete_person(owner.id).await.unwrap());
        let loaded = store.get_product(product.id).await.unwrap().unwrap();
        assert!(loaded.owner.is_none());
        assert!(loaded.product.owner_id.is_none());
    }

    #[tokio::test]
    async fn test_unknown_owner_is_foreign_key_violation() {
        let store = SqlStore::in_memory().await.unwrap();
        let product = Product::new("W".into(), "SKU".into(), Price::ZERO, Some(Uuid::new_v4()));
        let err = store.insert_product(&product).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation));
    }

    #[tokio::test]
    async fn test_sku_exists_excludes_self() {
        let store = SqlStore::in_memory().await.unwrap();
        let product = Product::new("W".into(), "SKU-1".into(), Price::ZERO, None);
        store.insert_product(&product).await.unwrap();

        assert!(store.sku_exists("SKU-1", None).await.unwrap());
        assert!(!store.sku_exists("SKU-1", Some(product.id)).await.unwrap());
        assert!(!store.sku_exists("SKU-2", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_query_filters_and_pages() {
        let store = SqlStore::in_memory().await.unwrap();
        for i in 0..5 {
            store
                .insert_person(&person(&format!("user{}@example.com", i)))
                .await
                .unwrap();
        }
        store.insert_person(&person("other@test.org")).await.unwrap();

        let query = parse_person_query(&params(&[("email", "EXAMPLE")]), 2).unwrap();
        let page = store.query_persons(&query).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_count_and_page_share_one_read() {
        // A single pooled connection: a transaction left open would starve
        // the writes below.
        let store = SqlStore::in_memory().await.unwrap();
        for i in 0..3 {
            store.insert_person(&person(&format!("p{}@example.com", i))).await.unwrap();
        }

        let query = parse_person_query(&params(&[]), 20).unwrap();
        let page = store.query_persons(&query).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), page.total);

        store.insert_person(&person("p3@example.com")).await.unwrap();
        let page = store.query_persons(&query).await.unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), page.total);

        let query = parse_product_query(&params(&[]), 20).unwrap();
        let products = store.query_products(&query).await.unwrap();
        assert_eq!(products.total, 0);
        assert!(products.items.is_empty());
    }

    #[tokio::test]
    async fn test_like_metacharacters_are_literal() {
        let store = SqlStore::in_memory().await.unwrap();
        store
            .insert_product(&Product::new("W".into(), "A_B".into(), Price::ZERO, None))
            .await
            .unwrap();
        store
            .insert_product(&Product::new("W".into(), "AXB".into(), Price::ZERO, None))
            .await
            .unwrap();

        let query = parse_product_query(&params(&[("sku", "a_b")]), 20).unwrap();
        let page = store.query_products(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].product.sku, "A_B");
    }

    #[tokio::test]
    async fn test_price_range() {
        let store = SqlStore::in_memory().await.unwrap();
        for (sku, cents) in [("P10", 1000), ("P50", 5000), ("P100", 10000)] {
            store
                .insert_product(&Product::new(
                    "W".into(),
                    sku.into(),
                    Price::from_cents(cents),
                    None,
                ))
                .await
                .unwrap();
        }

        let raw = params(&[("price_min", "20.00"), ("price_max", "80.00")]);
        let query = parse_product_query(&raw, 20).unwrap();
        let page = store.query_products(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].product.price.to_string(), "50.00");
    }

    #[tokio::test]
    async fn test_ping_fails_after_close() {
        let store = SqlStore::in_memory().await.unwrap();
        assert!(store.ping().await.is_ok());
        store.close().await;
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = SqlStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();
    }
}
