use chrono::Utc;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::error::StoreError;

/// Key-value store over a single Postgres table, one row per `(store_name, key)`.
pub struct PgBackend {
	pool: Pool<Postgres>,
	store_name: String,
}

impl PgBackend {
	pub async fn open(database_url: &str, store_name: &str) -> Result<Self, StoreError> {
		let pool = PgPoolOptions::new()
			.max_connections(5)
			.connect(database_url)
			.await?;

		sqlx::query(
			r#"CREATE TABLE IF NOT EXISTS kv_store (
				store_name TEXT NOT NULL,
				key TEXT NOT NULL,
				value JSONB NOT NULL,
				updated_ts TIMESTAMPTZ NOT NULL,
				PRIMARY KEY (store_name, key)
			)"#,
		)
		.execute(&pool)
		.await?;

		Ok(Self {
			pool,
			store_name: store_name.to_string(),
		})
	}

	pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
		let value = sqlx::query_scalar::<_, Value>(
			"SELECT value FROM kv_store WHERE store_name = $1 AND key = $2",
		)
		.bind(&self.store_name)
		.bind(key)
		.fetch_optional(&self.pool)
		.await?;

		Ok(value)
	}

	pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
		sqlx::query(
			r#"INSERT INTO kv_store (store_name, key, value, updated_ts) VALUES ($1, $2, $3, $4)
			ON CONFLICT (store_name, key) DO UPDATE SET value = EXCLUDED.value, updated_ts = EXCLUDED.updated_ts"#,
		)
		.bind(&self.store_name)
		.bind(key)
		.bind(value)
		.bind(Utc::now())
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
		sqlx::query("DELETE FROM kv_store WHERE store_name = $1 AND key = $2")
			.bind(&self.store_name)
			.bind(key)
			.execute(&self.pool)
			.await?;

		Ok(())
	}
}
