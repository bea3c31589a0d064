use log::{info, warn};
use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::kv::{StoreKind, StoreOptions, DEFAULT_STORE_NAME};
use crate::session::DEFAULT_ADMIN_EMAIL;

#[derive(Debug, Clone)]
pub struct Config {
	pub store_backend: String,
	pub store_name: String,
	pub data_dir: PathBuf,
	pub database_url: Option<String>,
	pub admin_email: String,
	pub public_base_url: String,
	pub command: Option<String>,
}

fn var_or(key: &str, default: &str) -> String {
	env::var(key).unwrap_or_else(|_| {
		info!("{} not set, using default: {}", key, default);
		default.to_string()
	})
}

impl Config {
	/// Reads the environment; call after `dotenv()` so `.env` values are visible.
	pub fn init() -> Config {
		Config {
			store_backend: var_or("STORE_BACKEND", "file").to_lowercase(),
			store_name: var_or("STORE_NAME", DEFAULT_STORE_NAME),
			data_dir: PathBuf::from(var_or("DATA_DIR", "picdrop_data")),
			database_url: env::var("DATABASE_URL").ok(),
			admin_email: var_or("ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL),
			public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:5173/"),
			command: env::var("COMMAND").ok(),
		}
	}

	pub fn store_options(&self) -> Result<StoreOptions, ConfigError> {
		let kind = match self.store_backend.as_str() {
			"memory" => {
				warn!("Using the in-memory store, nothing will be persisted");
				StoreKind::Memory
			}
			"file" => StoreKind::File {
				data_dir: self.data_dir.clone(),
			},
			"postgres" => StoreKind::Postgres {
				database_url: self
					.database_url
					.clone()
					.ok_or(ConfigError::Missing("DATABASE_URL"))?,
			},
			other => return Err(ConfigError::UnknownBackend(other.to_string())),
		};

		Ok(StoreOptions {
			name: self.store_name.clone(),
			kind,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(backend: &str) -> Config {
		Config {
			store_backend: backend.to_string(),
			store_name: DEFAULT_STORE_NAME.to_string(),
			data_dir: PathBuf::from("data"),
			database_url: None,
			admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
			public_base_url: "http://localhost:5173/".to_string(),
			command: None,
		}
	}

	#[test]
	fn file_backend_uses_the_data_dir() {
		let options = config("file").store_options().unwrap();
		assert_eq!(options.name, "PicDropDB");
		assert!(matches!(options.kind, StoreKind::File { ref data_dir } if data_dir == &PathBuf::from("data")));
	}

	#[test]
	fn postgres_needs_a_database_url() {
		assert!(matches!(
			config("postgres").store_options(),
			Err(ConfigError::Missing("DATABASE_URL"))
		));

		let mut with_url = config("postgres");
		with_url.database_url = Some("postgres://localhost/picdrop".to_string());
		assert!(matches!(
			with_url.store_options().unwrap().kind,
			StoreKind::Postgres { .. }
		));
	}

	#[test]
	fn unknown_backend_is_rejected() {
		assert!(matches!(
			config("indexeddb").store_options(),
			Err(ConfigError::UnknownBackend(_))
		));
	}
}
