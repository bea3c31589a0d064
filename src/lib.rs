pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod gallery;
pub mod kv;
pub mod models;
pub mod seed;
pub mod session;
pub mod share;
pub mod utils;

pub use api::Db;
pub use error::{ExportError, StoreError};
pub use kv::KvStore;
pub use session::SessionContext;
