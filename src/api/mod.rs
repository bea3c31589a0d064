pub mod database;
pub mod page;
pub mod photo;

pub use self::database::*;
