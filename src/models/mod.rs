pub mod pages;
pub mod photo;
pub mod session;

pub use self::pages::*;
pub use self::photo::*;
pub use self::session::*;
