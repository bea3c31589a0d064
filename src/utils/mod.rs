pub mod data_url;
pub mod time;
pub mod transliterate;

pub use self::data_url::*;
pub use self::time::*;
pub use self::transliterate::*;
