pub mod config;
pub mod content;
pub mod error;
pub mod motion;

pub use config::AppConfig;
pub use content::DisplayItem;
pub use error::{Error, Result};
