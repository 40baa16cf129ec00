pub mod config;
pub mod income_loader;
pub mod logging;
pub mod policy_loader;

pub use config::{AppConfig, ConfigError, OutputFormat};
pub use income_loader::IncomeLoadError;
pub use policy_loader::{PolicyLoader, PolicyLoaderError, PolicyRecord};
