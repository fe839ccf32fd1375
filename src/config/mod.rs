mod credentials;
mod loader;
mod types;

pub use credentials::{Credential, SecureString};
pub use loader::{ConfigError, MAX_PER_PAGE};
pub use types::{ApiConfig, Config, Defaults, StorageConfig};
