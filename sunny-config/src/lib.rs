//! Configuration for the SunnyYummy client tools.
//!
//! Values are resolved in layers: built-in defaults, then an optional config
//! file (TOML or JSON), then environment variables. A `.env` file next to the
//! working directory contributes environment values without overriding
//! variables that are already set. Command-line flags are applied on top by
//! the binaries.

pub mod error;
pub mod loader;
pub mod models;

pub use error::ConfigLoadError;
pub use loader::{ConfigLoad, ConfigLoader, ConfigSource};
pub use models::{ApiConfig, ClientConfig, FileConfig};
