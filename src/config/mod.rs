#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{ApiChoice, CliArgs};
pub use toml_config::{BasketConfig, CheckoutConfig, PluginConfig};
