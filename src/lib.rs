pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{ApiChoice, CliArgs};

pub use app::{BasketRestorer, RestorePolicy, RestoreReport};
pub use config::PluginConfig;
pub use crate::core::{ApiKind, PaymentMethod, RequestBody, RequestBuilder};
pub use domain::model::{Address, LineItem, LineType, PaymentModel};
pub use domain::money::{Currency, Money};
pub use utils::error::{MollieError, Result};
