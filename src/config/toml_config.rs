use crate::app::basket_restore::{FailureAction, RestorePolicy, RestoreStep};
use crate::core::method::{ApiKind, PaymentMethod};
use crate::domain::model::PaymentModel;
use crate::utils::error::{MollieError, Result};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Longest expiry Mollie accepts on an order.
pub const MAX_EXPIRATION_DAYS: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub plugin: PluginSection,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub basket: BasketConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSection {
    pub name: String,
    pub version: String,
}

impl Default for PluginSection {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Used when the payment model arrives without a locale.
    pub default_locale: Option<String>,
    /// Days until a bank transfer is due, sent as `dueDate`.
    pub bank_transfer_due_days: Option<u32>,
    /// Days until an Orders API order expires, sent as `expiresAt`.
    pub orders_api_expiration_days: Option<u32>,
}

impl CheckoutConfig {
    /// Fills shop defaults into a model without overriding what it already carries.
    pub fn apply_to(&self, model: &mut PaymentModel, method: PaymentMethod, api: ApiKind) {
        if model.locale.trim().is_empty() {
            if let Some(locale) = &self.default_locale {
                model.locale = locale.clone();
            }
        }

        if model.expiration_days.is_some() {
            return;
        }

        model.expiration_days = match api {
            ApiKind::Payments if method.policy().due_date => self.bank_transfer_due_days,
            ApiKind::Payments => None,
            ApiKind::Orders => self.orders_api_expiration_days,
        };
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default)]
    pub auto_reset_stock: bool,
    #[serde(default)]
    pub cancel_failed_orders: bool,
    /// Per-step failure handling, e.g. `add_article = "abort"`.
    #[serde(default)]
    pub on_failure: BTreeMap<RestoreStep, FailureAction>,
}

impl PluginConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MollieError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MollieError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn restore_policy(&self) -> RestorePolicy {
        RestorePolicy {
            reset_stock: self.basket.auto_reset_stock,
            cancel_failed_orders: self.basket.cancel_failed_orders,
            on_failure: self.basket.on_failure.clone(),
        }
    }
}

impl Validate for PluginConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("plugin.name", &self.plugin.name)?;

        if let Some(locale) = &self.checkout.default_locale {
            validation::validate_locale("checkout.default_locale", locale)?;
        }

        if let Some(days) = self.checkout.bank_transfer_due_days {
            validation::validate_range(
                "checkout.bank_transfer_due_days",
                days,
                1,
                MAX_EXPIRATION_DAYS,
            )?;
        }

        if let Some(days) = self.checkout.orders_api_expiration_days {
            validation::validate_range(
                "checkout.orders_api_expiration_days",
                days,
                1,
                MAX_EXPIRATION_DAYS,
            )?;
        }

        Ok(())
    }
}
