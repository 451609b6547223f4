use crate::core::method::ApiKind;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiChoice {
    Payments,
    Orders,
    /// Every API the method supports.
    Both,
}

impl ApiChoice {
    pub fn kind(&self) -> Option<ApiKind> {
        match self {
            ApiChoice::Payments => Some(ApiKind::Payments),
            ApiChoice::Orders => Some(ApiKind::Orders),
            ApiChoice::Both => None,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "mollie-requests")]
#[command(about = "Builds Mollie Payments API and Orders API request bodies from a payment model")]
pub struct CliArgs {
    /// Payment model as JSON
    #[arg(long)]
    pub model: PathBuf,

    /// Mollie method code, with or without the `mollie_` prefix
    #[arg(long)]
    pub method: String,

    #[arg(long, value_enum, default_value = "both")]
    pub api: ApiChoice,

    /// Plugin configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("method", &self.method)?;
        if !self.model.is_file() {
            return Err(crate::utils::error::MollieError::InvalidConfigValueError {
                field: "model".to_string(),
                value: self.model.display().to_string(),
                reason: "Model file does not exist".to_string(),
            });
        }
        Ok(())
    }
}
