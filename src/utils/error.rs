use thiserror::Error;

#[derive(Error, Debug)]
pub enum MollieError {
    #[error("Unsupported payment method: {code}")]
    UnsupportedMethod { code: String },

    #[error("Payment method {method} cannot be used with the {api}")]
    UnsupportedApi { method: String, api: String },

    #[error("Missing required field: {field}")]
    MissingRequiredField { field: String },

    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Invalid currency code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Shop collaborator failed during {step}: {message}")]
    CollaboratorError { step: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Configuration,
    Collaborator,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MollieError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub fn collaborator(step: impl Into<String>, message: impl ToString) -> Self {
        Self::CollaboratorError {
            step: step.into(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedMethod { .. }
            | Self::UnsupportedApi { .. }
            | Self::MissingRequiredField { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidCurrency { .. } => ErrorCategory::Request,
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::CollaboratorError { .. } => ErrorCategory::Collaborator,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Collaborator => ErrorSeverity::Medium,
            ErrorCategory::Request | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::UnsupportedMethod { .. } => {
                "Use one of the Mollie method codes, e.g. 'ideal', 'creditcard' or 'przelewy24'"
                    .to_string()
            }
            Self::UnsupportedApi { .. } => {
                "Build this method through the Orders API instead".to_string()
            }
            Self::MissingRequiredField { field } => {
                format!("Populate '{}' on the payment model before building", field)
            }
            Self::InvalidAmount { .. } => {
                "Amounts must be plain decimal numbers such as 49.98".to_string()
            }
            Self::InvalidCurrency { .. } => {
                "Use a three-letter ISO-4217 code such as EUR or USD".to_string()
            }
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the TOML configuration file and referenced environment variables"
                    .to_string()
            }
            Self::CollaboratorError { step, .. } => {
                format!("Inspect the shop logs for the '{}' step and retry", step)
            }
            Self::IoError(_) => "Check that the file exists and is readable".to_string(),
            Self::SerializationError(_) => "Check that the input is valid JSON".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Request => format!("The payment request could not be built: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Collaborator => format!("The shop reported a problem: {}", self),
            ErrorCategory::System => format!("A system error occurred: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MollieError>;
