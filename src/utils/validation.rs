use crate::utils::error::{MollieError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static LOCALE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}_[A-Z]{2}$").expect("valid locale regex"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Checks that a required request field is present and not blank.
pub fn require_non_empty<'a>(field_name: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(MollieError::missing(field_name));
    }
    Ok(value)
}

/// Returns the value unchanged when it carries something, `None` for blank input.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MollieError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MollieError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MollieError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_locale(field_name: &str, locale: &str) -> Result<()> {
    if !LOCALE_PATTERN.is_match(locale) {
        return Err(MollieError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: locale.to_string(),
            reason: "Locale must look like 'de_DE'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MollieError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MollieError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("redirect_url", "https://shop.example/return").is_ok());
        assert!(validate_url("redirect_url", "http://localhost/notify").is_ok());
        assert!(validate_url("redirect_url", "").is_err());
        assert!(validate_url("redirect_url", "invalid-url").is_err());
        assert!(validate_url("redirect_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale("default_locale", "de_DE").is_ok());
        assert!(validate_locale("default_locale", "en_US").is_ok());
        assert!(validate_locale("default_locale", "de-DE").is_err());
        assert!(validate_locale("default_locale", "german").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("locale", "de_DE").unwrap(), "de_DE");
        let err = require_non_empty("redirectUrl", "  ").unwrap_err();
        assert!(matches!(
            err,
            MollieError::MissingRequiredField { field } if field == "redirectUrl"
        ));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("dev@mollie.local")), Some("dev@mollie.local"));
        assert_eq!(non_blank(Some(" dev@mollie.local ")), Some(" dev@mollie.local "));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("bank_transfer_due_days", 14, 1, 100).is_ok());
        assert!(validate_range("bank_transfer_due_days", 0, 1, 100).is_err());
    }
}
