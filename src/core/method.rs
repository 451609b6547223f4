use crate::utils::error::{MollieError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix the shop uses when it stores Mollie methods in its payment table.
pub const SHOP_METHOD_PREFIX: &str = "mollie_";

/// The two Mollie request styles a payment can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    Payments,
    Orders,
}

impl ApiKind {
    /// Lower-case name, as used in config and CLI output.
    pub fn key(&self) -> &'static str {
        match self {
            ApiKind::Payments => "payments",
            ApiKind::Orders => "orders",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKind::Payments => f.write_str("Payments API"),
            ApiKind::Orders => f.write_str("Orders API"),
        }
    }
}

impl FromStr for ApiKind {
    type Err = MollieError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payments" => Ok(ApiKind::Payments),
            "orders" => Ok(ApiKind::Orders),
            other => Err(MollieError::InvalidConfigValueError {
                field: "api".to_string(),
                value: other.to_string(),
                reason: "Expected 'payments' or 'orders'".to_string(),
            }),
        }
    }
}

/// Which optional fields a method puts on its requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Method can be created through the Payments API at all.
    pub payments_api: bool,
    /// Forward `billingEmail` on Payments API requests.
    pub billing_email: bool,
    /// Send `dueDate` on Payments API requests when expiration days are set.
    pub due_date: bool,
    pub card_token: bool,
    pub issuer: bool,
    pub apple_pay_token: bool,
}

impl FieldPolicy {
    pub const BASE: FieldPolicy = FieldPolicy {
        payments_api: true,
        billing_email: true,
        due_date: false,
        card_token: false,
        issuer: false,
        apple_pay_token: false,
    };
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self::BASE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentMethod {
    CreditCard,
    Ideal,
    Bancontact,
    Sofort,
    Eps,
    Giropay,
    PayPal,
    Przelewy24,
    BankTransfer,
    Kbc,
    Belfius,
    ApplePay,
    GiftCard,
    Paysafecard,
    KlarnaPayLater,
    KlarnaSliceIt,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 16] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Ideal,
        PaymentMethod::Bancontact,
        PaymentMethod::Sofort,
        PaymentMethod::Eps,
        PaymentMethod::Giropay,
        PaymentMethod::PayPal,
        PaymentMethod::Przelewy24,
        PaymentMethod::BankTransfer,
        PaymentMethod::Kbc,
        PaymentMethod::Belfius,
        PaymentMethod::ApplePay,
        PaymentMethod::GiftCard,
        PaymentMethod::Paysafecard,
        PaymentMethod::KlarnaPayLater,
        PaymentMethod::KlarnaSliceIt,
    ];

    /// The Mollie method code sent as `method`.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "creditcard",
            PaymentMethod::Ideal => "ideal",
            PaymentMethod::Bancontact => "bancontact",
            PaymentMethod::Sofort => "sofort",
            PaymentMethod::Eps => "eps",
            PaymentMethod::Giropay => "giropay",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::Przelewy24 => "przelewy24",
            PaymentMethod::BankTransfer => "banktransfer",
            PaymentMethod::Kbc => "kbc",
            PaymentMethod::Belfius => "belfius",
            PaymentMethod::ApplePay => "applepay",
            PaymentMethod::GiftCard => "giftcard",
            PaymentMethod::Paysafecard => "paysafecard",
            PaymentMethod::KlarnaPayLater => "klarnapaylater",
            PaymentMethod::KlarnaSliceIt => "klarnasliceit",
        }
    }

    /// Resolves a method code, accepting the shop's `mollie_` prefix.
    pub fn from_code(code: &str) -> Result<Self> {
        let normalized = code.trim().to_ascii_lowercase();
        let bare = normalized
            .strip_prefix(SHOP_METHOD_PREFIX)
            .unwrap_or(&normalized);
        PaymentMethod::ALL
            .iter()
            .copied()
            .find(|method| method.code() == bare)
            .ok_or_else(|| MollieError::UnsupportedMethod {
                code: code.to_string(),
            })
    }

    pub fn policy(&self) -> FieldPolicy {
        match self {
            PaymentMethod::CreditCard => FieldPolicy {
                card_token: true,
                ..FieldPolicy::BASE
            },
            PaymentMethod::Ideal | PaymentMethod::Kbc | PaymentMethod::GiftCard => FieldPolicy {
                issuer: true,
                ..FieldPolicy::BASE
            },
            PaymentMethod::ApplePay => FieldPolicy {
                apple_pay_token: true,
                ..FieldPolicy::BASE
            },
            PaymentMethod::BankTransfer => FieldPolicy {
                due_date: true,
                ..FieldPolicy::BASE
            },
            // Klarna requires order lines, which only the Orders API carries.
            PaymentMethod::KlarnaPayLater | PaymentMethod::KlarnaSliceIt => FieldPolicy {
                payments_api: false,
                ..FieldPolicy::BASE
            },
            PaymentMethod::Bancontact
            | PaymentMethod::Sofort
            | PaymentMethod::Eps
            | PaymentMethod::Giropay
            | PaymentMethod::PayPal
            | PaymentMethod::Przelewy24
            | PaymentMethod::Belfius
            | PaymentMethod::Paysafecard => FieldPolicy::BASE,
        }
    }

    pub fn supports(&self, api: ApiKind) -> bool {
        match api {
            ApiKind::Payments => self.policy().payments_api,
            ApiKind::Orders => true,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PaymentMethod {
    type Err = MollieError;

    fn from_str(s: &str) -> Result<Self> {
        PaymentMethod::from_code(s)
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = MollieError;

    fn try_from(value: String) -> Result<Self> {
        PaymentMethod::from_code(&value)
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.code().to_string()
    }
}
