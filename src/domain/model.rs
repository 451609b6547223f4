use crate::domain::money::{Currency, Money};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Postal address as the shop hands it over for billing or shipping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub title: Option<String>,
    pub given_name: String,
    pub family_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Street and house number.
    pub street: String,
    #[serde(default)]
    pub street_additional: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country_iso2: String,
}

/// Mollie order line type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Physical,
    Digital,
    Discount,
    Surcharge,
    ShippingFee,
    StoreCredit,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Physical => "physical",
            LineType::Digital => "digital",
            LineType::Discount => "discount",
            LineType::Surcharge => "surcharge",
            LineType::ShippingFee => "shipping_fee",
            LineType::StoreCredit => "store_credit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub article_id: i64,
    #[serde(default)]
    pub basket_item_id: Option<i64>,
    pub name: String,
    pub sku: String,
    pub line_type: LineType,
    pub quantity: u32,
    pub unit_price: Money,
    pub net_price: Money,
    /// Percentage, zero when no VAT is charged on the line.
    pub vat_rate: Decimal,
    pub vat_amount: Money,
    pub total_amount: Money,
}

impl LineItem {
    /// Creates an untaxed line; the total is derived from unit price and quantity.
    pub fn new(
        article_id: i64,
        name: impl Into<String>,
        sku: impl Into<String>,
        line_type: LineType,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self> {
        let currency = unit_price.currency().clone();
        let total_amount = unit_price.times(quantity)?;
        Ok(Self {
            article_id,
            basket_item_id: None,
            name: name.into(),
            sku: sku.into(),
            line_type,
            quantity,
            net_price: unit_price.clone(),
            unit_price,
            vat_rate: Decimal::ZERO,
            vat_amount: Money::zero(currency),
            total_amount,
        })
    }

    pub fn with_vat(mut self, vat_rate: Decimal, vat_amount: Money) -> Self {
        self.vat_rate = vat_rate;
        self.vat_amount = vat_amount;
        self
    }
}

/// Everything the request builder needs to know about one checkout attempt.
///
/// Built once per attempt by the shop side and never mutated by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentModel {
    pub order_id: String,
    pub description: String,
    pub order_number: String,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub total_amount: Money,
    pub lines: Vec<LineItem>,
    pub currency: Currency,
    pub locale: String,
    pub redirect_url: String,
    pub webhook_url: String,
    #[serde(default)]
    pub billing_email: Option<String>,
    #[serde(default)]
    pub expiration_days: Option<u32>,
    #[serde(default)]
    pub card_token: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub apple_pay_token: Option<String>,
}

impl PaymentModel {
    pub fn with_billing_email(mut self, email: impl Into<String>) -> Self {
        self.billing_email = Some(email.into());
        self
    }

    pub fn with_expiration_days(mut self, days: u32) -> Self {
        self.expiration_days = Some(days);
        self
    }

    pub fn with_card_token(mut self, token: impl Into<String>) -> Self {
        self.card_token = Some(token.into());
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_apple_pay_token(mut self, token: impl Into<String>) -> Self {
        self.apple_pay_token = Some(token.into());
        self
    }
}

/// Shape checks for models that arrive from outside the shop, e.g. a JSON file.
///
/// The builders only insist on presence; this also checks URL and locale format.
impl Validate for PaymentModel {
    fn validate(&self) -> Result<()> {
        validation::validate_url("redirect_url", &self.redirect_url)?;
        validation::validate_url("webhook_url", &self.webhook_url)?;
        validation::validate_locale("locale", &self.locale)?;
        Ok(())
    }
}

/// Basket line modes, serialized as the shop's integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum LineMode {
    Product,
    PremiumProduct,
    Voucher,
    Rebate,
    Surcharge,
}

impl LineMode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(LineMode::Product),
            1 => Some(LineMode::PremiumProduct),
            2 => Some(LineMode::Voucher),
            3 => Some(LineMode::Rebate),
            4 => Some(LineMode::Surcharge),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            LineMode::Product => 0,
            LineMode::PremiumProduct => 1,
            LineMode::Voucher => 2,
            LineMode::Rebate => 3,
            LineMode::Surcharge => 4,
        }
    }
}

impl TryFrom<i32> for LineMode {
    type Error = String;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        LineMode::from_code(code).ok_or_else(|| format!("unknown basket line mode {}", code))
    }
}

impl From<LineMode> for i32 {
    fn from(mode: LineMode) -> Self {
        mode.code()
    }
}

/// A row of the session basket, before prices are turned into Mollie lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    pub basket_item_id: i64,
    pub article_id: i64,
    pub article_name: String,
    pub order_number: String,
    pub quantity: u32,
    pub price: Decimal,
    pub net_price: Decimal,
    pub tax_rate: Decimal,
    #[serde(default)]
    pub esd_article: bool,
    pub mode: LineMode,
}
