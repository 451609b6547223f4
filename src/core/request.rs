//! Wire-format request bodies for the Mollie Payments API and Orders API.
//!
//! Both builders are pure: they read the [`PaymentModel`], the chosen
//! [`PaymentMethod`] and the build time, and return a fresh body. Field order
//! on the wire follows struct field order.

use crate::core::method::{ApiKind, PaymentMethod};
use crate::domain::model::{Address, LineItem, LineType, PaymentModel};
use crate::domain::money::{format_amount, Currency, Money};
use crate::utils::error::{MollieError, Result};
use crate::utils::validation::{non_blank, require_non_empty};
use chrono::{DateTime, Days, Utc};
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountBody {
    pub currency: String,
    pub value: String,
}

impl AmountBody {
    fn from_money(money: &Money, currency: &Currency) -> Result<Self> {
        if money.currency() != currency {
            return Err(MollieError::InvalidCurrency {
                value: money.currency().to_string(),
            });
        }
        Ok(Self {
            currency: currency.to_string(),
            value: money.value(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub given_name: String,
    pub family_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub street_and_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_additional: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

impl From<&Address> for AddressBody {
    fn from(address: &Address) -> Self {
        Self {
            title: address.title.clone(),
            given_name: address.given_name.clone(),
            family_name: address.family_name.clone(),
            organization_name: address.company.clone(),
            email: address.email.clone(),
            phone: address.phone.clone(),
            street_and_number: address.street.clone(),
            street_additional: address.street_additional.clone(),
            postal_code: address.postal_code.clone(),
            city: address.city.clone(),
            country: address.country_iso2.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBody {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: AmountBody,
    pub total_amount: AmountBody,
    pub vat_rate: String,
    pub vat_amount: AmountBody,
}

impl LineBody {
    fn from_line(line: &LineItem, currency: &Currency) -> Result<Self> {
        Ok(Self {
            line_type: line.line_type,
            sku: line.sku.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: AmountBody::from_money(&line.unit_price, currency)?,
            total_amount: AmountBody::from_money(&line.total_amount, currency)?,
            vat_rate: format_amount(line.vat_rate),
            vat_amount: AmountBody::from_money(&line.vat_amount, currency)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsApiBody {
    pub method: String,
    pub amount: AmountBody,
    pub description: String,
    pub redirect_url: String,
    pub webhook_url: String,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_pay_payment_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// The nested `payment` object of an Orders API request.
///
/// Only carries data for the payment Mollie creates for the order; the billing
/// email has no place here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentBody {
    pub webhook_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_pay_payment_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersApiBody {
    pub method: String,
    pub amount: AmountBody,
    pub redirect_url: String,
    pub webhook_url: String,
    pub locale: String,
    pub order_number: String,
    pub payment: OrderPaymentBody,
    pub billing_address: AddressBody,
    pub shipping_address: AddressBody,
    pub lines: Vec<LineBody>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl PaymentsApiBody {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl OrdersApiBody {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Fields both request styles share.
struct CommonFields {
    amount: AmountBody,
    redirect_url: String,
    webhook_url: String,
    locale: String,
}

fn common_fields(model: &PaymentModel) -> Result<CommonFields> {
    let redirect_url = require_non_empty("redirectUrl", &model.redirect_url)?;
    let webhook_url = require_non_empty("webhookUrl", &model.webhook_url)?;
    let locale = require_non_empty("locale", &model.locale)?;

    if model.total_amount.is_negative() {
        return Err(MollieError::InvalidAmount {
            value: model.total_amount.amount().to_string(),
            reason: "order total cannot be negative".to_string(),
        });
    }

    Ok(CommonFields {
        amount: AmountBody::from_money(&model.total_amount, &model.currency)?,
        redirect_url: redirect_url.to_string(),
        webhook_url: webhook_url.to_string(),
        locale: locale.to_string(),
    })
}

/// `now + days`, as a calendar date.
pub fn date_in_days(now: DateTime<Utc>, days: u32) -> Result<String> {
    now.date_naive()
        .checked_add_days(Days::new(u64::from(days)))
        .map(|date| date.format(DATE_FORMAT).to_string())
        .ok_or_else(|| MollieError::InvalidConfigValueError {
            field: "expirationDays".to_string(),
            value: days.to_string(),
            reason: "resulting date is out of range".to_string(),
        })
}

fn owned(value: Option<&String>) -> Option<String> {
    non_blank(value.map(String::as_str)).map(str::to_string)
}

pub fn build_payments_api_body(
    method: PaymentMethod,
    model: &PaymentModel,
    now: DateTime<Utc>,
) -> Result<PaymentsApiBody> {
    let policy = method.policy();
    if !policy.payments_api {
        return Err(MollieError::UnsupportedApi {
            method: method.code().to_string(),
            api: ApiKind::Payments.to_string(),
        });
    }

    let common = common_fields(model)?;
    let description = require_non_empty("description", &model.description)?;

    let due_date = match model.expiration_days {
        Some(days) if policy.due_date => Some(date_in_days(now, days)?),
        _ => None,
    };

    Ok(PaymentsApiBody {
        method: method.code().to_string(),
        amount: common.amount,
        description: description.to_string(),
        redirect_url: common.redirect_url,
        webhook_url: common.webhook_url,
        locale: common.locale,
        billing_email: owned(model.billing_email.as_ref()).filter(|_| policy.billing_email),
        issuer: owned(model.issuer.as_ref()).filter(|_| policy.issuer),
        card_token: owned(model.card_token.as_ref()).filter(|_| policy.card_token),
        apple_pay_payment_token: owned(model.apple_pay_token.as_ref())
            .filter(|_| policy.apple_pay_token),
        due_date,
    })
}

pub fn build_orders_api_body(
    method: PaymentMethod,
    model: &PaymentModel,
    now: DateTime<Utc>,
) -> Result<OrdersApiBody> {
    let policy = method.policy();
    let common = common_fields(model)?;
    let order_number = require_non_empty("orderNumber", &model.order_number)?;

    let lines = model
        .lines
        .iter()
        .map(|line| LineBody::from_line(line, &model.currency))
        .collect::<Result<Vec<_>>>()?;

    let expires_at = model
        .expiration_days
        .map(|days| date_in_days(now, days))
        .transpose()?;

    Ok(OrdersApiBody {
        method: method.code().to_string(),
        amount: common.amount,
        redirect_url: common.redirect_url,
        webhook_url: common.webhook_url.clone(),
        locale: common.locale,
        order_number: order_number.to_string(),
        payment: OrderPaymentBody {
            webhook_url: common.webhook_url,
            issuer: owned(model.issuer.as_ref()).filter(|_| policy.issuer),
            card_token: owned(model.card_token.as_ref()).filter(|_| policy.card_token),
            apple_pay_payment_token: owned(model.apple_pay_token.as_ref())
                .filter(|_| policy.apple_pay_token),
        },
        billing_address: AddressBody::from(&model.billing_address),
        shipping_address: AddressBody::from(&model.shipping_address),
        lines,
        metadata: serde_json::Map::new(),
        expires_at,
    })
}
