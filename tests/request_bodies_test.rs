use anyhow::Result;
use chrono::{TimeZone, Utc};
use mollie_checkout::adapters::FixedClock;
use mollie_checkout::{
    Address, ApiKind, Currency, LineItem, LineType, Money, MollieError, PaymentMethod,
    PaymentModel, RequestBuilder,
};
use rust_decimal_macros::dec;
use serde_json::json;

fn address() -> Address {
    Address {
        given_name: "Jan".to_string(),
        family_name: "Kowalski".to_string(),
        email: Some("dev@mollie.local".to_string()),
        street: "Marszalkowska 1".to_string(),
        postal_code: "00-001".to_string(),
        city: "Warszawa".to_string(),
        country_iso2: "PL".to_string(),
        ..Address::default()
    }
}

fn scenario_model() -> Result<PaymentModel> {
    let usd = Currency::parse("USD")?;
    let line = LineItem::new(
        7,
        "Mollie T-Shirt",
        "SW10007",
        LineType::Physical,
        1,
        Money::new(dec!(49.98), usd.clone()),
    )?;

    Ok(PaymentModel {
        order_id: "UUID-123".to_string(),
        description: "Order UUID-123".to_string(),
        order_number: "20004".to_string(),
        billing_address: address(),
        shipping_address: address(),
        total_amount: Money::new(dec!(49.98), usd.clone()),
        lines: vec![line],
        currency: usd,
        locale: "de_DE".to_string(),
        redirect_url: "https://local/redirect".to_string(),
        webhook_url: "https://local/notify".to_string(),
        billing_email: Some("dev@mollie.local".to_string()),
        expiration_days: None,
        card_token: None,
        issuer: None,
        apple_pay_token: None,
    })
}

fn builder() -> RequestBuilder<FixedClock> {
    RequestBuilder::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 2, 27, 23, 15, 0).unwrap(),
    ))
}

fn address_json() -> serde_json::Value {
    json!({
        "givenName": "Jan",
        "familyName": "Kowalski",
        "email": "dev@mollie.local",
        "streetAndNumber": "Marszalkowska 1",
        "postalCode": "00-001",
        "city": "Warszawa",
        "country": "PL"
    })
}

#[test]
fn test_przelewy24_payments_api_body() -> Result<()> {
    let body = builder().payments_api_body("przelewy24", &scenario_model()?)?;

    assert_eq!(
        body.to_json()?,
        json!({
            "method": "przelewy24",
            "amount": {"currency": "USD", "value": "49.98"},
            "description": "Order UUID-123",
            "redirectUrl": "https://local/redirect",
            "webhookUrl": "https://local/notify",
            "locale": "de_DE",
            "billingEmail": "dev@mollie.local"
        })
    );
    Ok(())
}

#[test]
fn test_przelewy24_orders_api_body() -> Result<()> {
    let body = builder().orders_api_body("przelewy24", &scenario_model()?)?;

    assert_eq!(
        body.to_json()?,
        json!({
            "method": "przelewy24",
            "amount": {"currency": "USD", "value": "49.98"},
            "redirectUrl": "https://local/redirect",
            "webhookUrl": "https://local/notify",
            "locale": "de_DE",
            "orderNumber": "20004",
            "payment": {"webhookUrl": "https://local/notify"},
            "billingAddress": address_json(),
            "shippingAddress": address_json(),
            "lines": [{
                "type": "physical",
                "sku": "SW10007",
                "name": "Mollie T-Shirt",
                "quantity": 1,
                "unitPrice": {"currency": "USD", "value": "49.98"},
                "totalAmount": {"currency": "USD", "value": "49.98"},
                "vatRate": "0.00",
                "vatAmount": {"currency": "USD", "value": "0.00"}
            }],
            "metadata": {}
        })
    );
    Ok(())
}

#[test]
fn test_wire_field_order() -> Result<()> {
    let body = builder().orders_api_body("przelewy24", &scenario_model()?)?;
    let text = serde_json::to_string(&body)?;

    let positions: Vec<usize> = [
        "\"method\"",
        "\"amount\"",
        "\"redirectUrl\"",
        "\"locale\"",
        "\"orderNumber\"",
        "\"payment\"",
        "\"billingAddress\"",
        "\"shippingAddress\"",
        "\"lines\"",
        "\"metadata\"",
    ]
    .iter()
    .map(|key| text.find(key).unwrap())
    .collect();

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(())
}

#[test]
fn test_billing_email_only_on_payments_api() -> Result<()> {
    let model = scenario_model()?;

    for method in PaymentMethod::ALL {
        if method.supports(ApiKind::Payments) {
            let body = builder().payments_api_body(method.code(), &model)?;
            assert_eq!(body.to_json()?["billingEmail"], "dev@mollie.local");
        }

        let order = builder().orders_api_body(method.code(), &model)?.to_json()?;
        assert!(order["payment"].get("billingEmail").is_none());
        assert!(order.get("billingEmail").is_none());
    }

    let mut blank = model.clone();
    blank.billing_email = Some("   ".to_string());
    let body = builder().payments_api_body("przelewy24", &blank)?.to_json()?;
    assert!(body.get("billingEmail").is_none());

    let mut padded = model;
    padded.billing_email = Some(" dev@mollie.local ".to_string());
    let body = builder().payments_api_body("przelewy24", &padded)?.to_json()?;
    assert_eq!(body["billingEmail"], " dev@mollie.local ");
    Ok(())
}

#[test]
fn test_expires_at_follows_clock() -> Result<()> {
    let model = scenario_model()?.with_expiration_days(5);
    let body = builder().orders_api_body("przelewy24", &model)?.to_json()?;
    assert_eq!(body["expiresAt"], "2024-03-03");

    let without = builder().orders_api_body("przelewy24", &scenario_model()?)?.to_json()?;
    assert!(without.get("expiresAt").is_none());
    Ok(())
}

#[test]
fn test_building_is_idempotent() -> Result<()> {
    let model = scenario_model()?.with_expiration_days(5);
    let before = model.clone();
    let builder = builder();

    let first = builder.build("przelewy24", ApiKind::Orders, &model)?;
    let second = builder.build("przelewy24", ApiKind::Orders, &model)?;

    assert_eq!(first, second);
    assert_eq!(model, before);
    Ok(())
}

#[test]
fn test_amounts_always_have_two_decimals() -> Result<()> {
    let mut model = scenario_model()?;
    model.total_amount = Money::new(dec!(49.985), model.currency.clone());
    let body = builder().payments_api_body("przelewy24", &model)?.to_json()?;
    assert_eq!(body["amount"]["value"], "49.99");

    model.total_amount = Money::new(dec!(50), model.currency.clone());
    let body = builder().payments_api_body("przelewy24", &model)?.to_json()?;
    assert_eq!(body["amount"]["value"], "50.00");
    Ok(())
}

#[test]
fn test_unknown_method_and_wrong_api_fail() -> Result<()> {
    let model = scenario_model()?;

    let err = builder().payments_api_body("bitcoin", &model).unwrap_err();
    assert!(matches!(err, MollieError::UnsupportedMethod { .. }));

    let err = builder().payments_api_body("klarnapaylater", &model).unwrap_err();
    assert!(matches!(err, MollieError::UnsupportedApi { .. }));
    Ok(())
}

#[test]
fn test_model_from_json() -> Result<()> {
    let model: PaymentModel = serde_json::from_value(json!({
        "order_id": "UUID-123",
        "description": "Order UUID-123",
        "order_number": "20004",
        "billing_address": {
            "given_name": "Jan",
            "family_name": "Kowalski",
            "street": "Marszalkowska 1",
            "postal_code": "00-001",
            "city": "Warszawa",
            "country_iso2": "PL"
        },
        "shipping_address": {
            "given_name": "Jan",
            "family_name": "Kowalski",
            "street": "Marszalkowska 1",
            "postal_code": "00-001",
            "city": "Warszawa",
            "country_iso2": "PL"
        },
        "total_amount": {"amount": "49.98", "currency": "usd"},
        "lines": [],
        "currency": "USD",
        "locale": "de_DE",
        "redirect_url": "https://local/redirect",
        "webhook_url": "https://local/notify"
    }))?;

    let body = builder().payments_api_body("mollie_przelewy24", &model)?.to_json()?;
    assert_eq!(body["amount"], json!({"currency": "USD", "value": "49.98"}));
    assert!(body.get("billingEmail").is_none());
    Ok(())
}
