use crate::domain::model::{BasketLine, LineItem, LineMode, LineType};
use crate::domain::money::{round_amount, Currency, Money};
use crate::utils::error::{MollieError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classifies a basket line for Mollie.
///
/// Checks run in a fixed order and the first match wins, so a negative-priced
/// voucher is a discount because of its mode, not its price.
pub fn classify_line(line: &BasketLine, unit_price: Decimal) -> LineType {
    if line.order_number.contains("surcharge") {
        return LineType::Surcharge;
    }

    if line.order_number.contains("discount") {
        return LineType::Discount;
    }

    if line.esd_article {
        return LineType::Digital;
    }

    if line.mode == LineMode::Voucher {
        return LineType::Discount;
    }

    if unit_price < Decimal::ZERO {
        return LineType::Discount;
    }

    LineType::Physical
}

/// How the customer's group is taxed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxContext {
    pub charge_vat: bool,
    /// The shop's `show_net` user flag. It is `false` when basket prices are
    /// stored net, in which case they are grossed up before they go to Mollie.
    pub show_net: bool,
}

/// Turns basket rows into priced Mollie lines.
pub fn build_line_items(
    lines: &[BasketLine],
    tax: TaxContext,
    currency: &Currency,
) -> Result<Vec<LineItem>> {
    lines
        .iter()
        .map(|line| build_line_item(line, tax, currency))
        .collect()
}

fn build_line_item(line: &BasketLine, tax: TaxContext, currency: &Currency) -> Result<LineItem> {
    let quantity = Decimal::from(line.quantity);
    let hundred = Decimal::ONE_HUNDRED;
    let invalid = |reason: &str| MollieError::InvalidAmount {
        value: line.price.to_string(),
        reason: format!("{} for line {}", reason, line.order_number),
    };

    let mut unit_price = round_amount(line.price);
    let net_price = round_amount(line.net_price);
    let mut total_amount = unit_price
        .checked_mul(quantity)
        .ok_or_else(|| invalid("total overflows"))?;
    let mut vat_amount = Decimal::ZERO;

    if tax.charge_vat && !tax.show_net {
        let gross = line
            .tax_rate
            .checked_add(hundred)
            .and_then(|factor| unit_price.checked_mul(factor))
            .and_then(|scaled| scaled.checked_div(hundred))
            .ok_or_else(|| invalid("gross price overflows"))?;
        unit_price = round_amount(gross);
        total_amount = unit_price
            .checked_mul(quantity)
            .ok_or_else(|| invalid("total overflows"))?;
    }

    if tax.charge_vat {
        // A tax rate of -100 divides by zero and is rejected.
        let share = line
            .tax_rate
            .checked_add(hundred)
            .and_then(|divisor| line.tax_rate.checked_div(divisor))
            .and_then(|share| total_amount.checked_mul(share))
            .ok_or_else(|| invalid("VAT cannot be computed"))?;
        vat_amount = round_amount(share);
    }

    let vat_rate = if vat_amount.is_zero() {
        Decimal::ZERO
    } else {
        line.tax_rate
    };

    Ok(LineItem {
        article_id: line.article_id,
        basket_item_id: Some(line.basket_item_id),
        name: line.article_name.clone(),
        sku: line.order_number.clone(),
        line_type: classify_line(line, unit_price),
        quantity: line.quantity,
        unit_price: Money::new(unit_price, currency.clone()),
        net_price: Money::new(net_price, currency.clone()),
        vat_rate,
        vat_amount: Money::new(vat_amount, currency.clone()),
        total_amount: Money::new(total_amount, currency.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn basket_line(order_number: &str, price: Decimal) -> BasketLine {
        BasketLine {
            basket_item_id: 100,
            article_id: 5,
            article_name: "Line".to_string(),
            order_number: order_number.to_string(),
            quantity: 2,
            price,
            net_price: price,
            tax_rate: dec!(19),
            esd_article: false,
            mode: LineMode::Product,
        }
    }

    #[test]
    fn test_classification_examples() {
        let surcharge = basket_line("ABC-surcharge-1", dec!(2.50));
        assert_eq!(classify_line(&surcharge, dec!(2.50)), LineType::Surcharge);

        let mut voucher = basket_line("VOUCHER", dec!(5));
        voucher.mode = LineMode::Voucher;
        assert_eq!(classify_line(&voucher, dec!(5)), LineType::Discount);
        assert_eq!(classify_line(&voucher, dec!(-5)), LineType::Discount);

        let rebate = basket_line("SW-REBATE", dec!(-10.00));
        assert_eq!(classify_line(&rebate, dec!(-10.00)), LineType::Discount);

        let product = basket_line("SW10001", dec!(10.00));
        assert_eq!(classify_line(&product, dec!(10.00)), LineType::Physical);
    }

    #[test]
    fn test_classification_order_wins() {
        // "surcharge" is checked before "discount" and before the ESD flag.
        let mut line = basket_line("discount-surcharge", dec!(-1));
        line.esd_article = true;
        assert_eq!(classify_line(&line, dec!(-1)), LineType::Surcharge);

        let mut download = basket_line("EBOOK-1", dec!(-3));
        download.esd_article = true;
        download.mode = LineMode::Voucher;
        assert_eq!(classify_line(&download, dec!(-3)), LineType::Digital);
    }

    #[test]
    fn test_gross_prices_with_vat() {
        let eur = Currency::parse("EUR").unwrap();
        let tax = TaxContext {
            charge_vat: true,
            show_net: true,
        };
        let items = build_line_items(&[basket_line("SW1", dec!(11.90))], tax, &eur).unwrap();
        let item = &items[0];
        assert_eq!(item.unit_price.value(), "11.90");
        assert_eq!(item.total_amount.value(), "23.80");
        // 23.80 * 19 / 119
        assert_eq!(item.vat_amount.value(), "3.80");
        assert_eq!(item.vat_rate, dec!(19));
        assert_eq!(item.basket_item_id, Some(100));
    }

    #[test]
    fn test_net_prices_are_grossed_up() {
        let eur = Currency::parse("EUR").unwrap();
        let tax = TaxContext {
            charge_vat: true,
            show_net: false,
        };
        let items = build_line_items(&[basket_line("SW1", dec!(10.00))], tax, &eur).unwrap();
        assert_eq!(items[0].unit_price.value(), "11.90");
        assert_eq!(items[0].total_amount.value(), "23.80");
        assert_eq!(items[0].net_price.value(), "10.00");
    }

    #[test]
    fn test_no_vat_charged() {
        let eur = Currency::parse("EUR").unwrap();
        let items =
            build_line_items(&[basket_line("SW1", dec!(10.004))], TaxContext::default(), &eur)
                .unwrap();
        assert_eq!(items[0].unit_price.value(), "10.00");
        assert_eq!(items[0].vat_amount.value(), "0.00");
        assert_eq!(items[0].vat_rate, Decimal::ZERO);
        assert_eq!(items[0].line_type, LineType::Physical);
    }

    #[test]
    fn test_degenerate_tax_rate_is_invalid_amount() {
        let eur = Currency::parse("EUR").unwrap();
        let mut line = basket_line("SW1", dec!(10.00));
        line.tax_rate = dec!(-100);
        let tax = TaxContext {
            charge_vat: true,
            show_net: true,
        };
        let err = build_line_items(&[line], tax, &eur).unwrap_err();
        assert!(matches!(err, MollieError::InvalidAmount { .. }));
    }

    #[test]
    fn test_overflowing_price_is_invalid_amount() {
        let eur = Currency::parse("EUR").unwrap();
        let line = basket_line("SW1", Decimal::MAX);
        let err = build_line_items(&[line], TaxContext::default(), &eur).unwrap_err();
        assert!(matches!(err, MollieError::InvalidAmount { .. }));
    }
}
