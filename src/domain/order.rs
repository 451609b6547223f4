use crate::domain::model::LineMode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shop payment status "the process has been cancelled".
pub const PAYMENT_STATE_PROCESS_CANCELLED: i32 = 35;

/// A persisted order as far as basket recovery is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub number: String,
    pub invoice_amount: Decimal,
    pub invoice_shipping: Decimal,
    pub internal_comment: String,
    pub order_status_id: i32,
    pub payment_status_id: i32,
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Recomputes the invoice amount from the remaining details plus shipping.
    pub fn calculate_invoice_amount(&mut self) {
        let details: Decimal = self
            .details
            .iter()
            .map(|detail| detail.price * Decimal::from(detail.quantity))
            .sum();
        self.invoice_amount = details + self.invoice_shipping;
    }

    /// Appends `text` to the internal comment, separated by a blank line.
    pub fn append_internal_comment(&mut self, text: &str) {
        if !self.internal_comment.is_empty() {
            self.internal_comment.push_str("\n\n");
        }
        self.internal_comment.push_str(text);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub article_id: i64,
    pub article_number: String,
    pub price: Decimal,
    pub quantity: u32,
    pub mode: LineMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: i64,
    pub code: String,
}

/// One attribute row, column name to value.
pub type AttributeRow = BTreeMap<String, serde_json::Value>;

/// Columns that identify a basket attribute row and must never be copied.
pub const ATTRIBUTE_ID_COLUMNS: [&str; 3] = ["id", "basketID", "basket_item_id"];

/// Builds the update for a restored basket item from the original order detail attributes.
///
/// Identifier columns are skipped, and only columns present on both sides are copied.
pub fn merge_attributes(basket: &AttributeRow, detail: &AttributeRow) -> AttributeRow {
    basket
        .keys()
        .filter(|column| !ATTRIBUTE_ID_COLUMNS.contains(&column.as_str()))
        .filter_map(|column| {
            detail
                .get(column)
                .map(|value| (column.clone(), value.clone()))
        })
        .collect()
}
