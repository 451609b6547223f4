use crate::domain::order::{AttributeRow, Order, OrderDetail, Voucher};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the current time; expiration dates are derived from it at build time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order_by_id(&self, order_id: i64) -> Result<Option<Order>>;
    async fn remove_order_detail(&self, detail_id: i64) -> Result<()>;
    async fn save_order_detail(&self, detail: &OrderDetail) -> Result<()>;
    async fn save_order(&self, order: &Order) -> Result<()>;
}

/// The session basket of the current customer.
#[async_trait]
pub trait ShopBasket: Send + Sync {
    async fn delete_basket(&self) -> Result<()>;
    /// Returns the new basket item id when the shop created a row.
    async fn add_article(&self, article_number: &str, quantity: u32) -> Result<Option<i64>>;
    async fn add_voucher(&self, voucher_code: &str) -> Result<()>;
    async fn refresh_basket(&self) -> Result<()>;
}

#[async_trait]
pub trait VoucherRepository: Send + Sync {
    async fn get_voucher_by_id(&self, voucher_id: i64) -> Result<Option<Voucher>>;
}

#[async_trait]
pub trait OrderHistory: Send + Sync {
    async fn add_order_history(
        &self,
        order: &Order,
        previous_order_status: i32,
        order_status: i32,
        previous_payment_status: i32,
        payment_status: i32,
    ) -> Result<()>;
}

#[async_trait]
pub trait AttributeStore: Send + Sync {
    async fn basket_attributes(&self, basket_item_id: i64) -> Result<Option<AttributeRow>>;
    async fn order_detail_attributes(&self, detail_id: i64) -> Result<Option<AttributeRow>>;
    async fn update_basket_attributes(&self, basket_item_id: i64, update: &AttributeRow)
        -> Result<()>;
}

#[async_trait]
pub trait StockService: Send + Sync {
    /// Writes the article stock back so the shop re-evaluates it after a quantity reset.
    async fn restore_stock(&self, article_number: &str) -> Result<()>;
}
