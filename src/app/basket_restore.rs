use crate::domain::model::LineMode;
use crate::domain::order::{merge_attributes, Order, OrderDetail, PAYMENT_STATE_PROCESS_CANCELLED};
use crate::domain::ports::{
    AttributeStore, OrderHistory, OrderRepository, ShopBasket, StockService, VoucherRepository,
};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const RETRY_COMMENT: &str = "The payment on this order failed, the customer is retrying. ";

/// The collaborator calls made while restoring a basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreStep {
    LoadOrder,
    ClearBasket,
    LookupVoucher,
    RemoveOrderDetail,
    AddVoucher,
    AddArticle,
    CopyAttributes,
    ResetQuantity,
    RestoreStock,
    WriteHistory,
    SaveOrder,
    RefreshBasket,
}

impl RestoreStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreStep::LoadOrder => "load_order",
            RestoreStep::ClearBasket => "clear_basket",
            RestoreStep::LookupVoucher => "lookup_voucher",
            RestoreStep::RemoveOrderDetail => "remove_order_detail",
            RestoreStep::AddVoucher => "add_voucher",
            RestoreStep::AddArticle => "add_article",
            RestoreStep::CopyAttributes => "copy_attributes",
            RestoreStep::ResetQuantity => "reset_quantity",
            RestoreStep::RestoreStock => "restore_stock",
            RestoreStep::WriteHistory => "write_history",
            RestoreStep::SaveOrder => "save_order",
            RestoreStep::RefreshBasket => "refresh_basket",
        }
    }

    fn default_action(&self) -> FailureAction {
        match self {
            RestoreStep::LoadOrder | RestoreStep::SaveOrder => FailureAction::Abort,
            _ => FailureAction::Continue,
        }
    }
}

impl fmt::Display for RestoreStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureAction {
    /// Log the failure, record it in the report and carry on.
    Continue,
    /// Stop restoring and return the error.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorePolicy {
    /// Zero the ordered quantity of each detail and write the article stock back.
    #[serde(default)]
    pub reset_stock: bool,
    /// Mark the failed order's payment as cancelled and record it in the history.
    #[serde(default)]
    pub cancel_failed_orders: bool,
    /// Per-step overrides of the default failure handling.
    #[serde(default)]
    pub on_failure: BTreeMap<RestoreStep, FailureAction>,
}

impl RestorePolicy {
    pub fn action(&self, step: RestoreStep) -> FailureAction {
        self.on_failure
            .get(&step)
            .copied()
            .unwrap_or_else(|| step.default_action())
    }

    pub fn with_action(mut self, step: RestoreStep, action: FailureAction) -> Self {
        self.on_failure.insert(step, action);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreFailure {
    pub step: RestoreStep,
    pub message: String,
}

/// What a restore run did, including the failures it carried on past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub order_id: i64,
    pub order_found: bool,
    pub restored_articles: usize,
    pub restored_vouchers: Vec<String>,
    pub failures: Vec<RestoreFailure>,
}

impl RestoreReport {
    fn new(order_id: i64) -> Self {
        Self {
            order_id,
            order_found: false,
            restored_articles: 0,
            restored_vouchers: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rebuilds the customer's basket from an order whose payment failed.
pub struct BasketRestorer {
    orders: Arc<dyn OrderRepository>,
    basket: Arc<dyn ShopBasket>,
    vouchers: Arc<dyn VoucherRepository>,
    history: Arc<dyn OrderHistory>,
    attributes: Arc<dyn AttributeStore>,
    stock: Arc<dyn StockService>,
    policy: RestorePolicy,
}

impl BasketRestorer {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        basket: Arc<dyn ShopBasket>,
        vouchers: Arc<dyn VoucherRepository>,
        history: Arc<dyn OrderHistory>,
        attributes: Arc<dyn AttributeStore>,
        stock: Arc<dyn StockService>,
    ) -> Self {
        Self {
            orders,
            basket,
            vouchers,
            history,
            attributes,
            stock,
            policy: RestorePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RestorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RestorePolicy {
        &self.policy
    }

    /// Restores the basket of `order_id`. The basket is always refreshed, even
    /// when the order is missing or has no details.
    pub async fn restore_basket(&self, order_id: i64) -> Result<RestoreReport> {
        let mut report = RestoreReport::new(order_id);
        tracing::info!(order_id, "Restoring basket from failed order");

        let loaded = self.orders.get_order_by_id(order_id).await;
        let order = self
            .settle(&mut report, RestoreStep::LoadOrder, loaded)?
            .flatten();

        match order {
            Some(order) if !order.details.is_empty() => {
                report.order_found = true;
                self.restore_order(order, &mut report).await?;
            }
            Some(_) => tracing::debug!(order_id, "Order has no details, nothing to restore"),
            None => tracing::debug!(order_id, "Order not found, nothing to restore"),
        }

        self.settle(&mut report, RestoreStep::RefreshBasket, self.basket.refresh_basket().await)?;

        tracing::info!(
            order_id,
            articles = report.restored_articles,
            vouchers = report.restored_vouchers.len(),
            failures = report.failures.len(),
            "Basket restore finished"
        );
        Ok(report)
    }

    async fn restore_order(&self, mut order: Order, report: &mut RestoreReport) -> Result<()> {
        self.settle(report, RestoreStep::ClearBasket, self.basket.delete_basket().await)?;

        let mut comment = String::from(RETRY_COMMENT);
        let details = order.details.clone();

        for detail in &details {
            if detail.mode == LineMode::Voucher {
                self.restore_voucher(&mut order, detail, &mut comment, report)
                    .await?;
            } else {
                self.restore_article(detail, report).await?;
            }

            if self.policy.reset_stock {
                self.reset_quantity(&mut order, detail, report).await?;
            }
        }

        if !order.internal_comment.contains(&comment) {
            order.append_internal_comment(&comment);
        }

        order.calculate_invoice_amount();

        if self.policy.cancel_failed_orders {
            let written = self
                .history
                .add_order_history(
                    &order,
                    order.order_status_id,
                    order.order_status_id,
                    order.payment_status_id,
                    PAYMENT_STATE_PROCESS_CANCELLED,
                )
                .await;
            self.settle(report, RestoreStep::WriteHistory, written)?;
            order.payment_status_id = PAYMENT_STATE_PROCESS_CANCELLED;
        }

        self.settle(report, RestoreStep::SaveOrder, self.orders.save_order(&order).await)?;
        Ok(())
    }

    async fn restore_voucher(
        &self,
        order: &mut Order,
        detail: &OrderDetail,
        comment: &mut String,
        report: &mut RestoreReport,
    ) -> Result<()> {
        let voucher = self
            .settle(
                report,
                RestoreStep::LookupVoucher,
                self.vouchers.get_voucher_by_id(detail.article_id).await,
            )?
            .flatten();

        let Some(voucher) = voucher else {
            tracing::debug!(detail_id = detail.id, "Voucher not found, line skipped");
            return Ok(());
        };

        let removed = self.orders.remove_order_detail(detail.id).await;
        if self
            .settle(report, RestoreStep::RemoveOrderDetail, removed)?
            .is_some()
        {
            order.details.retain(|d| d.id != detail.id);
        }

        comment.push_str(&format!(
            "Voucher code ({}) is removed from this order and reused in the newly created basket. ",
            voucher.code
        ));

        let added = self.basket.add_voucher(&voucher.code).await;
        if self.settle(report, RestoreStep::AddVoucher, added)?.is_some() {
            report.restored_vouchers.push(voucher.code.clone());
        }

        order.invoice_amount -= detail.price;
        Ok(())
    }

    async fn restore_article(
        &self,
        detail: &OrderDetail,
        report: &mut RestoreReport,
    ) -> Result<()> {
        let added = self
            .basket
            .add_article(&detail.article_number, detail.quantity)
            .await;

        let Some(basket_item_id) = self.settle(report, RestoreStep::AddArticle, added)? else {
            return Ok(());
        };
        report.restored_articles += 1;

        if let Some(basket_item_id) = basket_item_id {
            let copied = self.copy_attributes(basket_item_id, detail.id).await;
            self.settle(report, RestoreStep::CopyAttributes, copied)?;
        }
        Ok(())
    }

    async fn copy_attributes(&self, basket_item_id: i64, detail_id: i64) -> Result<()> {
        let Some(basket) = self.attributes.basket_attributes(basket_item_id).await? else {
            return Ok(());
        };
        let Some(detail) = self.attributes.order_detail_attributes(detail_id).await? else {
            return Ok(());
        };

        let update = merge_attributes(&basket, &detail);
        if update.is_empty() {
            return Ok(());
        }

        tracing::debug!(basket_item_id, columns = update.len(), "Copying order attributes");
        self.attributes
            .update_basket_attributes(basket_item_id, &update)
            .await
    }

    async fn reset_quantity(
        &self,
        order: &mut Order,
        detail: &OrderDetail,
        report: &mut RestoreReport,
    ) -> Result<()> {
        // Vouchers removed above are gone from the order.
        let Some(kept) = order.details.iter_mut().find(|d| d.id == detail.id) else {
            return Ok(());
        };
        kept.quantity = 0;

        let saved = self.orders.save_order_detail(kept).await;
        self.settle(report, RestoreStep::ResetQuantity, saved)?;

        let restored = self.stock.restore_stock(&detail.article_number).await;
        self.settle(report, RestoreStep::RestoreStock, restored)?;
        Ok(())
    }

    /// Applies the failure policy to one collaborator result.
    ///
    /// `Ok(None)` means the step failed and the policy said to carry on.
    fn settle<T>(
        &self,
        report: &mut RestoreReport,
        step: RestoreStep,
        result: Result<T>,
    ) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) => match self.policy.action(step) {
                FailureAction::Abort => {
                    tracing::error!(
                        order_id = report.order_id,
                        step = %step,
                        error = %e,
                        "Basket restore aborted"
                    );
                    Err(e)
                }
                FailureAction::Continue => {
                    tracing::warn!(
                        order_id = report.order_id,
                        step = %step,
                        error = %e,
                        "Basket restore step failed, continuing"
                    );
                    report.failures.push(RestoreFailure {
                        step,
                        message: e.to_string(),
                    });
                    Ok(None)
                }
            },
        }
    }
}
