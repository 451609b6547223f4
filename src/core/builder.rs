use crate::core::method::{ApiKind, PaymentMethod};
use crate::core::request::{
    build_orders_api_body, build_payments_api_body, OrdersApiBody, PaymentsApiBody,
};
use crate::domain::model::PaymentModel;
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use serde::Serialize;

/// A built request, ready to be posted by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Payments(PaymentsApiBody),
    Orders(OrdersApiBody),
}

impl RequestBody {
    pub fn api(&self) -> ApiKind {
        match self {
            RequestBody::Payments(_) => ApiKind::Payments,
            RequestBody::Orders(_) => ApiKind::Orders,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Collects built bodies into one JSON object keyed by API, e.g.
/// `{"payments": {...}, "orders": {...}}`.
pub fn bodies_to_json(bodies: &[RequestBody]) -> Result<serde_json::Value> {
    let mut document = serde_json::Map::new();
    for body in bodies {
        document.insert(body.api().key().to_string(), body.to_json()?);
    }
    Ok(serde_json::Value::Object(document))
}

/// Dispatches method codes to their request builders.
///
/// The clock is read once per build call, so two builds straddling midnight
/// may produce different expiration dates.
pub struct RequestBuilder<C: Clock> {
    clock: C,
}

impl<C: Clock> RequestBuilder<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn payments_api_body(
        &self,
        method_code: &str,
        model: &PaymentModel,
    ) -> Result<PaymentsApiBody> {
        let method = PaymentMethod::from_code(method_code)?;
        tracing::debug!(
            method = %method,
            order = %model.order_number,
            "Building Payments API request"
        );
        build_payments_api_body(method, model, self.clock.now())
    }

    pub fn orders_api_body(
        &self,
        method_code: &str,
        model: &PaymentModel,
    ) -> Result<OrdersApiBody> {
        let method = PaymentMethod::from_code(method_code)?;
        tracing::debug!(
            method = %method,
            order = %model.order_number,
            lines = model.lines.len(),
            "Building Orders API request"
        );
        build_orders_api_body(method, model, self.clock.now())
    }

    pub fn build(
        &self,
        method_code: &str,
        api: ApiKind,
        model: &PaymentModel,
    ) -> Result<RequestBody> {
        match api {
            ApiKind::Payments => self
                .payments_api_body(method_code, model)
                .map(RequestBody::Payments),
            ApiKind::Orders => self
                .orders_api_body(method_code, model)
                .map(RequestBody::Orders),
        }
    }

    /// Builds every request style the method supports, Payments API first.
    pub fn build_all(&self, method_code: &str, model: &PaymentModel) -> Result<Vec<RequestBody>> {
        let method = PaymentMethod::from_code(method_code)?;
        [ApiKind::Payments, ApiKind::Orders]
            .into_iter()
            .filter(|api| method.supports(*api))
            .map(|api| self.build(method.code(), api, model))
            .collect()
    }
}
