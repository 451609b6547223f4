pub mod builder;
pub mod lines;
pub mod method;
pub mod request;

pub use crate::domain::model::{LineItem, PaymentModel};
pub use crate::domain::ports::Clock;
pub use crate::utils::error::Result;
pub use builder::{bodies_to_json, RequestBody, RequestBuilder};
pub use method::{ApiKind, PaymentMethod};
