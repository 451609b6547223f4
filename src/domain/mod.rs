// Domain layer: value types, the payment model, order records and ports (interfaces).

pub mod model;
pub mod money;
pub mod order;
pub mod ports;
