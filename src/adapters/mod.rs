// Adapters layer: concrete implementations of domain ports that do not belong to the shop.

pub mod clock;

pub use clock::{FixedClock, SystemClock};
