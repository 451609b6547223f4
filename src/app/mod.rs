pub mod basket_restore;

pub use basket_restore::{
    BasketRestorer, FailureAction, RestoreFailure, RestorePolicy, RestoreReport, RestoreStep,
};
