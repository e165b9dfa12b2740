pub mod quote;
pub mod snapshot;
pub mod turnover;

pub use quote::*;
pub use snapshot::*;
pub use turnover::*;
