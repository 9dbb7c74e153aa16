//! Analysis modules.
//!
//! The aggregator holds the statistics; requests name the views built from it.

pub mod aggregator;
pub mod request;

pub use aggregator::*;
pub use request::*;
