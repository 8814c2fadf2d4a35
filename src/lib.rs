//! Restaurant back-office procurement core: product and supplier catalog,
//! purchase-request lifecycle, append-only purchase price history, and a
//! cheapest-supplier recommendation engine over it.

pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod grouping;
pub mod ids;
pub mod pricing;
pub mod request;
pub mod service;
pub mod store;
pub mod timestamp;
