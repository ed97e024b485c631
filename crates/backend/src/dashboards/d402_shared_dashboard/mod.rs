//! Public read-only view of a shared dashboard.
//!
//! A share token resolves to one active dashboard. Every widget on it is
//! computed over the lead data of the dashboard's tenant within the
//! configured share period.

pub mod context;
pub mod custom_fields;
pub mod error;
pub mod formula;
pub mod lead_stats;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;
pub mod variables;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ShareError, StoreError};
pub use repository::SeaOrmShareStore;
pub use service::get_shared_dashboard;
pub use store::ShareStore;
