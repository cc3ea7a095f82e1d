//! Data core of the stock and logistics dashboard: fetches the `/api/...`
//! datasets, normalises loosely typed pt-BR tables into typed series,
//! computes the headline metrics and renders them into a snapshot.

pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod normalize;
pub mod payload;
pub mod present;
pub mod session;
pub mod shape;
pub mod store;

pub use config::{Config, ConfigOrigin};
pub use error::{LoadError, ShapeError};
pub use fetch::{DashboardClient, Endpoint};
pub use present::DashboardSnapshot;
pub use session::{LoadOutcome, Session};
