//! Review-cycle analytics and dashboard loading

pub mod analytics;
pub mod demo;
pub mod format;
pub mod loader;
pub mod session;
pub mod source;
pub mod store;

#[cfg(test)]
mod analytics_test;

pub use demo::DEMO_TOKEN;
pub use loader::{load_pr_detail, Dashboard, DashboardLoader, LoadError, PrDetail};
pub use session::{CommittedDashboard, DashboardSession, LoadTicket, SessionRegistry};
pub use source::DataSource;
pub use store::MetricsStore;
