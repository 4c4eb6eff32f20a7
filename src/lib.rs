pub use pairql_app as app;
pub use pairql_domain as domain;
pub use pairql_infra as infra;

pub mod error;
