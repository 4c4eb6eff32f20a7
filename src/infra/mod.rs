pub mod adapters;
pub mod report;
