pub mod batch;
pub mod comparator;
pub mod ports;
pub mod registry;
pub mod runner;
pub mod sql;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
