pub mod model;
pub mod repository;
pub mod service;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
