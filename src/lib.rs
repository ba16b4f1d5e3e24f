// Library for tests and tools to access modules

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod routes;
pub mod version;
pub mod violation_repo;
pub mod worker;
