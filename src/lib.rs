// Library for tests to access modules

pub mod config;
pub mod docker_repo;
pub mod history_repo;
pub mod hub;
pub mod models;
pub mod orchestrator;
pub mod probe;
pub mod routes;
pub mod session;
pub mod site;
pub mod sources;
pub mod sysinfo_repo;
pub mod version;
pub mod worker;
