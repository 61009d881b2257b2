pub mod api;
pub mod distance;
pub mod handlers;
pub mod metrics;
pub mod prediction;
#[allow(clippy::module_inception)]
pub mod server;
