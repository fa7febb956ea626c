//! GeoPhoto web module
//! Upload form, JSON extraction API, health and stats endpoints

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;
pub mod types;

pub use handlers::AppState;
pub use middleware::start_cleanup_task;
pub use routes::create_router;
pub use types::*;
