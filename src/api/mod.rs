//! API routes module.

pub mod extract;
pub mod handlers;
pub mod portfolio;
pub mod routes;
pub mod security;

pub use routes::create_router;
