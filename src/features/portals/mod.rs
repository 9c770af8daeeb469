//! Portal shortcuts (external systems with an icon), reviewed like quick links.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PortalService;
