//! Quick links shown on the dashboard.
//!
//! Links are created by office admins and go through review before they are
//! listed publicly. Editing a link sends it back to review.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::QuickLinkService;
