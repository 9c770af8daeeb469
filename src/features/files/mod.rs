//! File archive with versions and review.
//!
//! A file is either an upload stored under the upload directory or an
//! external link. Adding a version makes it current and keeps the history.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::FileService;
