//! The fixed list of offices and the per-office admin workspace.

pub mod handlers;
pub mod models;
pub mod routes;
