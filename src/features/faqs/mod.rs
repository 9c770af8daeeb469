//! Frequently asked questions per office, with keyword search and
//! duplicate detection for new questions.

pub mod dtos;
pub mod handlers;
pub mod keyword_search;
pub mod models;
pub mod routes;
pub mod services;

pub use services::FaqService;
