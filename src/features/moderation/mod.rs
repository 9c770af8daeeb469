//! Pending, approved and rejected lifecycle shared by files,
//! announcements, quick links and portals.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::ModerationService;
