//! Office announcements with an optional banner image.
//!
//! | Endpoint | Access |
//! |----------|--------|
//! | `GET /api/announcements`, `/latest` | public, approved only |
//! | `POST`, `PUT /{id}`, `DELETE /{id}` | admin of the office or superadmin |
//! | `/unapproved`, `/{id}/approve`, `/{id}/reject` | superadmin |
//!
//! The latest feed is cached and invalidated on every change that can
//! affect approved announcements.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AnnouncementService;
