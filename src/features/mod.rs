//! Feature modules, one per content type plus accounts and review.

pub mod announcements;
pub mod auth;
pub mod faqs;
pub mod files;
pub mod moderation;
pub mod offices;
pub mod portals;
pub mod quick_links;
pub mod users;
