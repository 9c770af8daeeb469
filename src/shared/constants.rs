/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// CONTENT DEFAULTS
// =============================================================================

/// Number of announcements returned by the latest feed
pub const LATEST_ANNOUNCEMENTS_LIMIT: i64 = 5;

/// Link used when an announcement is created without one
pub const DEFAULT_ANNOUNCEMENT_LINK: &str = "https://youtube.com";

/// Icon used when a portal is created without one
pub const DEFAULT_PORTAL_ICON: &str = "🔗";

/// Maximum portal title length
pub const MAX_PORTAL_TITLE_LEN: u64 = 50;

/// Maximum announcement image size (10 MiB)
pub const MAX_ANNOUNCEMENT_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Accepted announcement image extensions
pub const ANNOUNCEMENT_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Rejection message shared by every moderated entity
pub const REJECTION_COMMENT_REQUIRED: &str = "Rejection comment required";
