mod user;

pub use user::{name_from_email, User, UserRole, DEFAULT_PROFILE_PIC};
