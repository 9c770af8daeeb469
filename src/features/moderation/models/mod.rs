mod comment;
mod status;

pub use comment::{Comment, CommentDto};
pub use status::{ModerationAction, ModerationEntity, ModerationStatus};
