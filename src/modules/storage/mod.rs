//! Storage module for file management
//!
//! Uploaded files and announcement images live on local disk under the
//! configured upload directory.

mod local_storage;

pub use local_storage::{content_type_for, LocalStorage};
