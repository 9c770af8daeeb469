mod faq_service;

pub use faq_service::{FaqCache, FaqService};
