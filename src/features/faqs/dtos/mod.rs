mod faq_dto;

pub use faq_dto::{
    CreateFaqDto, FaqResponseDto, ScoredFaqDto, SearchQuery, SimilarQuery, UpdateFaqDto,
};
