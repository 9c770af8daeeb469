mod file_dto;

pub use file_dto::{
    AddCategoryDto, AddVersionDto, FileResponseDto, OfficeCategoriesDto,
    UpdateFileDto, UploadFileDto,
};
