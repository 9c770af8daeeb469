mod user_dto;

pub use user_dto::{
    CreateUserDto, RegisterUserDto, UpdateRoleDto, UpdateUserDto, UserResponseDto,
};
