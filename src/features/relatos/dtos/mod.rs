mod relato_dto;

pub use relato_dto::{
    CreateRelatoDto, CreateRelatoResponseDto, RelatoResponseDto, TestStatusDto,
};
