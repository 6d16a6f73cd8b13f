mod relato_service;

pub use relato_service::RelatoService;
