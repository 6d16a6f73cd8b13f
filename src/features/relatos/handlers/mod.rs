mod relato_handler;

pub use relato_handler::*;
