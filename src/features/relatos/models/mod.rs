mod relato;

pub use relato::{CreateRelato, Foto, Relato, RelatoWithFotos};
