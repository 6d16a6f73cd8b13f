pub mod relatos;
