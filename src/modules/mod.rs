//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the image payload codec and the object storage client.

pub mod image;
pub mod storage;
