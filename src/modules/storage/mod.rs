//! Storage module for photo uploads
//!
//! Provides a MinIO/S3-compatible client that uploads image bytes and
//! hands back durable public URLs.

mod blob_client;

pub use blob_client::BlobClient;
