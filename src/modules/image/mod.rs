//! Image payload decoding and plausibility checks
//!
//! Clients submit photos as base64 strings, often with a data-URI prefix
//! and sloppy formatting. This module normalizes and decodes them.

mod codec;

pub use codec::decode_base64_image;
