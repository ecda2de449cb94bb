//! Transport layer for the geonear server
//!
//! Available transports:
//! - `http` - HTTP/JSON API built on axum

pub mod http;
