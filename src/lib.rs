//! Lantern - static file server
//!
//! Serves the regular files below one directory over a small HTTP/1.1
//! subset, one task per connection.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
