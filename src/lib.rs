//! Bastion - Configurable HTTP/1.1 Server
//!
//! An nginx-style HTTP server: a configuration file describes virtual
//! servers and location routes, the server parses requests into a
//! flag-tracked model and serves them accordingly.

pub mod config;
pub mod http;
pub mod server;
