//! HTTP Transport layer for the Model Context Protocol
//!
//! Provides the external API routing, including the root JSON-RPC listener and
//! other endpoints.

pub mod handlers;
