//! Domain objects parsing and resource/tool integrations
//!
//! Provides the core travel planning logic exposed over the MCP protocol

pub mod geo;
pub mod prompts;
pub mod resources;
pub mod tools;
pub mod utils;
