//! Command handlers for promptdrop
//!
//! Each submodule implements one CLI command: `serve` runs the relay
//! endpoint, `send` stages local files and submits them to a running relay.

pub mod send;
pub mod serve;
