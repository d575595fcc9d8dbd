//! Integration tests for the beatscan library and CLI.
//!
//! Run with: `cargo test --test integration`

mod cli;
mod stream_scenarios;
