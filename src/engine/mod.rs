//! Matching engine: decoder, history window, partition matcher, resolver.
//!
//! `Engine` is the only public entry point; the stages below it are internal
//! and exercised through their own unit tests plus `tests.rs`.

mod core;
mod decode;
mod matcher;
mod resolve;
mod window;

pub use self::core::{Engine, EngineStats};
pub use self::decode::DecodedByte;
