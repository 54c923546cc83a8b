//! Backend for a virtual try-on studio.
//!
//! Accepts client images over HTTP, asks a Gemini image model to transform
//! them (model photo, garment extraction, try-on, pose variation) and returns
//! the generated image as a base64 data URL.

pub mod ai;
pub mod codec;
pub mod config;
pub mod error;
pub mod prompts;
pub mod server;
pub mod studio;

pub use error::{Error, Result};
