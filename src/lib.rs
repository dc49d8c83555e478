//! Spraywad - GoldSrc spray converter
//!
//! Turns an image file into a `tempdecal.wad` spray container.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
