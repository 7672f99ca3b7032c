//! Utility functions shared across ttfblit

pub mod color;

pub use color::parse_hex_color;
