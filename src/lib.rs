//! `mailsink`: pipe-to-disk email attachment extraction.
//!
//! This crate provides the core library: decode one raw RFC-2822 message,
//! gate it on a sender allow-list, classify its MIME parts, persist
//! attachments under collision-free names, and recover legacy uuencoded
//! files embedded in text bodies.

pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod store;
