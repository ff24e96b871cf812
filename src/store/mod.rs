//! Attachment persistence: the destination directory and its naming rules.

pub mod writer;
