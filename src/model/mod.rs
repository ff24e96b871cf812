//! Core data model types: the decoded MIME tree, sender addresses, and the
//! records produced by a processing run.

pub mod address;
pub mod attachment;
pub mod message;
pub mod part;
