//! Downstream reporting: summary database rows and the receipt mail.
//!
//! Both are optional, flag-gated, and run only after the core pipeline has
//! fully succeeded.

pub mod db;
pub mod reply;
