//! Raw message parsing: the boundary with the external MIME library.

pub mod message;
