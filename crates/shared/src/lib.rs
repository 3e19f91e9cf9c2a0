//! Types shared between the tracking transport, the command channel and the
//! navigation core.

pub mod domain;
pub mod error;
pub mod protocol;
