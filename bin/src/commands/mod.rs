//! CLI command implementations.

pub(crate) mod dump;
pub(crate) mod encode;
pub(crate) mod info;
pub(crate) mod verify;
