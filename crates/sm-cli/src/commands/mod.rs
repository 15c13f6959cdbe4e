//! Command implementations

pub mod apply;
pub(crate) mod common;
pub mod ls;
pub mod reconcile;
pub mod revert;
pub mod status;
