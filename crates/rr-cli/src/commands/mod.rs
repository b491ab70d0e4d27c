//! CLI command implementations

pub(crate) mod common;
pub(crate) mod diff;
pub(crate) mod ls;
pub(crate) mod run;
