//! orgtree: an organizational hierarchy kept as an in-memory tree.
//!
//! The [`domain`] layer owns the tree and its structural edits (hire, fire
//! with succession, promote, demote); [`application`] loads rosters and
//! reorganization scripts; [`cli`] is a thin driver on top.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
