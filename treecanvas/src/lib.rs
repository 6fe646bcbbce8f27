//! Interactive editing of a bounded rooted tree.
//!
//! The [`domain`] layer holds the tree model: an arena of nodes with an id
//! index, a bounded id allocator, shape metrics and the selection. The
//! [`application`] layer forwards user commands to the model and derives
//! presentation data; [`cli`] is the terminal front end.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
