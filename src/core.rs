//! Terminal-independent state machines: listing, cursor index, selection,
//! viewport, column layout, search and command execution.

pub mod command;
pub mod fs_ops;
pub mod index;
pub mod layout;
pub mod listing;
pub mod search;
pub mod selection;
pub mod viewport;
