//! Action strings bound to keys and their execution against [`crate::app::App`].

mod dispatcher;
pub mod internal;

pub use dispatcher::dispatch_action;
pub use internal::{
  Action,
  NavAction,
  SelectAction,
  parse_action,
};
