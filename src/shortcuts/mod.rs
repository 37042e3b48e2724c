//! Keyboard shortcut dispatch table.
//!
//! A [`ShortcutMap`] binds each [`ShortcutAction`] to a chord string such as
//! `"ctrl+shift+z"`. [`resolve`] turns a [`KeyEvent`] into at most one
//! [`Command`] using a fixed priority order; the host then carries the
//! command out (see [`crate::session`]).

mod action;
mod chord;
mod dispatch;

pub use action::{ShortcutAction, ShortcutMap};
pub use chord::{matches_shortcut, KeyEvent};
pub use dispatch::{resolve, Command, DispatchContext, LabelKeyBindings, Mode, Tool};
