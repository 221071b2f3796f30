//! Terminal rendering
//!
//! Layout is computed from a [`SessionView`](crate::SessionView) into plain
//! styled lines first, then flushed through crossterm.

pub mod layout;
pub mod terminal;

pub use layout::{Line, LineStyle, compose};
pub use terminal::TerminalRenderer;
