//! Chat front-end for planbot
//!
//! `Dialogue` holds the conversation rules; `ChatConsole` drives it from a
//! terminal.

mod console;
mod dialogue;

pub use console::ChatConsole;
pub use dialogue::{Dialogue, describe_profile};
