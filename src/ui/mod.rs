//! Terminal User Interface module.
//!
//! Hosts the dashboard controller in a ratatui terminal: the left panel is a
//! bubble chart of the current view, the right panel shows the selected
//! genre or the drilldown's game cards.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Layout and overlay dispatch
//! - `chart` - Bubble layout and canvas widget
//! - `cards` - Genre summary and game card panel
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod cards;
mod chart;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

pub use chart::{layout_bubbles, BubbleSlot};
pub use loop_runner::{run, Action};
