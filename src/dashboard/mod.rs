//! The dashboard controller.
//!
//! Views are derived, never stored: [`compute_view`] takes the current
//! [`ViewState`] and an [`Interaction`] and returns the next state together
//! with a [`ViewPayload`] (chart points, back-control visibility, entry cards).
//! The terminal UI is one host for it; `--json` output is another.

mod sampling;
mod state;
mod view;

pub use sampling::{sample_bucket, DrilldownSampling};
pub use state::{compute_view, initial_view, render_view, Interaction, ViewOptions, ViewState};
pub use view::{BubblePoint, EntryCard, ViewPayload};
