//! steamdash: a terminal dashboard of Steam games grouped by genre.
//!
//! The pipeline runs once at startup:
//!
//! 1. [`api::fetch_catalog`] downloads the full app list and
//!    [`api::filter_catalog`] drops unnamed and test entries.
//! 2. [`pipeline::enrich`] looks up store details for a prefix of the
//!    catalog, one request at a time with a fixed pause.
//! 3. [`pipeline::DashboardContext`] indexes the enriched games by genre.
//!
//! The [`dashboard`] controller then derives every view from that context;
//! the [`ui`] module hosts it in a terminal.

pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod keybindings;
pub mod pipeline;
pub mod theme;
pub mod ui;
pub mod util;
