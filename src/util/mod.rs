//! Small helpers shared by the config loader and the terminal UI.
//!
//! - **URL validation**: only `http`/`https` URLs are configured or handed to
//!   the system browser
//! - **Text processing**: store text is cleaned and fitted to terminal columns

mod text;
mod url_validator;

pub use text::{clean_text, decode_entities, display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_http_url, validate_url_for_open, UrlValidationError};
