//! iCalendar line handling (RFC 5545 §3.1).
//!
//! - Lines: pristine/working line buffers, unfolding and rendering
//! - Lexer: content line reader (name, parameters, value)
//! - Scanner: BEGIN/END component boundaries

mod error;
mod lexer;
mod lines;
mod scanner;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{parse_content_line, read_property};
pub use lines::{CRLF, FOLD_PLACEHOLDER, LineRecord, LineStore};
pub use scanner::{
    ComponentPattern, FoundMarker, Marker, find_component, marker, skip_component, span_at,
    top_level_properties,
};
