//! Configuration types
//!
//! Board-agnostic configuration structures and the parser for the
//! embedded `feeder.toml` text.

pub mod hardware;
pub mod parse;
pub mod timing;

pub use hardware::*;
pub use parse::{parse_config, ParseError, ParseErrorKind};
pub use timing::*;
