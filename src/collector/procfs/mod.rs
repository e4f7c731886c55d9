//! Status engine for the Linux `/proc` filesystem.

pub mod parser;
mod status;

pub use parser::{ParseError, parse_status_fields};
pub use status::ProcStatusEngine;
