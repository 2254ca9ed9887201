//! TypeScript front end for the transpiler.
//!
//! Wraps the standard SWC parser. The transpilation core never reads source
//! text itself; it consumes the already-built syntax tree produced here.

pub mod parse;

pub use parse::{parse_typescript, ParsedFile};
