//! Generic configuration tree primitives used by higher-level tools.
//!
//! - [`parser`] turns XML bytes into an [`XmlNode`] element tree
//! - [`query`] resolves dotted paths over JSON-shaped trees
//! - [`value`] converts element trees into that JSON shape
//! - [`writer`] emits deterministic pretty JSON to streams or files

pub mod parser;
pub mod query;
pub mod tree;
pub mod value;
pub mod writer;

pub use parser::{parse, parse_file, ParseError};
pub use query::{
    find, find_all, find_first, find_list, find_or, find_path, find_path_str, find_str, has_key,
};
pub use tree::XmlNode;
pub use value::to_value;
pub use writer::{to_json_bytes, write_json, write_json_file, WriteError};
