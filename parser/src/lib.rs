//! @ai:module:intent Terraform symbol scanner library backing semantic queries
//! @ai:module:layer infrastructure
//! @ai:module:public_api symbol, index, search, parser, language, output, error
//! @ai:module:stateless true
//!
//! # tfsym
//!
//! Scans Terraform/HCL sources for top-level blocks and answers two kinds of
//! queries: symbol lookup by name path and regex pattern search.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tfsym::{output, search, SymbolIndex, SymbolQuery};
//! use std::path::Path;
//!
//! let index = SymbolIndex::build(Path::new("infra")).unwrap();
//! let symbols = index
//!     .find_symbol(&SymbolQuery::new("aws_instance").substring())
//!     .unwrap();
//! println!("{}", output::format_symbols(&symbols, output::OutputFormat::JsonPretty));
//!
//! let matches = search::search_pattern(Path::new("infra"), "var\\.region", None).unwrap();
//! println!("{}", search::render_matches(&matches));
//! ```

pub mod error;
pub mod index;
pub mod language;
pub mod output;
pub mod parser;
pub mod search;
pub mod symbol;

pub use error::{Error, Result};
pub use index::{SkippedFile, SymbolIndex, SymbolQuery};
pub use language::{detect_file_kind, is_supported_file, BlockType, FileKind};
pub use output::{format_matches, format_parsed_file, format_symbols, to_json, OutputFormat};
pub use parser::{parse_file, parse_source};
pub use search::{render_matches, search_pattern, PatternMatch, DEFAULT_FILE_GLOB};
pub use symbol::{Block, ParsedFile, SymbolDescriptor, SymbolKind};
