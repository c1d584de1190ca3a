//! @ai:module:intent Classify Terraform source files and block keywords
//! @ai:module:layer domain
//! @ai:module:public_api FileKind, BlockType, detect_file_kind, is_supported_file
//! @ai:module:stateless true

use crate::symbol::SymbolKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Kind of Terraform source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// HCL configuration (`*.tf`)
    Configuration,
    /// Variable definitions (`*.tfvars`)
    Variables,
}

impl FileKind {
    /// @ai:intent Get file extensions for this kind
    /// @ai:effects pure
    pub fn extensions(&self) -> &[&str] {
        match self {
            FileKind::Configuration => &["tf"],
            FileKind::Variables => &["tfvars"],
        }
    }

    /// @ai:intent Get kind name as string
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            FileKind::Configuration => "terraform",
            FileKind::Variables => "tfvars",
        }
    }

    /// @ai:intent Whether files of this kind declare top-level blocks
    /// @ai:effects pure
    pub fn declares_blocks(&self) -> bool {
        matches!(self, FileKind::Configuration)
    }
}

/// @ai:intent Top-level Terraform block keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Resource,
    Data,
    Variable,
    Output,
    Module,
    Provider,
    Terraform,
    Locals,
}

impl BlockType {
    /// @ai:intent Parse a block keyword, None for anything that is not a top-level block
    /// @ai:example ("resource") -> Some(Resource)
    /// @ai:example ("ingress") -> None
    /// @ai:effects pure
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "resource" => Some(BlockType::Resource),
            "data" => Some(BlockType::Data),
            "variable" => Some(BlockType::Variable),
            "output" => Some(BlockType::Output),
            "module" => Some(BlockType::Module),
            "provider" => Some(BlockType::Provider),
            "terraform" => Some(BlockType::Terraform),
            "locals" => Some(BlockType::Locals),
            _ => None,
        }
    }

    /// @ai:intent Keyword as written in source
    /// @ai:effects pure
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockType::Resource => "resource",
            BlockType::Data => "data",
            BlockType::Variable => "variable",
            BlockType::Output => "output",
            BlockType::Module => "module",
            BlockType::Provider => "provider",
            BlockType::Terraform => "terraform",
            BlockType::Locals => "locals",
        }
    }

    /// @ai:intent Number of labels the block header carries
    /// @ai:effects pure
    pub fn label_count(&self) -> usize {
        match self {
            BlockType::Resource | BlockType::Data => 2,
            BlockType::Variable | BlockType::Output | BlockType::Module | BlockType::Provider => 1,
            BlockType::Terraform | BlockType::Locals => 0,
        }
    }

    /// @ai:intent LSP symbol kind reported for blocks of this type
    /// @ai:effects pure
    pub fn symbol_kind(&self) -> SymbolKind {
        match self {
            BlockType::Resource => SymbolKind::Class,
            BlockType::Data => SymbolKind::Struct,
            BlockType::Variable => SymbolKind::Variable,
            BlockType::Output => SymbolKind::Property,
            BlockType::Module => SymbolKind::Module,
            BlockType::Provider => SymbolKind::Namespace,
            BlockType::Terraform => SymbolKind::Package,
            BlockType::Locals => SymbolKind::Object,
        }
    }
}

/// @ai:intent Detect the Terraform file kind from a path
/// @ai:pre path is a valid file path
/// @ai:post result is Some if extension is recognized
/// @ai:example ("main.tf") -> Some(Configuration)
/// @ai:example ("prod.tfvars") -> Some(Variables)
/// @ai:example ("user_data.sh") -> None
/// @ai:effects pure
pub fn detect_file_kind(path: &Path) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?;

    [FileKind::Configuration, FileKind::Variables]
        .into_iter()
        .find(|kind| kind.extensions().contains(&ext))
}

/// @ai:intent Check if a file should be indexed based on extension
/// @ai:effects pure
pub fn is_supported_file(path: &Path) -> bool {
    detect_file_kind(path)
        .map(|kind| kind.declares_blocks())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_configuration() {
        assert_eq!(
            detect_file_kind(Path::new("main.tf")),
            Some(FileKind::Configuration)
        );
    }

    #[test]
    fn test_detect_tfvars() {
        assert_eq!(
            detect_file_kind(Path::new("prod.tfvars")),
            Some(FileKind::Variables)
        );
        assert!(!is_supported_file(Path::new("prod.tfvars")));
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(detect_file_kind(Path::new("user_data.sh")), None);
    }

    #[test]
    fn test_block_keywords() {
        assert_eq!(BlockType::from_keyword("resource"), Some(BlockType::Resource));
        assert_eq!(BlockType::from_keyword("ingress"), None);
        assert_eq!(BlockType::Data.label_count(), 2);
        assert_eq!(BlockType::Variable.symbol_kind().code(), 13);
    }
}
