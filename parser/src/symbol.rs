//! @ai:module:intent Define data structures for Terraform symbols
//! @ai:module:layer domain
//! @ai:module:public_api SymbolKind, Block, SymbolDescriptor, ParsedFile
//! @ai:module:stateless true

use crate::language::BlockType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent LSP SymbolKind subset used for Terraform blocks
/// @ai:invariant serialized as the LSP integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SymbolKind {
    Module,
    Namespace,
    Package,
    Class,
    Property,
    Variable,
    Object,
    Struct,
}

impl SymbolKind {
    /// @ai:intent LSP integer code for this kind
    /// @ai:effects pure
    pub fn code(&self) -> u8 {
        match self {
            SymbolKind::Module => 2,
            SymbolKind::Namespace => 3,
            SymbolKind::Package => 4,
            SymbolKind::Class => 5,
            SymbolKind::Property => 7,
            SymbolKind::Variable => 13,
            SymbolKind::Object => 19,
            SymbolKind::Struct => 23,
        }
    }

    /// @ai:intent Human-readable kind name
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Package => "package",
            SymbolKind::Class => "class",
            SymbolKind::Property => "property",
            SymbolKind::Variable => "variable",
            SymbolKind::Object => "object",
            SymbolKind::Struct => "struct",
        }
    }
}

impl From<SymbolKind> for u8 {
    fn from(kind: SymbolKind) -> Self {
        kind.code()
    }
}

impl TryFrom<u8> for SymbolKind {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            2 => Ok(SymbolKind::Module),
            3 => Ok(SymbolKind::Namespace),
            4 => Ok(SymbolKind::Package),
            5 => Ok(SymbolKind::Class),
            7 => Ok(SymbolKind::Property),
            13 => Ok(SymbolKind::Variable),
            19 => Ok(SymbolKind::Object),
            23 => Ok(SymbolKind::Struct),
            other => Err(format!("unsupported symbol kind {}", other)),
        }
    }
}

/// @ai:intent A top-level HCL block as found in source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub block_type: BlockType,
    pub labels: Vec<String>,
    pub start_line: usize,
    pub end_line: usize,
    /// Full block text, header line through closing brace
    pub body: String,
}

impl Block {
    /// @ai:intent Terraform-style address of the block
    /// @ai:example (resource "aws_instance" "web") -> "aws_instance.web"
    /// @ai:example (data "aws_ami" "linux") -> "data.aws_ami.linux"
    /// @ai:example (variable "region") -> "variable.region"
    /// @ai:effects pure
    pub fn name_path(&self) -> String {
        match self.block_type {
            BlockType::Resource => self.labels.join("."),
            BlockType::Terraform | BlockType::Locals => self.block_type.keyword().to_string(),
            _ => {
                let mut parts = vec![self.block_type.keyword().to_string()];
                parts.extend(self.labels.iter().cloned());
                parts.join(".")
            }
        }
    }
}

/// @ai:intent Symbol descriptor returned by symbol queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolDescriptor {
    pub name_path: String,
    pub kind: SymbolKind,
    pub relative_path: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// @ai:intent All blocks parsed from one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub blocks: Vec<Block>,
}

impl ParsedFile {
    /// @ai:intent Convert blocks into descriptors, optionally with bodies
    /// @ai:effects pure
    pub fn descriptors(&self, include_body: bool) -> Vec<SymbolDescriptor> {
        self.blocks
            .iter()
            .map(|block| SymbolDescriptor {
                name_path: block.name_path(),
                kind: block.block_type.symbol_kind(),
                relative_path: self.relative_path.clone(),
                start_line: block.start_line,
                end_line: block.end_line,
                body: include_body.then(|| block.body.clone()),
            })
            .collect()
    }
}
