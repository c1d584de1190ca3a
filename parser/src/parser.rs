//! @ai:module:intent Scan Terraform sources and extract top-level blocks
//! @ai:module:layer application
//! @ai:module:public_api parse_file, parse_source
//! @ai:module:depends_on language, symbol, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::language::{detect_file_kind, BlockType};
use crate::symbol::{Block, ParsedFile};
use std::path::Path;

/// @ai:intent Lexical context inside an expression
#[derive(Debug, Clone, Copy)]
enum Context {
    /// Inside a quoted string
    Str,
    /// Inside a `${ ... }` interpolation, with its own brace depth
    Interp(usize),
}

/// @ai:intent Header of a block whose opening brace has not been seen yet
#[derive(Debug)]
struct PendingHeader {
    block_type: Option<BlockType>,
    labels: Vec<String>,
    start_line: usize,
}

/// @ai:intent Line-oriented brace scanner that tracks strings, comments and heredocs
#[derive(Debug, Default)]
struct BlockScanner {
    depth: usize,
    in_block_comment: bool,
    heredoc: Option<String>,
}

impl BlockScanner {
    /// @ai:intent Update depth from one line, returning the depth reached at line end
    /// @ai:post strings, comments and heredoc bodies never change depth
    /// @ai:effects pure
    fn scan_line(&mut self, line: &str, file: &Path, line_number: usize) -> Result<usize> {
        if let Some(terminator) = &self.heredoc {
            if line.trim() == terminator {
                self.heredoc = None;
            }
            return Ok(self.depth);
        }

        let bytes = line.as_bytes();
        let mut stack: Vec<Context> = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            let c = bytes[i];
            let next = bytes.get(i + 1).copied();

            if self.in_block_comment {
                if c == b'*' && next == Some(b'/') {
                    self.in_block_comment = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            match stack.last_mut() {
                Some(Context::Str) => match c {
                    b'\\' => i += 1,
                    b'"' => {
                        stack.pop();
                    }
                    b'$' | b'%' if next == Some(b'{') => {
                        stack.push(Context::Interp(0));
                        i += 1;
                    }
                    _ => {}
                },
                Some(Context::Interp(depth)) => match c {
                    b'"' => stack.push(Context::Str),
                    b'{' => *depth += 1,
                    b'}' => {
                        if *depth == 0 {
                            stack.pop();
                        } else {
                            *depth -= 1;
                        }
                    }
                    _ => {}
                },
                None => match c {
                    b'"' => stack.push(Context::Str),
                    b'#' => break,
                    b'/' if next == Some(b'/') => break,
                    b'/' if next == Some(b'*') => {
                        self.in_block_comment = true;
                        i += 1;
                    }
                    b'<' if next == Some(b'<') => {
                        if let Some(terminator) = heredoc_terminator(&line[i + 2..]) {
                            self.heredoc = Some(terminator);
                            break;
                        }
                    }
                    b'{' => self.depth += 1,
                    b'}' => {
                        if self.depth == 0 {
                            return Err(Error::Parse {
                                file: file.to_path_buf(),
                                line: line_number,
                                message: "unexpected closing brace".to_string(),
                            });
                        }
                        self.depth -= 1;
                    }
                    _ => {}
                },
            }
            i += 1;
        }

        Ok(self.depth)
    }
}

/// @ai:intent Read the terminator word following `<<` or `<<-`
/// @ai:example ("EOF") -> Some("EOF")
/// @ai:example ("-EOT\n") -> Some("EOT")
/// @ai:example (" 1") -> None
/// @ai:effects pure
fn heredoc_terminator(rest: &str) -> Option<String> {
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    let word: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    match word.chars().next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => Some(word),
        _ => None,
    }
}

/// @ai:intent Parse a block header into keyword, labels and whether it opens a brace
/// @ai:example ("resource \"aws_vpc\" \"main\" {") -> Some(("resource", ["aws_vpc", "main"], true))
/// @ai:example ("resource aws_vpc \"broken\" {") -> Some(("resource", ["aws_vpc", "broken"], true))
/// @ai:example ("region = \"us-east-1\"") -> None
/// @ai:effects pure
fn parse_header(line: &str) -> Option<(String, Vec<String>, bool)> {
    let trimmed = line.trim_start();
    let keyword: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if keyword.is_empty() {
        return None;
    }

    let mut rest = trimmed[keyword.len()..].chars().peekable();
    let mut labels = Vec::new();

    loop {
        while rest.peek().is_some_and(|c| c.is_whitespace()) {
            rest.next();
        }
        match rest.peek().copied() {
            Some('{') => return Some((keyword, labels, true)),
            Some('"') => {
                rest.next();
                let mut label = String::new();
                let mut closed = false;
                for c in rest.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    label.push(c);
                }
                if !closed {
                    return None;
                }
                labels.push(label);
            }
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                let mut label = String::new();
                while let Some(&c) = rest.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                        label.push(c);
                        rest.next();
                    } else {
                        break;
                    }
                }
                labels.push(label);
            }
            Some('#') | None => return Some((keyword, labels, false)),
            Some('/') => return Some((keyword, labels, false)),
            Some(_) => return None,
        }
    }
}

/// @ai:intent Extract all top-level blocks from Terraform source
/// @ai:pre file is used for error reporting only
/// @ai:post blocks are ordered by start line
/// @ai:post an unclosed block or stray closing brace is an Error::Parse
/// @ai:effects pure
pub fn parse_source(content: &str, file: &Path) -> Result<Vec<Block>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut scanner = BlockScanner::default();
    let mut blocks = Vec::new();
    let mut open: Option<PendingHeader> = None;
    let mut pending: Option<PendingHeader> = None;

    for (idx, line) in lines.iter().enumerate() {
        let line_number = idx + 1;
        let at_top = scanner.depth == 0 && !scanner.in_block_comment && scanner.heredoc.is_none();

        if at_top && open.is_none() {
            if let Some(header) = pending.take() {
                if line.trim_start().starts_with('{') {
                    open = Some(header);
                } else if line.trim().is_empty() {
                    pending = Some(header);
                }
            }

            if open.is_none() && pending.is_none() {
                if let Some((keyword, labels, opens)) = parse_header(line) {
                    let block_type = BlockType::from_keyword(&keyword);
                    let header = PendingHeader {
                        block_type,
                        labels,
                        start_line: line_number,
                    };
                    if opens {
                        open = Some(header);
                    } else if block_type.is_some() {
                        pending = Some(header);
                    }
                }
            }
        }

        let depth = scanner.scan_line(line, file, line_number)?;

        if depth == 0 && scanner.heredoc.is_none() {
            if let Some(header) = open.take() {
                if let Some(block_type) = header.block_type {
                    blocks.push(Block {
                        block_type,
                        labels: header.labels,
                        start_line: header.start_line,
                        end_line: line_number,
                        body: lines[header.start_line - 1..line_number].join("\n"),
                    });
                }
            }
        }
    }

    if scanner.depth > 0 || scanner.heredoc.is_some() {
        let line = open.map(|h| h.start_line).unwrap_or(lines.len());
        return Err(Error::Parse {
            file: file.to_path_buf(),
            line,
            message: "unclosed block".to_string(),
        });
    }

    Ok(blocks)
}

/// @ai:intent Parse a Terraform file relative to a project root
/// @ai:pre path exists, is readable and lives under root
/// @ai:post relative_path uses forward slashes
/// @ai:effects fs:read
pub fn parse_file(path: &Path, root: &Path) -> Result<ParsedFile> {
    if detect_file_kind(path).is_none() {
        return Err(Error::UnsupportedFileType(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let blocks = parse_source(&content, path)?;
    let relative_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    Ok(ParsedFile {
        path: path.to_path_buf(),
        relative_path,
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<Block> {
        parse_source(content, Path::new("test.tf")).unwrap()
    }

    #[test]
    fn test_resource_blocks() {
        let blocks = parse(
            r#"
resource "aws_instance" "web" {
  ami = "ami-123"
  tags = {
    Name = "web-${var.env}"
  }
}

resource "aws_instance" "db" {
  ami = "ami-456"
}
"#,
        );

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name_path(), "aws_instance.web");
        assert_eq!(blocks[0].start_line, 2);
        assert_eq!(blocks[0].end_line, 7);
        assert_eq!(blocks[1].name_path(), "aws_instance.db");
        assert!(blocks[1].body.starts_with("resource \"aws_instance\" \"db\""));
    }

    #[test]
    fn test_unquoted_label_tolerated() {
        let blocks = parse("resource aws_vpc \"broken\" {\n  cidr_block = \"10.0.0.0/16\"\n}\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].labels, vec!["aws_vpc", "broken"]);
    }

    #[test]
    fn test_braces_in_strings_and_comments_ignored() {
        let blocks = parse(
            r#"
variable "pattern" {
  # closing } in a comment
  default = "{not a block}"
  // another }
  /* and
  one more } */
}
output "x" {
  value = "${lookup(var.m, "}")}"
}
"#,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name_path(), "variable.pattern");
        assert_eq!(blocks[1].name_path(), "output.x");
    }

    #[test]
    fn test_heredoc_body_skipped() {
        let blocks = parse(
            "resource \"aws_instance\" \"web\" {\n  user_data = <<-EOF\n    }}}\n  EOF\n}\nlocals {\n  a = 1\n}\n",
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].end_line, 5);
        assert_eq!(blocks[1].name_path(), "locals");
    }

    #[test]
    fn test_brace_on_next_line() {
        let blocks = parse("terraform\n{\n  required_version = \">= 1.0\"\n}\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Terraform);
        assert_eq!(blocks[0].start_line, 1);
    }

    #[test]
    fn test_unknown_top_level_blocks_skipped() {
        let blocks = parse("moved {\n  from = a\n  to = b\n}\nprovider \"aws\" {\n}\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name_path(), "provider.aws");
    }

    #[test]
    fn test_unclosed_block_is_error() {
        let err = parse_source("resource \"aws_vpc\" \"main\" {\n  cidr_block = \"x\"\n", Path::new("a.tf"))
            .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_stray_brace_is_error() {
        let err = parse_source("}\n", Path::new("a.tf")).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_heredoc_terminator() {
        assert_eq!(heredoc_terminator("EOF"), Some("EOF".to_string()));
        assert_eq!(heredoc_terminator("-EOT"), Some("EOT".to_string()));
        assert_eq!(heredoc_terminator(" 1"), None);
    }
}
