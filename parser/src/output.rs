//! @ai:module:intent Format output for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_symbols, format_matches, format_parsed_file, to_json
//! @ai:module:depends_on symbol, search
//! @ai:module:stateless true

use crate::search::{render_matches, PatternMatch};
use crate::symbol::{ParsedFile, SymbolDescriptor};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format symbol query results as a string
/// @ai:post JSON output is a list, `[]` when nothing matched
/// @ai:effects pure
pub fn format_symbols(symbols: &[SymbolDescriptor], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&symbols, false),
        OutputFormat::JsonPretty => to_json(&symbols, true),
        OutputFormat::Text => format_symbols_text(symbols),
    }
}

/// @ai:intent Format symbol results as human-readable text
/// @ai:effects pure
fn format_symbols_text(symbols: &[SymbolDescriptor]) -> String {
    let mut output = String::new();

    for symbol in symbols {
        output.push_str(&format!(
            "{} {} {}\n",
            symbol.name_path.cyan().bold(),
            format!("[{}]", symbol.kind.name()).dimmed(),
            format!(
                "{}:{}-{}",
                symbol.relative_path, symbol.start_line, symbol.end_line
            )
            .dimmed()
        ));

        if let Some(body) = &symbol.body {
            for line in body.lines() {
                output.push_str(&format!("    {}\n", line));
            }
        }
    }

    if symbols.is_empty() {
        output.push_str(&format!("{}\n", "No symbols found".yellow()));
    } else {
        output.push_str(&format!("\n{} symbols\n", symbols.len().to_string().green()));
    }

    output
}

/// @ai:intent Format pattern matches; text is the raw `path:line: text` payload
/// @ai:effects pure
pub fn format_matches(matches: &[PatternMatch], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&matches, false),
        OutputFormat::JsonPretty => to_json(&matches, true),
        OutputFormat::Text => render_matches(matches),
    }
}

/// @ai:intent Format a parsed file as JSON or text
/// @ai:effects pure
pub fn format_parsed_file(file: &ParsedFile, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(file, false),
        OutputFormat::JsonPretty => to_json(file, true),
        OutputFormat::Text => format_parsed_file_text(file),
    }
}

/// @ai:intent Format parsed file as human-readable text
/// @ai:effects pure
fn format_parsed_file_text(file: &ParsedFile) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", file.relative_path.bold()));
    output.push_str(&format!("\n  Blocks ({}):\n", file.blocks.len()));

    for block in &file.blocks {
        output.push_str(&format!(
            "    {} {} (lines {}-{})\n",
            block.block_type.keyword().dimmed(),
            block.name_path().cyan(),
            block.start_line,
            block.end_line
        ));
    }

    output
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    fn descriptor() -> SymbolDescriptor {
        SymbolDescriptor {
            name_path: "aws_instance.web".to_string(),
            kind: SymbolKind::Class,
            relative_path: "main.tf".to_string(),
            start_line: 1,
            end_line: 3,
            body: None,
        }
    }

    #[test]
    fn test_symbols_json_shape() {
        let json = format_symbols(&[descriptor()], OutputFormat::Json);
        assert_eq!(
            json,
            r#"[{"name_path":"aws_instance.web","kind":5,"relative_path":"main.tf","start_line":1,"end_line":3}]"#
        );
        assert_eq!(format_symbols(&[], OutputFormat::Json), "[]");
    }

    #[test]
    fn test_matches_text_is_raw_payload() {
        let matches = vec![PatternMatch {
            relative_path: "a.tf".to_string(),
            line: 4,
            text: "x = 1".to_string(),
        }];
        assert_eq!(format_matches(&matches, OutputFormat::Text), "a.tf:4: x = 1");
    }
}
