//! @ai:module:intent CLI entry point for the Terraform symbol scanner
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on index, search, parser, output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tfsym::{output, parser, search, OutputFormat, SymbolIndex, SymbolKind, SymbolQuery};

#[derive(Parser)]
#[command(name = "tfsym")]
#[command(author, version, about = "tfsym - Terraform symbol lookup and pattern search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find top-level blocks by name path
    Symbols {
        /// Project root to index
        root: PathBuf,

        /// Name path to look up (e.g. aws_instance.web)
        #[arg(long)]
        name: String,

        /// Match name paths containing the query
        #[arg(long, default_value = "false")]
        substring: bool,

        /// Include block bodies
        #[arg(long, default_value = "false")]
        body: bool,

        /// Restrict to LSP symbol kind codes
        #[arg(long, value_delimiter = ',')]
        kinds: Vec<u8>,

        /// Fail when the JSON answer exceeds this many characters (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_answer_chars: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "json")]
        format: Format,
    },

    /// Search files for a regex pattern
    Search {
        /// Project root to search
        root: PathBuf,

        /// Regex pattern
        pattern: String,

        /// Relative-path glob of files to search
        #[arg(long, default_value = search::DEFAULT_FILE_GLOB)]
        glob: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Parse a file and show its top-level blocks
    Parse {
        /// Path to file
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Symbols {
            root,
            name,
            substring,
            body,
            kinds,
            max_answer_chars,
            format,
        } => {
            let include_kinds = match kinds
                .into_iter()
                .map(SymbolKind::try_from)
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(kinds) => kinds,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };

            let query = SymbolQuery {
                name_path: name,
                substring_matching: substring,
                include_body: body,
                include_kinds,
                max_answer_chars,
            };

            match SymbolIndex::build(&root).and_then(|index| index.find_symbol(&query)) {
                Ok(symbols) => {
                    println!("{}", output::format_symbols(&symbols, format.into()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::Search {
            root,
            pattern,
            glob,
            format,
        } => match search::search_pattern(&root, &pattern, Some(&glob)) {
            Ok(matches) => {
                println!("{}", output::format_matches(&matches, format.into()));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },

        Commands::Parse { path, format } => {
            let root = path.parent().map(PathBuf::from).unwrap_or_default();
            match parser::parse_file(&path, &root) {
                Ok(parsed) => {
                    println!("{}", output::format_parsed_file(&parsed, format.into()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
    }
}
