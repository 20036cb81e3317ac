//! CLI for cite-collate - Build a numbered reference list from a manuscript's citations.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cite_collate::{
    collate,
    collate::{default_transliterator, NoTransliteration},
    extract_citations, load_refs,
    output::DEFAULT_NOT_FOUND_PREFIX,
    render_json, render_text, OutputOptions,
};

const DEFAULT_BODY: &str = "论文正文内容.txt";
const DEFAULT_REFS: &str = "参考文献库.txt";
const DEFAULT_OUTPUT: &str = "提取的引用.txt";

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Build a numbered reference list from the author-year citations in a manuscript
#[derive(Parser)]
#[command(name = "cite-collate")]
#[command(version)]
#[command(after_help = "\
Examples:
  cite-collate collate --dir thesis/
  cite-collate collate --body chapter1.txt --refs library.txt -o -
  cite-collate extract --body chapter1.txt --format json")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match citations against a reference list and write the numbered list
    #[command(after_help = "\
Citation syntax: （Smith，2001）, （张三和李四，2019）, （Smith et al.，2001；王五等，2020）

Relative file paths are resolved against --dir.")]
    Collate {
        /// Directory the input and output files live in
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Body text file
        #[arg(long, default_value = DEFAULT_BODY)]
        body: PathBuf,

        /// Reference list file, one entry per line
        #[arg(short, long, default_value = DEFAULT_REFS)]
        refs: PathBuf,

        /// Output file (use '-' for stdout)
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Prefix for citations that matched no reference
        #[arg(long, default_value = DEFAULT_NOT_FOUND_PREFIX)]
        not_found_prefix: String,

        /// Order CJK references by code point instead of pinyin
        #[arg(long)]
        no_transliteration: bool,
    },

    /// List the citations found in the body text
    Extract {
        /// Directory the body file lives in
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Body text file
        #[arg(long, default_value = DEFAULT_BODY)]
        body: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `[n] reference` lines
    Text,
    /// JSON array
    Json,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — body file not found / unreadable
    BodyFile(String),
    /// Exit 11 — reference file not found / unreadable
    RefsFile(String),
    /// Exit 12 — cannot write output
    OutputFile(String),
    /// Exit 13 — cannot serialise output
    Serialize(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::BodyFile(_) => 10,
            AppError::RefsFile(_) => 11,
            AppError::OutputFile(_) => 12,
            AppError::Serialize(_) => 13,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BodyFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: verify the file path is correct and the file is UTF-8",
                    msg
                )
            }
            AppError::RefsFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: the reference list must be a UTF-8 text file with one entry per line",
                    msg
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
            AppError::Serialize(msg) => write!(f, "{}", msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cite_collate=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Collate {
            dir,
            body,
            refs,
            output,
            format,
            not_found_prefix,
            no_transliteration,
        } => {
            collate_command(
                &dir,
                &body,
                &refs,
                &output,
                format,
                &not_found_prefix,
                no_transliteration,
            )?;
        }
        Commands::Extract { dir, body, format } => {
            extract_command(&dir, &body, format)?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Match the body's citations against the reference list.
fn collate_command(
    dir: &Path,
    body: &Path,
    refs: &Path,
    output: &Path,
    format: Format,
    not_found_prefix: &str,
    no_transliteration: bool,
) -> Result<(), AppError> {
    // 1. Read the body text
    let text = read_body(dir, body)?;

    // 2. Load the reference list
    let refs_path = dir.join(refs);
    let corpus = load_refs(&refs_path)
        .map_err(|e| AppError::RefsFile(format!("'{}': {}", refs_path.display(), e)))?;

    // 3. Extract, match, and format
    let options = OutputOptions {
        not_found_prefix,
        transliterator: if no_transliteration {
            &NoTransliteration
        } else {
            default_transliterator()
        },
    };
    let entries = collate(&text, &corpus, &options);

    // 4. Render everything before touching the output
    let result = match format {
        Format::Text => render_text(&entries),
        Format::Json => {
            render_json(&entries).map_err(|e| AppError::Serialize(e.to_string()))?
        }
    };

    // 5. Write to file or stdout
    if output == Path::new("-") {
        write_stdout(&result)?;
    } else {
        let output_path = dir.join(output);
        fs::write(&output_path, &result).map_err(|e| {
            AppError::OutputFile(format!("'{}': {}", output_path.display(), e))
        })?;
        info!(
            entries = entries.len(),
            path = %output_path.display(),
            "wrote reference list"
        );
    }

    Ok(())
}

/// Print the citations parsed from the body text.
fn extract_command(dir: &Path, body: &Path, format: Format) -> Result<(), AppError> {
    let text = read_body(dir, body)?;
    let records = extract_citations(&text);

    let result: String = match format {
        Format::Text => records
            .iter()
            .map(|r| format!("{}\t{}\n", r.year(), r.authors().join("; ")))
            .collect(),
        Format::Json => serde_json::to_string_pretty(&records)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| AppError::Serialize(e.to_string()))?,
    };

    write_stdout(&result)
}

fn read_body(dir: &Path, body: &Path) -> Result<String, AppError> {
    let path = dir.join(body);
    fs::read_to_string(&path)
        .map_err(|e| AppError::BodyFile(format!("'{}': {}", path.display(), e)))
}

fn write_stdout(content: &str) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{}", content).map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))
}
