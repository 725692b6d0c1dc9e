//! # sqllexer CLI
//!
//! Reads SQL statements from stdin (one per `;`-terminated chunk) or from
//! `--query`, and prints one JSON object per statement with its obfuscated
//! and/or normalized form.

use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sqllexer::{
    Normalizer, NormalizerConfig, Obfuscator, ObfuscatorConfig, Result, StatementMetadata,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Replace literal values with `?`.
    Obfuscate,
    /// Normalize the statement as written.
    Normalize,
    /// Obfuscate, then normalize the obfuscated text.
    Both,
}

#[derive(Debug, Parser)]
#[command(name = "sqllexer", version, about = "Obfuscate and normalize SQL statements")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,

    /// Process this statement instead of reading stdin.
    #[arg(long)]
    query: Option<String>,

    #[arg(long)]
    collect_comments: bool,

    #[arg(long)]
    collect_commands: bool,

    #[arg(long)]
    collect_tables: bool,

    /// Keep `AS alias` in normalized output.
    #[arg(long)]
    keep_sql_alias: bool,

    /// Replace digits inside identifiers when obfuscating.
    #[arg(long)]
    replace_digits: bool,
}

#[derive(Debug, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    obfuscated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<StatementMetadata>,
}

struct Processor {
    mode: Mode,
    obfuscator: Obfuscator,
    normalizer: Normalizer,
}

impl Processor {
    fn new(cli: &Cli) -> Self {
        let obfuscator_config = ObfuscatorConfig::default().with_replace_digits(cli.replace_digits);
        let normalizer_config = NormalizerConfig::default()
            .with_collect_comments(cli.collect_comments)
            .with_collect_commands(cli.collect_commands)
            .with_collect_tables(cli.collect_tables)
            .with_keep_sql_alias(cli.keep_sql_alias);
        Processor {
            mode: cli.mode,
            obfuscator: Obfuscator::new(obfuscator_config),
            normalizer: Normalizer::new(normalizer_config),
        }
    }

    fn process(&self, sql: &str) -> Result<Output> {
        let obfuscated = match self.mode {
            Mode::Obfuscate | Mode::Both => Some(self.obfuscator.obfuscate(sql)),
            Mode::Normalize => None,
        };
        let (normalized, metadata) = match self.mode {
            Mode::Obfuscate => (None, None),
            Mode::Normalize | Mode::Both => {
                let input = obfuscated.as_deref().unwrap_or(sql);
                let (normalized, metadata) = self.normalizer.normalize(input)?;
                (Some(normalized), Some(metadata))
            }
        };
        Ok(Output {
            obfuscated,
            normalized,
            metadata,
        })
    }

    fn write(&self, out: &mut impl Write, sql: &str) -> Result<()> {
        debug!(len = sql.len(), "processing statement");
        let output = self.process(sql)?;
        serde_json::to_writer(&mut *out, &output)?;
        writeln!(out)?;
        Ok(())
    }
}

fn run(cli: &Cli) -> Result<()> {
    let processor = Processor::new(cli);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(query) = &cli.query {
        return processor.write(&mut out, query);
    }

    let stdin = io::stdin();
    let mut sql_buffer = String::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if sql_buffer.is_empty() && line.trim().is_empty() {
            continue;
        }

        // Accumulate SQL until the statement is complete (ends with ;)
        sql_buffer.push_str(&line);
        sql_buffer.push('\n');
        if !sql_buffer.trim_end().ends_with(';') {
            continue;
        }

        let sql = sql_buffer.trim().to_string();
        sql_buffer.clear();
        processor.write(&mut out, &sql)?;
    }

    // A final statement without a terminating semicolon.
    let rest = sql_buffer.trim();
    if !rest.is_empty() {
        processor.write(&mut out, rest)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
