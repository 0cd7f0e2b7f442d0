use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;

use regexp_lang::unicode::{DefaultPropertyNames, validate_names};
use regexp_lang::{Capability, CapabilitySet, Dialect, Lexer, parse};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Patterns to parse; read from --file or stdin when absent
    #[arg(value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Parse each line of FILE as a pattern
    #[arg(short, long, value_name = "FILE", conflicts_with = "patterns")]
    file: Option<PathBuf>,

    /// Print the token stream instead of the tree
    #[arg(short, long)]
    tokens: bool,

    /// Start from the capabilities of a dialect
    #[arg(short, long, value_enum)]
    dialect: Option<Dialect>,

    /// Enable a capability by name, e.g. COMMENT_MODE
    #[arg(short = 'C', long = "capability", value_name = "NAME")]
    capabilities: Vec<Capability>,

    /// Start from no capabilities instead of the defaults
    #[arg(long, conflicts_with = "dialect")]
    no_defaults: bool,

    /// Skip checking property and POSIX class names
    #[arg(long)]
    no_name_check: bool,
}

impl Args {
    fn capability_set(&self) -> CapabilitySet {
        let base = match self.dialect {
            Some(dialect) => dialect.capabilities(),
            None if self.no_defaults => CapabilitySet::EMPTY,
            None => CapabilitySet::DEFAULT,
        };
        self.capabilities.iter().fold(base, |set, &c| set.with(c))
    }

    fn read_patterns(&self) -> anyhow::Result<Vec<String>> {
        if !self.patterns.is_empty() {
            return Ok(self.patterns.clone());
        }
        let text = match &self.file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read stdin")?;
                text
            }
        };
        Ok(text.lines().map(str::to_owned).collect())
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let capabilities = args.capability_set();
    let mut reported = false;

    for pattern in args.read_patterns()? {
        let result = parse(&pattern, capabilities);
        if args.tokens {
            let lines = Lexer::new(&pattern, capabilities)
                .map(|t| {
                    let text = &pattern[t.span.clone()];
                    format!("{}@{}..{} {text:?}", t.kind, t.span.start, t.span.end)
                })
                .join("\n");
            println!("{lines}");
        } else {
            print!("{}", result.tree().debug_dump());
        }

        let mut diagnostics = result.diagnostics().to_vec();
        if !args.no_name_check {
            diagnostics.extend(validate_names(&result, &DefaultPropertyNames));
            diagnostics.sort_by_key(|d| d.span.start);
        }
        for diagnostic in &diagnostics {
            eprintln!("{diagnostic}");
        }
        reported |= !diagnostics.is_empty();
    }

    Ok(if reported {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
