//! Command line front end for the operator-precedence analyzer.
//!
//! Usage:
//!   opg `<grammar>` [--input `<string>`] [--start `<symbol>`]
//!       [--strategy first-match|handle] [--step-limit `<n>`] [--trace-out `<path>`]
//!
//! Prints the grammar, its FIRSTVT and LASTVT sets and precedence table, then
//! parses one input string and prints every step. Exits with an error when
//! the grammar is malformed or the input is rejected.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use grammar::Grammar;
use log::{debug, info};
use precedence::{Analysis, ParserConfig, Reduction};

#[derive(Debug, Parser)]
#[command(name = "opg", version)]
#[command(about = "Operator-precedence analysis and parsing")]
struct Args {
    /// Grammar file, one `X->a|b` rule per line
    grammar: PathBuf,

    /// String to parse, ending with `#`. Read from stdin when omitted
    #[arg(short, long)]
    input: Option<String>,

    /// Start symbol. Defaults to the left-hand side of the first rule
    #[arg(short, long)]
    start: Option<char>,

    /// How handles are picked when the table says reduce
    #[arg(long, value_enum, default_value_t = Strategy::FirstMatch)]
    strategy: Strategy,

    /// Give up after this many steps
    #[arg(long)]
    step_limit: Option<usize>,

    /// Also write the trace to this file
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    FirstMatch,
    Handle,
}

impl From<Strategy> for Reduction {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::FirstMatch => Reduction::FirstMatch,
            Strategy::Handle => Reduction::Handle,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.grammar)
        .with_context(|| format!("failed to read {}", args.grammar.display()))?;
    let mut grammar: Grammar = text
        .parse()
        .with_context(|| format!("invalid grammar in {}", args.grammar.display()))?;
    if let Some(start) = args.start {
        grammar = grammar.with_start(start)?;
    }
    info!(
        "loaded {} productions from {}",
        grammar.productions().len(),
        args.grammar.display()
    );

    let analysis = Analysis::new(&grammar);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_analysis(&mut out, &text, &grammar, &analysis)?;

    let input = match args.input {
        Some(input) => input,
        None => prompt(&mut out, &mut io::stdin().lock())?,
    };
    let config = ParserConfig {
        reduction: args.strategy.into(),
        step_limit: args.step_limit,
    };
    debug!("parsing {:?} with {:?}", input, config);
    let report = analysis.parser_with_config(&grammar, config).parse(&input);
    writeln!(out)?;
    write!(out, "{}", report)?;

    if let Some(path) = &args.trace_out {
        fs::write(path, report.to_string())
            .with_context(|| format!("failed to write trace to {}", path.display()))?;
    }
    if let Some(err) = report.error() {
        bail!("{:?} rejected: {}", input, err);
    }
    Ok(())
}

/// Everything derived from the grammar, in the order it is computed.
fn render_analysis(
    out: &mut impl Write,
    text: &str,
    grammar: &Grammar,
    analysis: &Analysis,
) -> Result<()> {
    writeln!(out, "Input grammar:")?;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        writeln!(out, "    {}", line)?;
    }

    writeln!(out, "\nProductions:")?;
    for (i, production) in grammar.productions().iter().enumerate() {
        writeln!(out, "{:>4} {}", i, production)?;
    }

    writeln!(out, "\nStart symbol: {}", grammar.start())?;
    writeln!(out, "Non-terminals: {}", spaced(grammar.non_terminals()))?;
    writeln!(out, "Terminals: {}", spaced(grammar.terminals()))?;

    writeln!(out)?;
    write!(out, "{}", analysis.first_vt)?;
    writeln!(out)?;
    write!(out, "{}", analysis.last_vt)?;

    writeln!(out, "\nPrecedence table:")?;
    write!(out, "{}", analysis.table)?;
    for conflict in analysis.table.conflicts() {
        writeln!(out, "warning: {}", conflict)?;
    }
    Ok(())
}

fn spaced(symbols: &[char]) -> String {
    symbols
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ask for the string to parse and read one line of it.
fn prompt(out: &mut impl Write, input: &mut impl BufRead) -> Result<String> {
    write!(out, "\nString to parse (end with #): ")?;
    out.flush()?;
    let mut line = String::new();
    if input
        .read_line(&mut line)
        .context("failed to read input string")?
        == 0
    {
        bail!("no input string given");
    }
    Ok(line.trim_end().to_owned())
}
