//! The CLI driver (spec.md §6 "External Interfaces"): reads example pairs,
//! learns a program, then applies it to fresh inputs. Malformed input and
//! I/O are this binary's responsibility, not the synthesis core's
//! (spec.md §7).

use std::io::{self, BufRead, Write};

use clap::Parser;
use substrfill::config::Cli;
use substrfill::error::CliError;
use substrfill::{apply, learn, materialize, paths, Config};

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn read_examples<R: BufRead>(reader: &mut R) -> Result<Vec<(String, String)>, CliError> {
    let mut examples = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break; // EOF before phase 1's blank-line terminator
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.is_empty() {
            break;
        }
        let mut parts = trimmed.splitn(2, ',');
        let first = parts.next().unwrap_or("");
        let rest = parts.next();
        match rest {
            Some(second) if !second.contains(',') => {
                examples.push((first.to_string(), second.to_string()));
            }
            _ => {
                return Err(CliError::MalformedExample { line: trimmed.to_string() });
            }
        }
    }
    Ok(examples)
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config: Config = cli.to_config();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let examples = read_examples(&mut reader)?;

    let programs: Vec<Vec<substrfill::Expression>> = match learn(&examples, &config) {
        Ok(dag) => {
            let found = paths(&dag, &config);
            tracing::info!(paths = found.len(), "enumerated candidate programs");
            found.iter().map(|p| materialize(&dag, p)).collect()
        }
        Err(err) => {
            tracing::warn!(error = %err, "synthesis did not produce a program");
            Vec::new()
        }
    };

    if cli.json {
        // Dump the shortest candidate program (the one phase 2 tries first)
        // so a caller can inspect what was actually learned.
        match programs.first() {
            Some(program) => println!("{}", serde_json::to_string(program).unwrap_or_default()),
            None => println!("null"),
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut fresh = String::new();
    loop {
        fresh.clear();
        let read = reader.read_line(&mut fresh)?;
        if read == 0 {
            break;
        }
        let input = fresh.trim_end_matches(['\n', '\r']);
        let mut result = None;
        for program in &programs {
            if let Some(r) = apply(program, input)? {
                result = Some(r);
                break;
            }
        }
        match result {
            Some(r) if cli.json => writeln!(out, "{}", serde_json::json!({ "result": r }))?,
            Some(r) => writeln!(out, "{}", r)?,
            None => writeln!(out, "Can't handle it")?,
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
