mod cli;
mod logging;
mod terminal_host;

use anyhow::Context;
use calcwidget_core::{
    ButtonToken, CalculatorEngine, EngineConfig, InstanceId, InstanceSnapshot, PressOutcome,
    dispatch, refresh,
};
use clap::Parser;
use cli::{Cli, Command, OutputFormat, parse_buttons};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use terminal_host::TerminalHost;
use tracing::{info, warn};

#[derive(Serialize)]
struct TranscriptEntry {
    button: ButtonToken,
    outcome: PressOutcome,
    display: String,
}

#[derive(Serialize)]
struct Transcript {
    presses: Vec<TranscriptEntry>,
    instance: InstanceSnapshot,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting calcwidget");

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EngineConfig::load().context("loading configuration")?,
    };
    let mut engine = CalculatorEngine::with_config(config)?;
    let mut host = TerminalHost::new();
    if let Some(id) = cli.command.instance() {
        engine.ensure_instance(id);
    }

    match cli.command {
        Command::Run { instance, format, buttons } => {
            run(&mut engine, &mut host, InstanceId(instance), format, &buttons)
        }
        Command::Repl { instance } => repl(&mut engine, &mut host, InstanceId(instance)),
        Command::Explain => {
            explain();
            Ok(())
        }
    }
}

fn run(
    engine: &mut CalculatorEngine,
    host: &mut TerminalHost,
    id: InstanceId,
    format: OutputFormat,
    words: &[String],
) -> anyhow::Result<()> {
    let tokens = parse_buttons(words)?;
    let mut presses = Vec::with_capacity(tokens.len());

    for token in tokens {
        let outcome = dispatch(engine, host, id, token);
        presses.push(TranscriptEntry {
            button: token,
            outcome,
            display: host.screen(id).to_string(),
        });
    }

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            for message in host.take_messages() {
                writeln!(stdout, "{message}")?;
            }
            writeln!(stdout, "{}", host.screen(id))?;
        }
        OutputFormat::Json => {
            let transcript = Transcript { presses, instance: engine.snapshot(id) };
            serde_json::to_writer_pretty(&mut stdout, &transcript)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn repl(engine: &mut CalculatorEngine, host: &mut TerminalHost, start: InstanceId) -> anyhow::Result<()> {
    let mut active = start;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "{active}> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => {}
            [":quit"] | [":q"] => break,
            [":use", id] => match id.parse::<i32>() {
                Ok(id) => {
                    active = InstanceId(id);
                    engine.ensure_instance(active);
                }
                Err(_) => writeln!(stdout, "not an instance id: {id}")?,
            },
            [":remove", id] => match id.parse::<i32>() {
                Ok(id) => {
                    let id = InstanceId(id);
                    engine.remove_instance(id);
                    host.forget(id);
                }
                Err(_) => writeln!(stdout, "not an instance id: {id}")?,
            },
            [":show"] => {
                refresh(engine, host);
                for (id, screen) in host.screens() {
                    writeln!(stdout, "{id}: {screen}")?;
                }
                if let Some((label, text)) = &host.clipboard {
                    writeln!(stdout, "clipboard [{label}]: {text}")?;
                }
            }
            _ => match parse_buttons(&words) {
                Ok(tokens) => {
                    for token in tokens {
                        dispatch(engine, host, active, token);
                    }
                    for message in host.take_messages() {
                        writeln!(stdout, "{message}")?;
                    }
                    writeln!(stdout, "{}", host.screen(active))?;
                }
                Err(err) => {
                    warn!(%err, "Rejected input line");
                    writeln!(stdout, "{err}")?;
                }
            },
        }

        write!(stdout, "{active}> ")?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn explain() {
    println!("calcwidget - home-screen calculator engine");
    println!();
    println!("Each instance is an independent calculator. Expressions are evaluated");
    println!("strictly left to right with no operator precedence: 2+3×4 = 20.");
    println!();
    println!("Buttons:");
    println!("  0-9 .        digits and the decimal point (one point per number)");
    println!("  ÷ × − +      operators; ASCII / * x - also work");
    println!("  =            evaluate; the result replaces the expression");
    println!("  del          remove the last token");
    println!("  clear        reset the expression and forget the result");
    println!("  copy         copy the last result to the clipboard");
    println!();
    println!("An operator pressed right after a result continues from that result.");
    println!("Results show at most 8 digits after the decimal point.");
}
