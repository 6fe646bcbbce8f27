//! Command dispatch: wires settings, the editing session and terminal output.

use std::io::{self, BufRead};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{EditorSession, Outcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};

const PROMPT: &str = "treecanvas>";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show) => _show(&load_settings(cli)?),
        Some(Commands::Metrics) => _metrics(&load_settings(cli)?),
        Some(Commands::Run { script }) => _run(&load_settings(cli)?, script),
        Some(Commands::Repl) => _repl(&load_settings(cli)?),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "treecanvas", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try 'treecanvas --help'".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");
    Ok(settings)
}

#[instrument(skip(settings))]
fn _show(settings: &Settings) -> CliResult<()> {
    let session = EditorSession::new(settings)?;
    output::info(&session.render());
    Ok(())
}

#[instrument(skip(settings))]
fn _metrics(settings: &Settings) -> CliResult<()> {
    let session = EditorSession::new(settings)?;
    let metrics = session.model().metrics();
    output::action("height", &metrics.height);
    output::action("width", &metrics.width);
    output::action("nodes", &metrics.node_count);
    output::action("canvas", &session.canvas());
    Ok(())
}

#[instrument(skip(settings))]
fn _run(settings: &Settings, script: &Path) -> CliResult<()> {
    let text = std::fs::read_to_string(script)
        .map_err(|e| CliError::io(format!("read {}", script.display()), e))?;
    let mut session = EditorSession::new(settings)?;
    run_script(&mut session, &text)?;
    output::info(&session.render());
    Ok(())
}

/// Applies every line of `text`, stopping at the first failure.
pub fn run_script(session: &mut EditorSession, text: &str) -> CliResult<()> {
    for (number, line) in text.lines().enumerate() {
        debug!(line = number + 1, command = line, "script");
        if let Some(outcome) = session.run_line(line)? {
            report(session, &outcome);
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _repl(settings: &Settings) -> CliResult<()> {
    let mut session = EditorSession::new(settings)?;
    output::info(&session.render());
    let stdin = io::stdin();
    repl(&mut session, stdin.lock(), true)
}

/// Reads commands until EOF or `quit`. Failed commands are reported and skipped.
pub fn repl(session: &mut EditorSession, input: impl BufRead, interactive: bool) -> CliResult<()> {
    if interactive {
        output::prompt(PROMPT);
    }
    for line in input.lines() {
        let line = line.map_err(|e| CliError::io("read stdin", e))?;
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }
        match session.run_line(&line) {
            Ok(Some(outcome)) => report(session, &outcome),
            Ok(None) => {}
            Err(e) => output::error(&e),
        }
        if interactive {
            output::prompt(PROMPT);
        }
    }
    Ok(())
}

fn report(session: &EditorSession, outcome: &Outcome) {
    match outcome {
        Outcome::Selected(id) => output::success(&format!("selected {id}")),
        Outcome::Updated(snapshot) => output::success(&format!(
            "height {}, width {}, {} nodes",
            snapshot.metrics.height, snapshot.metrics.width, snapshot.metrics.node_count
        )),
        Outcome::Shown(_) => output::info(&session.render()),
        Outcome::Measured { metrics, canvas } => output::info(&format!(
            "height {}, width {}, {} nodes, canvas {}",
            metrics.height, metrics.width, metrics.node_count, canvas
        )),
    }
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::header("# effective settings");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "cannot determine config directory".to_string(),
                ))
            }
        },
    }
    Ok(())
}
