use crate::config::ShellConfig;
use crate::errors::display_user_error;
use crate::repl::Repl;
use crate::shell::{APP_NAME, Shell};
use anyhow::{Context as _, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod builtin;
pub mod config;
pub mod errors;
pub mod parser;
pub mod process;
pub mod repl;
pub mod shell;

/// Get the path to a state file (e.g. logs).
pub fn get_state_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_state_file(name).context("failed get path")
}

/// Install the file-backed tracing subscriber and return the log path.
pub fn init_tracing(config: &ShellConfig) -> Result<PathBuf> {
    let path = match config.log_file() {
        Some(path) => path.clone(),
        None => get_state_file("debug.log")?,
    };
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_new(config.log_filter())
        .with_context(|| format!("invalid log filter {:?}", config.log_filter()))?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Arc::new(log_file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    Ok(path)
}

pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        let location = match panic_info.location() {
            Some(location) => format!(
                "{}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            ),
            None => "Unknown location".to_string(),
        };

        tracing::error!("PANIC OCCURRED: {} at {}", payload, location);
        eprintln!("msh: panic at {location}: {payload}");
    }));
}

/// Run the interactive loop on the process's standard streams.
pub fn run_interactive(config: ShellConfig) -> ExitCode {
    debug!("start shell");
    let mut shell = Shell::new(config);
    let mut repl = Repl::new(&mut shell);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    match repl.run(stdin.lock(), &mut stdout, &mut stderr) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            display_user_error(&err);
            ExitCode::FAILURE
        }
    }
}
