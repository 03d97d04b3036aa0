//! Command engine binary for the Huddle contact/event manager.
//!
//! Reads commands from standard input, one per line, runs each against the
//! model, and writes one JSON response per line to standard output. Logs go
//! to standard error.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `huddle-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the data file, or start empty
//! 4. Build the model and install the save listener
//! 5. Run the command session until input ends
//! 6. Save if needed and log the result

mod error;
mod listener;
mod session;

use std::io;
use std::path::Path;

use huddle_core::config::{HuddleConfig, LoggingConfig};
use huddle_core::{Model, persistence};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::listener::{SaveOnCommit, SaveStatus};

/// Configuration file looked up in the working directory.
const CONFIG_FILE: &str = "huddle-config.yaml";

/// Application entry point for the command engine.
///
/// # Errors
///
/// Returns an error if startup, the session, or the final save fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!(error = %e, "huddle-engine failed");
        return Err(e.into());
    }
    Ok(())
}

fn run() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so this is reported
    //    after step 2.
    let config = HuddleConfig::from_file_or_default(Path::new(CONFIG_FILE))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("huddle-engine starting");
    info!(
        data_file = %config.storage.data_file.display(),
        save_on_commit = config.storage.save_on_commit,
        "Configuration loaded"
    );

    // 3. Load the data file.
    let data_file = config.storage.data_file.as_path();
    let store = persistence::load_or_default(data_file)?;

    // 4. Build the model.
    let mut model = Model::with_store(store);
    let save_status = config.storage.save_on_commit.then(|| {
        let listener = SaveOnCommit::new(data_file);
        let status = listener.status();
        model.add_listener(Box::new(listener));
        status
    });
    info!(
        people = model.store().people().len(),
        events = model.store().events().len(),
        "Model ready, reading commands"
    );

    // 5. Run the session.
    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = session::run(&mut model, stdin.lock(), stdout.lock())?;

    // 6. Save and log results. With save-on-commit, only a failed save
    //    leaves anything to write.
    let unsaved = save_status
        .as_ref()
        .map_or(summary.committed > 0, SaveStatus::is_dirty);
    if unsaved {
        persistence::save(data_file, model.store())?;
        info!(data_file = %data_file.display(), "Data file saved");
    }

    info!(
        executed = summary.executed,
        committed = summary.committed,
        rejected = summary.rejected,
        malformed = summary.malformed,
        "huddle-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber, writing to standard error.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
