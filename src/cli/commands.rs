//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::{Config, Result, cli::Cli};

/// Analyze command implementation
pub mod analyze {
    use super::*;
    use crate::cli::{Commands, OutputFormat, output};
    use crate::ingest::CancelToken;
    use crate::session::{SessionId, SessionStore};
    use crate::state_machine::Palette;
    use crate::trace_source::create_trace_source;
    use std::sync::Arc;

    /// Execute the analyze command
    pub async fn execute(args: Cli, config: Config) -> Result<()> {
        // Extract command-specific arguments
        let (trace, source, feed, output_format) = match args.command {
            Commands::Analyze {
                trace,
                source,
                feed,
                output,
            } => (trace, source, feed, output),
            _ => unreachable!("analyze called with wrong command"),
        };

        let trace_source = create_trace_source(source, &trace, &config)?;
        let session_id = SessionId::new(trace_source.display_name());
        tracing::info!("Analyzing trace {}", session_id);

        let events = trace_source.load().await?;
        tracing::info!("Loaded {} events", events.len());

        let feed_path = feed.unwrap_or_else(|| config.feed_path_for(session_id.as_str()));

        let mut store = SessionStore::new(config, Arc::new(Palette::new()));
        let cancel = CancelToken::new();
        store.open_with_feed(session_id, events, feed_path, &cancel)?;

        if let Some(reason) = store.feed_error() {
            eprintln!("Warning: state graphs unavailable: {}", reason);
        }

        let stdout = std::io::stdout();
        let mut w = stdout.lock();
        match output_format {
            OutputFormat::Json => output::output_json(&mut w, &store)?,
            OutputFormat::Dot => output::output_dot(&mut w, &store)?,
            OutputFormat::Table => output::output_table(&mut w, &store)?,
        }

        Ok(())
    }
}

/// Feed validation command implementation
pub mod feed_validate {
    use crate::Result;
    use crate::ingest::load_feed;
    use std::path::Path;

    /// Execute the feed-validate command
    ///
    /// Loads the feed and reports the first record missing a required field,
    /// if any.
    pub fn execute(path: &Path) -> Result<()> {
        let records = load_feed(path)?;
        println!("Feed {:?}: {} records", path, records.len());

        for (position, record) in records.iter().enumerate() {
            let missing = if record.address().is_none() {
                Some("address")
            } else if record.key().is_none() {
                Some("key")
            } else if record.node_idx().is_none() {
                Some("node_idx")
            } else if record.step_idx().is_none() {
                Some("step_idx")
            } else {
                None
            };

            if let Some(field) = missing {
                println!("Record {}: missing required field \"{}\"", position, field);
                return Ok(());
            }
        }

        println!("All records carry the required fields");
        Ok(())
    }
}
