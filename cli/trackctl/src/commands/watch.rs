//! Watch command (poll the card and re-render on change).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Args;
use colored::Colorize;
use tracing::debug;

use runtrack_store::RenderGate;

use crate::output::OutputFormat;

use super::CommandContext;

/// Watch command - re-render the board whenever tracker state changes.
///
/// Every poll starts a fresh render pass. A pass that loses the race to a
/// newer one is dropped so stale state never overwrites newer output.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Poll interval in milliseconds.
    #[arg(long, default_value = "2000")]
    poll_ms: u64,
}

impl WatchCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let format = ctx.format;
        let store = Arc::new(ctx.store()?);
        let gate = Arc::new(RenderGate::new());
        let last_rendered: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

        let poll = Duration::from_millis(self.poll_ms.max(100));
        let mut ticker = tokio::time::interval(poll);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = ticker.tick() => {
                    let pass = gate.begin();
                    let store = Arc::clone(&store);
                    let gate = Arc::clone(&gate);
                    let last_rendered = Arc::clone(&last_rendered);

                    tokio::spawn(async move {
                        let trackers = store.load_all().await;
                        if gate.is_stale(pass) {
                            debug!("dropping stale render pass");
                            return;
                        }

                        let rendered = match format {
                            OutputFormat::Table => crate::view::render_board(&trackers),
                            OutputFormat::Json => serde_json::to_string(&trackers)
                                .unwrap_or_else(|_| "{}".to_string()),
                        };

                        let Ok(mut last) = last_rendered.lock() else {
                            return;
                        };
                        if last.as_deref() != Some(rendered.as_str()) {
                            match format {
                                OutputFormat::Table => {
                                    let stamp = Local::now().format("%H:%M:%S");
                                    println!("{}", format!("-- {stamp}").dimmed());
                                    println!("{rendered}\n");
                                }
                                OutputFormat::Json => println!("{rendered}"),
                            }
                            *last = Some(rendered);
                        }
                    });
                }
            }
        }

        Ok(())
    }
}
