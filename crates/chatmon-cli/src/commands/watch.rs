//! Line-by-line monitoring of standard input
//!
//! Each line is treated like a message from the configured player. Lines
//! starting with `/` are commands. `:reload` re-reads the rules directory and
//! `:quit` stops reading.

use crate::formatters::Formatter;
use crate::host::Host;
use anyhow::{Context, Result};
use std::io::BufRead;
use tracing::warn;

pub fn handle_watch(host: &mut Host, input: impl BufRead, formatter: &dyn Formatter) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let trimmed = line.trim();

        match trimmed {
            "" => continue,
            ":quit" => break,
            ":reload" => {
                // A failed reload keeps the previous word lists active
                if let Err(e) = host.reload() {
                    warn!("{:#}", e);
                } else {
                    eprintln!(
                        "Reloaded {} group(s)",
                        host.config().group_count()
                    );
                }
            }
            _ if trimmed.starts_with('/') => formatter.format(&host.process_command(trimmed)),
            _ => formatter.format(&host.process_chat(&line)),
        }
    }

    Ok(())
}
