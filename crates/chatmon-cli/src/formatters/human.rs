//! Human-readable formatter for line outcomes.

use crate::host::{Delivery, LineKind, Outcome};
use colored::Colorize;

pub struct HumanFormatter;

pub fn print_outcome(outcome: &Outcome) {
    let source = match &outcome.kind {
        LineKind::Chat => "chat".to_string(),
        LineKind::Command { name } => format!("/{}", name),
    };

    let verdict = if outcome.allowed {
        "allowed".green().bold()
    } else {
        "blocked".red().bold()
    };

    match &outcome.action {
        None => println!("{} {} {}", verdict, source.dimmed(), "(no match)".dimmed()),
        Some(action) => println!(
            "{} {} matched '{}' (rule {}, group {})",
            verdict,
            source.dimmed(),
            action.original_word().yellow(),
            action.matched_rule().cyan(),
            action.group().cyan()
        ),
    }

    match &outcome.response {
        Some(Delivery::Broadcast(text)) => println!("  {} {}", "→ everyone:".bold(), text),
        Some(Delivery::Player(text)) => println!("  {} {}", "→ player:".bold(), text),
        None => {}
    }

    for command in &outcome.commands {
        println!("  {} {}", "→ run:".bold(), command);
    }

    if let Some(error) = &outcome.error {
        println!("  {} {}", "⚠".yellow(), error.yellow());
    }
}
