use anyhow::{bail, Context, Result};
use chatmon_config::{ConfigManager, GroupFile};
use chatmon_rule_engine::{CompiledPattern, GroupRegistry};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Group name, used in the file name
    pub name: String,

    /// Regex patterns to add to the group
    #[arg(short, long = "word", value_name = "PATTERN")]
    pub words: Vec<String>,

    /// Response template
    #[arg(short, long, default_value = "")]
    pub message: String,

    /// Cancel the original message on match
    #[arg(long)]
    pub prevent_send: bool,

    /// Send the response to everyone
    #[arg(long)]
    pub broadcast: bool,

    /// Command to run on match (repeatable)
    #[arg(long = "run", value_name = "COMMAND")]
    pub run_commands: Vec<String>,

    /// Command whose text is also checked (repeatable)
    #[arg(long = "include-command", value_name = "COMMAND")]
    pub include_commands: Vec<String>,
}

/// Write a new group file into the rules directory
pub fn handle_init(rules: &Path, prefix: &str, args: InitArgs) -> Result<()> {
    let group = GroupFile {
        words: args.words,
        message: args.message,
        prevent_send: args.prevent_send,
        broadcast: args.broadcast,
        run_commands: args.run_commands,
        include_commands: args.include_commands,
    };

    let path = ConfigManager::init_group(rules, prefix, &args.name, &group)
        .with_context(|| format!("Failed to create group '{}'", args.name))?;

    println!("✓ Created group '{}'", args.name);
    println!("  File: {}", path.display());
    println!("  Words: {}", group.words.len());
    Ok(())
}

/// Load every group file and report the ones that fail
///
/// A group fails when its file cannot be loaded or when one of its words does
/// not compile.
pub fn handle_validate(rules: &Path, prefix: &str) -> Result<()> {
    let config = ConfigManager::load(rules, prefix)
        .with_context(|| format!("Failed to load word groups from {}", rules.display()))?;

    let mut failures: Vec<String> = config.errors().map(ToString::to_string).collect();
    for name in config.group_names() {
        let Ok(group) = config.group(&name) else {
            continue;
        };
        let bad_rules = group
            .words
            .iter()
            .filter_map(|word| CompiledPattern::compile(word).error());
        for err in bad_rules {
            failures.push(format!("Group '{}': {}", name, err));
        }
    }

    if failures.is_empty() {
        println!("✓ Word groups are valid");
        println!("  Directory: {}", config.dir().display());
        println!("  Groups: {}", config.group_count());
        return Ok(());
    }

    println!("Some word groups are invalid:");
    for failure in &failures {
        println!("  ✗ {}", failure);
    }
    bail!(
        "{} problem(s) found in {} group(s)",
        failures.len(),
        config.group_count()
    )
}
