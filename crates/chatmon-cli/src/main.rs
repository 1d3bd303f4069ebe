//! Chatmon CLI - Regex word monitoring for chat lines and commands.

use anyhow::Result;
use chatmon_cli::commands::{self, InitArgs};
use chatmon_cli::formatters::{Formatter, HumanFormatter, JsonFormatter};
use chatmon_cli::{Host, HostOptions};
use chatmon_rule_engine::{BadRulePolicy, DEFAULT_GROUP_PREFIX};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatmon")]
#[command(about = "Check chat lines and commands against regex word groups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the word group files
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    rules: PathBuf,

    /// File name prefix of word group files
    #[arg(long, global = true, default_value = DEFAULT_GROUP_PREFIX)]
    prefix: String,

    /// Name substituted for %player%
    #[arg(long, global = true, default_value = "console")]
    player: String,

    /// Let every line through unchecked, as a player with the ignore permission
    #[arg(long, global = true)]
    bypass: bool,

    /// Skip rules that fail to compile instead of aborting the check
    #[arg(long, global = true)]
    skip_bad_rules: bool,

    /// Output format
    #[arg(short, long = "output", global = true, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Verbose output (-v info, -vv debug)
    #[arg(short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Check one chat line
    Check {
        /// Text to check
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Check one command line, e.g. `chatmon command /tell bob hi`
    Command {
        /// Command line including the command name
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        line: Vec<String>,
    },

    /// List commands that are monitored by at least one group
    Commands,

    /// Read lines from stdin and check each one
    Watch,

    /// Create a new word group file
    Init(InitArgs),

    /// Load every word group file and report errors
    Validate,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter: Box<dyn Formatter> = match cli.format {
        OutputFormat::Human => Box::new(HumanFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };

    let options = HostOptions {
        player: cli.player.clone(),
        bypass: cli.bypass,
        policy: if cli.skip_bad_rules {
            BadRulePolicy::Skip
        } else {
            BadRulePolicy::Abort
        },
    };

    match cli.command {
        Command::Init(args) => commands::handle_init(&cli.rules, &cli.prefix, args),
        Command::Validate => commands::handle_validate(&cli.rules, &cli.prefix),
        Command::Check { text } => {
            let host = Host::load(&cli.rules, &cli.prefix, options)?;
            formatter.format(&host.process_chat(&text.join(" ")));
            Ok(())
        }
        Command::Command { line } => {
            let host = Host::load(&cli.rules, &cli.prefix, options)?;
            let line = line.join(" ");
            let line = if line.starts_with('/') {
                line
            } else {
                format!("/{}", line)
            };
            formatter.format(&host.process_command(&line));
            Ok(())
        }
        Command::Commands => {
            let host = Host::load(&cli.rules, &cli.prefix, options)?;
            for command in host.manager().relevant_commands() {
                println!("{}", command);
            }
            Ok(())
        }
        Command::Watch => {
            let mut host = Host::load(&cli.rules, &cli.prefix, options)?;
            commands::handle_watch(&mut host, io::stdin().lock(), formatter.as_ref())
        }
    }
}
