//! Integration tests for the watch, init and validate subcommands

use chatmon_cli::commands::{handle_init, handle_validate, handle_watch, InitArgs};
use chatmon_cli::formatters::Formatter;
use chatmon_cli::{Host, HostOptions, LineKind, Outcome};
use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

const PREFIX: &str = "chatmon_wordgroup_";

fn write(dir: &Path, group: &str, contents: &str) {
    fs::write(dir.join(format!("{}{}.toml", PREFIX, group)), contents).unwrap();
}

/// Keeps every outcome instead of printing it
#[derive(Default)]
struct Recorder {
    outcomes: RefCell<Vec<Outcome>>,
}

impl Formatter for Recorder {
    fn format(&self, outcome: &Outcome) {
        self.outcomes.borrow_mut().push(outcome.clone());
    }
}

impl Recorder {
    fn lines(&self) -> Vec<String> {
        self.outcomes
            .borrow()
            .iter()
            .map(|outcome| outcome.line.clone())
            .collect()
    }
}

fn rules_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "profanity",
        r#"
words = ["badw[0o]rd"]
prevent_send = true
include_commands = ["tell"]
"#,
    );
    temp_dir
}

fn watch(host: &mut Host, input: &str) -> Recorder {
    let recorder = Recorder::default();
    handle_watch(host, Cursor::new(input.to_string()), &recorder).unwrap();
    recorder
}

#[test]
fn test_watch_routes_commands_and_chat() {
    let temp_dir = rules_dir();
    let mut host = Host::load(temp_dir.path(), PREFIX, HostOptions::default()).unwrap();

    let recorder = watch(&mut host, "/tell bob badword\n\n   \nplain badword\n/me badword\n");
    let outcomes = recorder.outcomes.borrow();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0].kind,
        LineKind::Command {
            name: "tell".to_string()
        }
    );
    assert!(!outcomes[0].allowed);
    assert_eq!(outcomes[1].kind, LineKind::Chat);
    assert!(!outcomes[1].allowed);
    assert_eq!(
        outcomes[2].kind,
        LineKind::Command {
            name: "me".to_string()
        }
    );
    assert!(outcomes[2].allowed);
}

#[test]
fn test_watch_reload_picks_up_new_group() {
    let temp_dir = rules_dir();
    let mut host = Host::load(temp_dir.path(), PREFIX, HostOptions::default()).unwrap();

    let before = watch(&mut host, "buy now\n");
    assert!(before.outcomes.borrow()[0].action.is_none());

    write(temp_dir.path(), "spam", r#"words = ["buy now"]"#);
    let after = watch(&mut host, ":reload\nbuy now\n");

    let outcomes = after.outcomes.borrow();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].action.as_ref().unwrap().group(), "spam");
    assert_eq!(host.manager().generation(), 1);
}

#[test]
fn test_watch_failed_reload_keeps_word_lists() {
    let temp_dir = rules_dir();
    let rules = temp_dir.path().join("rules");
    fs::create_dir(&rules).unwrap();
    write(&rules, "profanity", r#"words = ["badword"]"#);

    let mut host = Host::load(&rules, PREFIX, HostOptions::default()).unwrap();
    fs::remove_dir_all(&rules).unwrap();

    let recorder = watch(&mut host, ":reload\nbadword\n");

    assert_eq!(host.manager().generation(), 0);
    assert!(recorder.outcomes.borrow()[0].action.is_some());
}

#[test]
fn test_watch_stops_at_quit() {
    let temp_dir = rules_dir();
    let mut host = Host::load(temp_dir.path(), PREFIX, HostOptions::default()).unwrap();

    let recorder = watch(&mut host, "first\n  :quit  \nsecond\n/tell bob badword\n");

    assert_eq!(recorder.lines(), ["first"]);
}

fn init_args(name: &str, words: &[&str]) -> InitArgs {
    InitArgs {
        name: name.to_string(),
        words: words.iter().map(|word| word.to_string()).collect(),
        message: "No %word% here".to_string(),
        prevent_send: true,
        broadcast: false,
        run_commands: vec!["warn %player%".to_string()],
        include_commands: vec!["tell".to_string()],
    }
}

#[test]
fn test_init_writes_a_loadable_group() {
    let temp_dir = TempDir::new().unwrap();

    handle_init(temp_dir.path(), PREFIX, init_args("spam", &["buy now"])).unwrap();
    assert!(temp_dir
        .path()
        .join("chatmon_wordgroup_spam.toml")
        .is_file());

    let host = Host::load(temp_dir.path(), PREFIX, HostOptions::default()).unwrap();
    let outcome = host.process_command("/tell bob BUY NOW");
    assert!(!outcome.allowed);
    assert_eq!(outcome.commands, ["warn console"]);

    assert!(handle_init(temp_dir.path(), PREFIX, init_args("spam", &["again"])).is_err());
    assert!(handle_init(temp_dir.path(), PREFIX, init_args("../escape", &["x"])).is_err());
}

#[test]
fn test_validate_accepts_good_groups() {
    let temp_dir = rules_dir();
    assert!(handle_validate(temp_dir.path(), PREFIX).is_ok());
}

#[test]
fn test_validate_rejects_pattern_that_does_not_compile() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "bad", r#"words = ["(invalid"]"#);

    let err = handle_validate(temp_dir.path(), PREFIX).unwrap_err();
    assert!(err.to_string().contains("1 problem(s)"));
}

#[test]
fn test_validate_rejects_unparsable_group() {
    let temp_dir = rules_dir();
    write(temp_dir.path(), "broken", "words = [");

    assert!(handle_validate(temp_dir.path(), PREFIX).is_err());
}

#[test]
fn test_validate_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    assert!(handle_validate(&temp_dir.path().join("nope"), PREFIX).is_err());
}
