//! JSON formatter for line outcomes.

use crate::host::Outcome;

pub struct JsonFormatter;

/// Print one outcome as a single line of JSON
pub fn print_json(outcome: &Outcome) {
    match serde_json::to_string(outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing outcome: {}", e),
    }
}
