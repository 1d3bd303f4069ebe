//! Output formatters for line outcomes.

pub mod human;
pub mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::host::Outcome;

/// Trait for formatting outcomes
pub trait Formatter {
    /// Format and print one outcome
    fn format(&self, outcome: &Outcome);
}

impl Formatter for HumanFormatter {
    fn format(&self, outcome: &Outcome) {
        human::print_outcome(outcome);
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, outcome: &Outcome) {
        json::print_json(outcome);
    }
}
