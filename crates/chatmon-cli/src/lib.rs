//! Chatmon CLI library components.
//!
//! This crate plays the host role for the rule engine: it turns chat lines and
//! command lines into evaluations, renders the matched group's response and
//! reports what a server would do with it. The main binary is in `main.rs`.

pub mod commands;
pub mod formatters;
pub mod host;
pub mod render;

pub use host::{Delivery, Host, HostOptions, LineKind, Outcome};
