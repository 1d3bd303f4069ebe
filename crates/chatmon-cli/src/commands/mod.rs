pub mod group;
pub mod watch;

pub use group::{handle_init, handle_validate, InitArgs};
pub use watch::handle_watch;
