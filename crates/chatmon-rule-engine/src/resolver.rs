//! Turn a pattern match into a [`WordAction`]

use crate::action::WordAction;
use crate::group::GroupRegistry;
use crate::index::RuleIndex;
use crate::matcher::PatternMatch;
use tracing::warn;

/// Build the action for a match from its owning group's configuration
///
/// Returns `None` when the pattern has no owning group or the group's
/// configuration cannot be fetched. A broken group degrades to silence rather
/// than failing message processing.
pub fn resolve(
    found: &PatternMatch,
    index: &RuleIndex,
    registry: &dyn GroupRegistry,
) -> Option<WordAction> {
    let group = index.group_for(&found.pattern)?;

    let config = match registry.group(group) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                group = %e.group,
                file = ?e.file,
                pattern = %found.pattern,
                "Aborting generating action. {}",
                e.message
            );
            return None;
        }
    };

    Some(WordAction::new(
        found.pattern.clone(),
        found.matched.clone(),
        group.to_string(),
        config.message.clone(),
        config.prevent_send,
        config.broadcast,
        config.run_commands.clone(),
    ))
}
