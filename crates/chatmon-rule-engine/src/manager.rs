//! Word manager - the entry point hosts call for every chat line and command
//!
//! The manager serves one immutable [`Snapshot`] at a time. Evaluations clone
//! the active snapshot's `Arc` and run entirely against it, so a reload that
//! lands mid-evaluation never produces a mix of old and new rules. Reloads are
//! serialized with each other, build the next snapshot off to the side and
//! publish it with a single pointer swap.

use crate::action::WordAction;
use crate::group::GroupRegistry;
use crate::index::RuleIndex;
use crate::matcher::{find_match, BadRulePolicy, CompiledPattern};
use crate::resolver::resolve;
use crate::Result;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// One complete rule set: the index, its compiled patterns and the registry
/// the index was collected from
pub struct Snapshot {
    index: RuleIndex,
    registry: Arc<dyn GroupRegistry>,
    /// Compiled form of `index.patterns()`, same order
    compiled: Vec<CompiledPattern>,
    /// Positions into `compiled` for each monitored command
    by_command: HashMap<String, Vec<usize>>,
    generation: u64,
}

impl Snapshot {
    fn build(index: RuleIndex, registry: Arc<dyn GroupRegistry>, generation: u64) -> Self {
        let compiled: Vec<CompiledPattern> = index
            .patterns()
            .iter()
            .map(|pattern| CompiledPattern::compile(pattern))
            .collect();

        let positions: HashMap<&str, usize> = index
            .patterns()
            .iter()
            .enumerate()
            .map(|(position, pattern)| (pattern.as_str(), position))
            .collect();

        let by_command = index
            .commands()
            .map(|command| {
                let slots = index
                    .patterns_for_command(command)
                    .iter()
                    .filter_map(|pattern| positions.get(pattern.as_str()).copied())
                    .collect();
                (command.to_string(), slots)
            })
            .collect();

        Self {
            index,
            registry,
            compiled,
            by_command,
            generation,
        }
    }

    /// Check chat text against every pattern
    pub fn evaluate_text(&self, text: &str, policy: BadRulePolicy) -> Result<Option<WordAction>> {
        let Some(found) = find_match(text, &self.compiled, policy)? else {
            return Ok(None);
        };
        debug!(pattern = %found.pattern, matched = %found.matched, "Text matched");
        Ok(resolve(&found, &self.index, self.registry.as_ref()))
    }

    /// Check command text against the patterns monitored for `command`
    ///
    /// Commands nobody monitors return `None` without scanning anything.
    pub fn evaluate_command(
        &self,
        command: &str,
        text: &str,
        policy: BadRulePolicy,
    ) -> Result<Option<WordAction>> {
        let Some(slots) = self.by_command.get(command) else {
            return Ok(None);
        };

        let candidates = slots.iter().map(|&slot| &self.compiled[slot]);
        let Some(found) = find_match(text, candidates, policy)? else {
            return Ok(None);
        };
        debug!(command, pattern = %found.pattern, matched = %found.matched, "Command matched");
        Ok(resolve(&found, &self.index, self.registry.as_ref()))
    }

    /// Names of commands with at least one monitored pattern
    pub fn relevant_commands(&self) -> BTreeSet<String> {
        self.index.commands().map(str::to_string).collect()
    }

    pub fn index(&self) -> &RuleIndex {
        &self.index
    }

    pub fn registry(&self) -> &Arc<dyn GroupRegistry> {
        &self.registry
    }

    /// Number of reloads completed before this snapshot was published
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Thread-safe facade over the active rule snapshot
pub struct WordManager {
    active: RwLock<Arc<Snapshot>>,
    reload_lock: Mutex<()>,
    policy: BadRulePolicy,
}

impl WordManager {
    /// Serve an already collected index
    pub fn new(index: RuleIndex, registry: Arc<dyn GroupRegistry>) -> Self {
        Self {
            active: RwLock::new(Arc::new(Snapshot::build(index, registry, 0))),
            reload_lock: Mutex::new(()),
            policy: BadRulePolicy::default(),
        }
    }

    /// Collect an index from `registry` and serve it
    pub fn from_registry(registry: Arc<dyn GroupRegistry>) -> Self {
        let index = RuleIndex::collect(registry.as_ref());
        Self::new(index, registry)
    }

    pub fn with_policy(mut self, policy: BadRulePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> BadRulePolicy {
        self.policy
    }

    /// The snapshot currently being served
    ///
    /// Hold on to it to make several calls against one consistent rule set.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.active.read())
    }

    /// Check chat text against every loaded pattern
    ///
    /// # Errors
    ///
    /// Returns [`crate::MatchError::BadRule`] when a pattern fails to compile
    /// and the manager uses [`BadRulePolicy::Abort`].
    pub fn evaluate_text(&self, text: &str) -> Result<Option<WordAction>> {
        self.snapshot().evaluate_text(text, self.policy)
    }

    /// Check the full text of a command invocation
    ///
    /// # Errors
    ///
    /// Same as [`WordManager::evaluate_text`], limited to the command's
    /// patterns. Unmonitored commands never error.
    pub fn evaluate_command(&self, command: &str, text: &str) -> Result<Option<WordAction>> {
        self.snapshot().evaluate_command(command, text, self.policy)
    }

    /// Commands worth sending to [`WordManager::evaluate_command`] at all
    pub fn relevant_commands(&self) -> BTreeSet<String> {
        self.snapshot().relevant_commands()
    }

    /// Cheap membership check against [`WordManager::relevant_commands`]
    pub fn is_relevant_command(&self, command: &str) -> bool {
        self.active.read().index.has_command(command)
    }

    pub fn generation(&self) -> u64 {
        self.active.read().generation
    }

    /// Replace the active rule set
    ///
    /// Evaluations already running finish against the old snapshot; every
    /// evaluation starting after this returns sees the new one.
    pub fn reload(&self, index: RuleIndex, registry: Arc<dyn GroupRegistry>) {
        let _guard = self.reload_lock.lock();
        self.publish(index, registry);
    }

    /// Collect a fresh index from `registry` and make it active
    pub fn reload_from(&self, registry: Arc<dyn GroupRegistry>) {
        let _guard = self.reload_lock.lock();
        let index = RuleIndex::collect(registry.as_ref());
        self.publish(index, registry);
    }

    /// Build and swap in the next snapshot; callers hold `reload_lock`
    fn publish(&self, index: RuleIndex, registry: Arc<dyn GroupRegistry>) {
        let generation = self.generation() + 1;
        let next = Arc::new(Snapshot::build(index, registry, generation));
        let patterns = next.index().len();
        let commands = next.by_command.len();

        *self.active.write() = next;
        info!(generation, patterns, commands, "Word lists reloaded");
    }
}
