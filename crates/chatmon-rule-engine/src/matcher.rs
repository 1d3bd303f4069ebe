//! Compiled pattern matching against case-folded text
//!
//! Text is folded to lowercase once per evaluation and every candidate pattern
//! is applied, case-sensitively, to the folded text. The first pattern that
//! finds a match anywhere in the text wins. The substring handed back is cut
//! from the original text, so it keeps the sender's casing.

use crate::constants::{MAX_REGEX_LENGTH, REGEX_DFA_SIZE_LIMIT, REGEX_SIZE_LIMIT};
use crate::{MatchError, Result};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Compile a regex with size limits
///
/// Rejects patterns longer than [`MAX_REGEX_LENGTH`] and caps the compiled
/// program and DFA sizes so a single rule cannot exhaust memory.
fn compile_regex_safe(pattern: &str) -> std::result::Result<Regex, String> {
    if pattern.len() > MAX_REGEX_LENGTH {
        return Err(format!(
            "Pattern exceeds maximum length of {} characters",
            MAX_REGEX_LENGTH
        ));
    }

    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| e.to_string())
}

/// What to do when a candidate pattern does not compile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadRulePolicy {
    /// Fail the whole evaluation with [`MatchError::BadRule`]
    #[default]
    Abort,
    /// Log a warning and keep scanning the remaining candidates
    Skip,
}

/// A pattern together with the outcome of compiling it
///
/// Compilation failures are kept rather than raised so that a rule set can be
/// indexed in full and the failure reported when an evaluation reaches it.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: std::result::Result<Regex, String>,
}

impl CompiledPattern {
    pub fn compile(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            regex: compile_regex_safe(pattern),
        }
    }

    /// The pattern text as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_ok()
    }

    /// The bad-rule error for this pattern, if it failed to compile
    pub fn error(&self) -> Option<MatchError> {
        self.regex.as_ref().err().map(|reason| MatchError::BadRule {
            pattern: self.source.clone(),
            reason: reason.clone(),
        })
    }

    /// Find the first occurrence in folded text, as a slice of the original
    fn find<'t>(&self, text: &FoldedText<'t>) -> Option<&'t str> {
        let regex = self.regex.as_ref().ok()?;
        regex
            .find(&text.lowered)
            .map(|m| text.original_span(m.start(), m.end()))
    }
}

/// Lowercased text that remembers where each byte came from
#[derive(Debug)]
pub struct FoldedText<'a> {
    original: &'a str,
    lowered: String,
    /// For each byte of `lowered`, the byte offset of the original character
    /// that produced it, plus a trailing entry for the end of the text.
    offsets: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    pub fn new(original: &'a str) -> Self {
        // Whole-string lowering applies context rules such as word-final
        // sigma. Per-character lowering produces the same byte lengths, so it
        // still drives the offset map.
        let lowered = original.to_lowercase();
        let mut offsets = Vec::with_capacity(lowered.len() + 1);

        for (index, ch) in original.char_indices() {
            let width: usize = ch.to_lowercase().map(char::len_utf8).sum();
            offsets.extend(std::iter::repeat(index).take(width));
        }
        debug_assert_eq!(offsets.len(), lowered.len());
        offsets.push(original.len());

        Self {
            original,
            lowered,
            offsets,
        }
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Map a byte range of the lowered text back onto the original text
    ///
    /// A range ending inside the expansion of a single original character
    /// (for example 'İ' folding to two characters) is widened to cover the
    /// whole original character.
    fn original_span(&self, start: usize, end: usize) -> &'a str {
        let from = self.offsets[start];
        let to = if end >= self.lowered.len() {
            self.original.len()
        } else if end > start && self.offsets[end] == self.offsets[end - 1] {
            let at = self.offsets[end];
            at + self.original[at..].chars().next().map_or(0, char::len_utf8)
        } else {
            self.offsets[end]
        };
        &self.original[from..to]
    }
}

/// A successful match: which rule fired and what text it caught
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// The pattern as configured
    pub pattern: String,
    /// The matched substring, in the original casing
    pub matched: String,
}

/// Find the first candidate pattern that matches anywhere in `text`
///
/// Under [`BadRulePolicy::Abort`] every candidate is checked for compile
/// errors before scanning, so a malformed rule fails the evaluation no matter
/// where it sits in the iteration order. Under [`BadRulePolicy::Skip`] bad
/// rules are logged and passed over.
///
/// An empty candidate set is "no match", never an error.
pub fn find_match<'p, I>(
    text: &str,
    candidates: I,
    policy: BadRulePolicy,
) -> Result<Option<PatternMatch>>
where
    I: IntoIterator<Item = &'p CompiledPattern>,
{
    let candidates: Vec<&CompiledPattern> = candidates.into_iter().collect();
    if candidates.is_empty() {
        return Ok(None);
    }

    if policy == BadRulePolicy::Abort {
        if let Some(err) = candidates.iter().find_map(|pattern| pattern.error()) {
            return Err(err);
        }
    }

    let folded = FoldedText::new(text);
    for pattern in candidates {
        if let Some(err) = pattern.error() {
            warn!(pattern = pattern.source(), error = %err, "Skipping bad rule");
            continue;
        }

        if let Some(matched) = pattern.find(&folded) {
            return Ok(Some(PatternMatch {
                pattern: pattern.source.clone(),
                matched: matched.to_string(),
            }));
        }
    }

    Ok(None)
}

/// Compile `patterns` and run [`find_match`] over them
///
/// Convenience for one-off checks; the word manager caches compiled patterns
/// per snapshot instead.
pub fn match_text<I, S>(text: &str, patterns: I, policy: BadRulePolicy) -> Result<Option<PatternMatch>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let compiled: Vec<CompiledPattern> = patterns
        .into_iter()
        .map(|pattern| CompiledPattern::compile(pattern.as_ref()))
        .collect();
    find_match(text, &compiled, policy)
}
