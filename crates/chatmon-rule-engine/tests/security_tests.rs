//! Hostile-rule tests for chatmon-rule-engine
//!
//! These tests verify that word patterns cannot stall or exhaust a caller:
//! - ReDoS (Regular Expression Denial of Service) shapes
//! - Regex size limit bypasses
//! - Invalid syntax surfacing as bad rules

use chatmon_rule_engine::{
    match_text, BadRulePolicy, CompiledPattern, GroupConfig, GroupTable, MatchError, WordManager,
    MAX_REGEX_LENGTH,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn assert_bounded(pattern: &str, text: &str) {
    let start = Instant::now();
    let compiled = CompiledPattern::compile(pattern);
    let compile_duration = start.elapsed();

    assert!(
        compile_duration < Duration::from_millis(500),
        "Pattern '{}' compilation took too long: {:?}",
        pattern,
        compile_duration
    );

    if compiled.is_valid() {
        let match_start = Instant::now();
        let _matched = match_text(text, [pattern], BadRulePolicy::Abort);
        let match_duration = match_start.elapsed();

        assert!(
            match_duration < Duration::from_millis(500),
            "Matching '{}' took too long: {:?}",
            pattern,
            match_duration
        );
    }
}

// ============================================================================
// ReDoS Pattern Testing
// ============================================================================

#[test]
fn test_redos_catastrophic_backtracking_nested_quantifiers() {
    // (a+)+b backtracks exponentially in backtracking engines
    assert_bounded("(a+)+b", &"a".repeat(64));
}

#[test]
fn test_redos_nested_star_quantifiers() {
    assert_bounded("(x*)*y", &"x".repeat(64));
}

#[test]
fn test_redos_alternation_with_overlap() {
    assert_bounded("(a|a)*b", &"a".repeat(64));
}

#[test]
fn test_redos_dfa_size_limit_enforcement() {
    // Would build a large DFA without limits
    assert_bounded("a{1000,2000}", &"a".repeat(1500));
}

#[test]
fn test_redos_compilation_time_bounded() {
    let patterns = [
        ".*.*.*.*.*.*.*.*.*.*.*.*.*.*.*.*.*.*.*.*",
        "(a|b|c|d|e|f|g|h|i|j|k|l|m|n|o|p|q|r|s|t|u|v|w|x|y|z)+",
        "a*b*c*d*e*f*g*h*i*j*k*l*m*n*o*p*q*r*s*t*u*v*w*x*y*z*",
    ];

    for pattern in patterns {
        assert_bounded(pattern, "the quick brown fox jumps over the lazy dog");
    }
}

#[test]
fn test_long_chat_line_against_many_rules() {
    let mut groups = GroupTable::new();
    groups.insert(
        "many",
        GroupConfig::new((0..200).map(|i| format!(r"\bword{}\b", i))),
    );
    let manager = WordManager::from_registry(Arc::new(groups));
    let text = "lorem ipsum ".repeat(2_000);

    let start = Instant::now();
    assert!(manager.evaluate_text(&text).unwrap().is_none());
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "Scan took too long: {:?}",
        start.elapsed()
    );
}

// ============================================================================
// Regex Size Limits
// ============================================================================

#[test]
fn test_pattern_at_limit_accepted() {
    let pattern = "a".repeat(MAX_REGEX_LENGTH);
    assert!(CompiledPattern::compile(&pattern).is_valid());
}

#[test]
fn test_pattern_over_limit_rejected() {
    let pattern = "a".repeat(MAX_REGEX_LENGTH + 1);
    let compiled = CompiledPattern::compile(&pattern);

    assert!(!compiled.is_valid());
    let err = compiled.error().unwrap();
    assert_eq!(err.pattern(), pattern);
    assert!(err.to_string().contains("maximum length"));
}

#[test]
fn test_compiled_size_limit_rejected() {
    // Small source, huge program
    let compiled = CompiledPattern::compile(r"(?:\w{1000}){1000}");
    assert!(!compiled.is_valid());
}

// ============================================================================
// Invalid Syntax
// ============================================================================

#[test]
fn test_invalid_regex_syntax_rejected() {
    let invalid = ["(invalid", "[unclosed", "*starts", "a{2,1}", r"(?<=look)behind"];

    for pattern in invalid {
        let err = match_text("some text", [pattern], BadRulePolicy::Abort).unwrap_err();
        match err {
            MatchError::BadRule { pattern: bad, .. } => assert_eq!(bad, pattern),
        }
    }
}
