use std::collections::BTreeSet;

use thiserror::Error;

/// The reserved symbol denoting a spontaneous transition.
pub const EPSILON: &str = "ε";

/// Returns true iff the given symbol is the epsilon symbol.
pub fn is_epsilon(symbol: &str) -> bool {
    symbol == EPSILON
}

/// The failures that mutation and conversion operations can report. A failed
/// operation leaves the automaton unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("state '{0}' already exists")]
    DuplicateState(String),

    #[error("symbol '{0}' already exists")]
    DuplicateSymbol(String),

    #[error("no such state '{0}'")]
    UnknownState(String),

    #[error("no such symbol '{0}'")]
    UnknownSymbol(String),

    #[error("the NFA has no states")]
    EmptyNfa,
}

/// Uniform read access to an automaton, independent of whether its
/// transition cells hold a set of states or at most one state.
pub trait Automaton {
    /// The states in insertion order.
    fn states(&self) -> &[String];

    /// The alphabet in insertion order.
    fn symbols(&self) -> &[String];

    /// The start state, if one has been assigned.
    fn start(&self) -> Option<&str>;

    /// The accepting states.
    fn finals(&self) -> &BTreeSet<String>;

    /// The destinations for the given state and symbol, sorted by name.
    /// Empty or a singleton for a deterministic automaton.
    fn destinations(&self, state: &str, symbol: &str) -> Vec<&str>;

    /// The formal definition as multi-line set-builder text.
    fn formal_definition(&self) -> String;

    /// A transition table as a header row and one row per state, in
    /// insertion order.
    fn transition_table(&self) -> (Vec<String>, Vec<Vec<String>>);
}
