use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::automaton::{Automaton, AutomatonError};

/// A deterministic finite automaton. The transition function maps every
/// (state, symbol) pair to at most one state; the automaton may be partial.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    pub(crate) states: Vec<String>,
    pub(crate) symbols: Vec<String>,
    pub(crate) start: Option<String>,
    pub(crate) finals: BTreeSet<String>,

    /// Two-level transition map, created on first write and pruned on
    /// deletion.
    pub(crate) transitions: FxHashMap<String, FxHashMap<String, String>>,
}

impl Dfa {
    pub fn new() -> Dfa {
        Dfa::default()
    }

    /// Appends a new state to the ordered state set.
    pub fn add_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        if self.states.iter().any(|state| state == name) {
            return Err(AutomatonError::DuplicateState(name.to_owned()));
        }

        self.states.push(name.to_owned());
        Ok(())
    }

    /// Removes a state together with every transition entering or leaving
    /// it, and clears the start and final markers when they refer to it.
    pub fn delete_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        let index = self
            .states
            .iter()
            .position(|state| state == name)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_owned()))?;
        self.states.remove(index);

        if self.start.as_deref() == Some(name) {
            self.start = None;
        }
        self.finals.remove(name);

        self.transitions.remove(name);
        for table in self.transitions.values_mut() {
            table.retain(|_, target| target != name);
        }
        self.transitions.retain(|_, table| !table.is_empty());

        Ok(())
    }

    /// Appends a new symbol to the ordered alphabet.
    pub fn add_symbol(&mut self, symbol: &str) -> Result<(), AutomatonError> {
        if self.symbols.iter().any(|existing| existing == symbol) {
            return Err(AutomatonError::DuplicateSymbol(symbol.to_owned()));
        }

        self.symbols.push(symbol.to_owned());
        Ok(())
    }

    /// Removes a symbol and every transition keyed by it.
    pub fn delete_symbol(&mut self, symbol: &str) -> Result<(), AutomatonError> {
        let index = self
            .symbols
            .iter()
            .position(|existing| existing == symbol)
            .ok_or_else(|| AutomatonError::UnknownSymbol(symbol.to_owned()))?;
        self.symbols.remove(index);

        for table in self.transitions.values_mut() {
            table.remove(symbol);
        }
        self.transitions.retain(|_, table| !table.is_empty());

        Ok(())
    }

    /// Assigns or clears the start state. The state must be registered.
    pub fn set_start(&mut self, name: Option<&str>) -> Result<(), AutomatonError> {
        if let Some(name) = name {
            if !self.states.iter().any(|state| state == name) {
                return Err(AutomatonError::UnknownState(name.to_owned()));
            }
        }

        self.start = name.map(str::to_owned);
        Ok(())
    }

    /// Marks a registered state as accepting.
    pub fn add_final(&mut self, name: &str) -> Result<(), AutomatonError> {
        if !self.states.iter().any(|state| state == name) {
            return Err(AutomatonError::UnknownState(name.to_owned()));
        }

        self.finals.insert(name.to_owned());
        Ok(())
    }

    /// Unmarks an accepting state. Unmarking a non-final state is a no-op.
    pub fn remove_final(&mut self, name: &str) {
        self.finals.remove(name);
    }

    /// Sets the transition src --symbol-> tgt, overwriting any previous
    /// destination for (src, symbol).
    pub fn add_transition(&mut self, src: &str, symbol: &str, tgt: &str) -> Result<(), AutomatonError> {
        if !self.states.iter().any(|state| state == src) {
            return Err(AutomatonError::UnknownState(src.to_owned()));
        }
        if !self.states.iter().any(|state| state == tgt) {
            return Err(AutomatonError::UnknownState(tgt.to_owned()));
        }
        if !self.symbols.iter().any(|existing| existing == symbol) {
            return Err(AutomatonError::UnknownSymbol(symbol.to_owned()));
        }

        self.transitions
            .entry(src.to_owned())
            .or_default()
            .insert(symbol.to_owned(), tgt.to_owned());
        Ok(())
    }

    /// Removes the transition src --symbol-> tgt when exactly that arc is
    /// present. Removing a missing arc is a no-op.
    pub fn delete_transition(&mut self, src: &str, symbol: &str, tgt: &str) {
        let Some(table) = self.transitions.get_mut(src) else {
            return;
        };

        if table.get(symbol).is_some_and(|target| target == tgt) {
            table.remove(symbol);
        }

        if table.is_empty() {
            self.transitions.remove(src);
        }
    }

    /// The destination stored for (state, symbol), if any.
    pub(crate) fn target(&self, state: &str, symbol: &str) -> Option<&str> {
        self.transitions.get(state)?.get(symbol).map(String::as_str)
    }

    /// Returns true iff the automaton accepts the given input by walking the
    /// unique transition function from the start state. An absent symbol or
    /// an undefined transition rejects immediately.
    pub fn accepts(&self, input: &str) -> bool {
        let Some(start) = self.start.as_deref() else {
            return false;
        };

        let mut current = start;
        for character in input.chars() {
            let symbol = character.to_string();
            if !self.symbols.iter().any(|existing| *existing == symbol) {
                return false;
            }

            match self.target(current, &symbol) {
                Some(next_state) => current = next_state,
                None => return false,
            }
        }

        self.finals.contains(current)
    }

    /// Returns the states in insertion order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Returns the alphabet in insertion order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the start state, if assigned.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Returns the accepting states.
    pub fn finals(&self) -> &BTreeSet<String> {
        &self.finals
    }
}

impl Automaton for Dfa {
    fn states(&self) -> &[String] {
        self.states()
    }

    fn symbols(&self) -> &[String] {
        self.symbols()
    }

    fn start(&self) -> Option<&str> {
        self.start()
    }

    fn finals(&self) -> &BTreeSet<String> {
        self.finals()
    }

    fn destinations(&self, state: &str, symbol: &str) -> Vec<&str> {
        self.target(state, symbol).into_iter().collect()
    }

    fn formal_definition(&self) -> String {
        self.to_string()
    }

    fn transition_table(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let mut header = vec!["δ".to_owned()];
        header.extend(self.symbols.iter().cloned());

        let mut rows = Vec::with_capacity(self.states.len());
        for state in &self.states {
            let mut row = vec![state.clone()];
            for symbol in &self.symbols {
                row.push(self.target(state, symbol).unwrap_or_default().to_owned());
            }
            rows.push(row);
        }

        (header, rows)
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Q = {{{}}}", self.states.iter().format(", "))?;
        writeln!(f, "Σ = {{{}}}", self.symbols.iter().format(", "))?;
        writeln!(f, "q0 = {}", self.start.as_deref().unwrap_or("None"))?;
        writeln!(f, "F = {{{}}}", self.finals.iter().format(", "))?;
        writeln!(f, "δ : Q × Σ → Q")?;
        writeln!(f)?;

        for state in &self.states {
            for symbol in &self.symbols {
                if let Some(target) = self.target(state, symbol) {
                    writeln!(f, "    δ({}, {}) = {}", state, symbol, target)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    /// A DFA accepting strings over {a, b} that end in 'a'.
    fn sample_dfa() -> Dfa {
        let mut dfa = Dfa::new();
        dfa.add_state("q0").unwrap();
        dfa.add_state("q1").unwrap();
        dfa.add_symbol("a").unwrap();
        dfa.add_symbol("b").unwrap();
        dfa.set_start(Some("q0")).unwrap();
        dfa.add_final("q1").unwrap();
        dfa.add_transition("q0", "a", "q1").unwrap();
        dfa.add_transition("q0", "b", "q0").unwrap();
        dfa.add_transition("q1", "a", "q1").unwrap();
        dfa.add_transition("q1", "b", "q0").unwrap();
        dfa
    }

    #[test]
    fn test_add_transition_overwrites() {
        let mut dfa = sample_dfa();

        dfa.add_transition("q0", "a", "q0").unwrap();
        assert_eq!(dfa.target("q0", "a"), Some("q0"));
    }

    #[test]
    fn test_delete_transition_requires_matching_target() {
        let mut dfa = sample_dfa();

        // The stored arc is q0 --a-> q1, so deleting q0 --a-> q0 is a no-op.
        dfa.delete_transition("q0", "a", "q0");
        assert_eq!(dfa.target("q0", "a"), Some("q1"));

        dfa.delete_transition("q0", "a", "q1");
        assert_eq!(dfa.target("q0", "a"), None);
    }

    #[test]
    fn test_delete_state_is_cascading() {
        let mut dfa = sample_dfa();
        dfa.delete_state("q1").unwrap();

        assert_eq!(dfa.states(), ["q0"]);
        assert!(dfa.finals().is_empty());
        assert_eq!(dfa.target("q0", "a"), None);
        assert_eq!(dfa.target("q0", "b"), Some("q0"));
    }

    #[test]
    fn test_accepts_walks_the_transition_function() {
        let dfa = sample_dfa();

        assert!(dfa.accepts("a"));
        assert!(dfa.accepts("aaba"));
        assert!(!dfa.accepts(""));
        assert!(!dfa.accepts("ab"));

        // A character outside the alphabet rejects.
        assert!(!dfa.accepts("ac"));
    }

    #[test]
    fn test_accepts_rejects_on_undefined_transition() {
        let mut dfa = sample_dfa();
        dfa.delete_transition("q1", "a", "q1");

        assert!(dfa.accepts("a"));
        assert!(!dfa.accepts("aa"));
    }

    #[test]
    fn test_formal_definition() {
        let definition = sample_dfa().formal_definition();

        assert!(definition.contains("δ : Q × Σ → Q"));
        assert!(definition.contains("    δ(q0, a) = q1"));
        assert!(definition.contains("    δ(q1, b) = q0"));
    }

    #[test]
    fn test_transition_table_cells_are_scalar() {
        let mut dfa = sample_dfa();
        dfa.delete_transition("q1", "b", "q0");

        let (header, rows) = dfa.transition_table();
        assert_eq!(header, ["δ", "a", "b"]);
        assert_eq!(rows[0], ["q0", "q1", "q0"]);
        assert_eq!(rows[1], ["q1", "q1", ""]);
    }
}
