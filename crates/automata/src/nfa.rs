use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::automaton::{Automaton, AutomatonError, EPSILON};

/// A nondeterministic finite automaton with epsilon support. States and
/// symbols are kept in insertion order, which determines display order and
/// the naming of states generated by the subset construction.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    pub(crate) states: Vec<String>,
    pub(crate) symbols: Vec<String>,
    pub(crate) start: Option<String>,
    pub(crate) finals: BTreeSet<String>,

    /// Two-level transition map, created on first write and pruned on
    /// deletion. Every stored destination set is non-empty.
    pub(crate) transitions: FxHashMap<String, FxHashMap<String, BTreeSet<String>>>,
}

impl Nfa {
    pub fn new() -> Nfa {
        Nfa::default()
    }

    /// Appends a new state to the ordered state set.
    pub fn add_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        if self.states.iter().any(|state| state == name) {
            return Err(AutomatonError::DuplicateState(name.to_owned()));
        }

        self.states.push(name.to_owned());
        Ok(())
    }

    /// Removes a state together with every reference to it: the start
    /// marker, the final marker, its outgoing transitions and every
    /// occurrence in a destination set.
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
            for destinations in table.values_mut() {
                destinations.remove(name);
            }
            table.retain(|_, destinations| !destinations.is_empty());
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

    /// Adds the arc src --symbol-> tgt. Adding an existing arc is a no-op.
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
            .entry(symbol.to_owned())
            .or_default()
            .insert(tgt.to_owned());
        Ok(())
    }

    /// Removes the arc src --symbol-> tgt. Removing a missing arc is a
    /// no-op.
    pub fn delete_transition(&mut self, src: &str, symbol: &str, tgt: &str) {
        let Some(table) = self.transitions.get_mut(src) else {
            return;
        };

        if let Some(destinations) = table.get_mut(symbol) {
            destinations.remove(tgt);
            if destinations.is_empty() {
                table.remove(symbol);
            }
        }

        if table.is_empty() {
            self.transitions.remove(src);
        }
    }

    /// Returns true iff the alphabet contains the epsilon symbol.
    pub fn has_epsilon(&self) -> bool {
        self.symbols.iter().any(|symbol| symbol == EPSILON)
    }

    /// The destination set stored for (state, symbol), if any.
    pub(crate) fn targets(&self, state: &str, symbol: &str) -> Option<&BTreeSet<String>> {
        self.transitions.get(state)?.get(symbol)
    }

    /// Computes the smallest superset of the given states that is closed
    /// under epsilon arcs. Safe in the presence of epsilon cycles.
    pub fn epsilon_closure(&self, states: &BTreeSet<String>) -> BTreeSet<String> {
        let mut closure = states.clone();
        let mut stack: Vec<String> = states.iter().cloned().collect();

        while let Some(state) = stack.pop() {
            if let Some(destinations) = self.targets(&state, EPSILON) {
                for next_state in destinations {
                    if !closure.contains(next_state) {
                        closure.insert(next_state.clone());
                        stack.push(next_state.clone());
                    }
                }
            }
        }

        closure
    }

    /// Returns true iff the automaton accepts the given input. The
    /// configuration starts as the epsilon closure of the start state and is
    /// stepped per character; a character outside the alphabet or an empty
    /// configuration rejects immediately.
    pub fn accepts(&self, input: &str) -> bool {
        let Some(start) = &self.start else {
            return false;
        };

        let mut current = self.epsilon_closure(&BTreeSet::from([start.clone()]));
        for character in input.chars() {
            let symbol = character.to_string();
            if !self.symbols.iter().any(|existing| *existing == symbol) {
                return false;
            }

            let mut next_states = BTreeSet::new();
            for state in &current {
                if let Some(destinations) = self.targets(state, &symbol) {
                    next_states.extend(destinations.iter().cloned());
                }
            }

            current = self.epsilon_closure(&next_states);
            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|state| self.finals.contains(state))
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

impl Automaton for Nfa {
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
        match self.targets(state, symbol) {
            Some(destinations) => destinations.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
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
                row.push(match self.targets(state, symbol) {
                    Some(destinations) => format!("{{{}}}", destinations.iter().format(", ")),
                    None => "{}".to_owned(),
                });
            }
            rows.push(row);
        }

        (header, rows)
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Q = {{{}}}", self.states.iter().format(", "))?;
        writeln!(f, "Σ = {{{}}}", self.symbols.iter().format(", "))?;
        writeln!(f, "q0 = {}", self.start.as_deref().unwrap_or("None"))?;
        writeln!(f, "F = {{{}}}", self.finals.iter().format(", "))?;
        writeln!(f, "δ : Q × Σ → P(Q)")?;
        writeln!(f)?;

        for state in &self.states {
            for symbol in &self.symbols {
                if let Some(destinations) = self.targets(state, symbol) {
                    writeln!(
                        f,
                        "    δ({}, {}) = {{{}}}",
                        state,
                        symbol,
                        destinations.iter().format(", ")
                    )?;
                }
            }
        }

        Ok(())
    }
}
