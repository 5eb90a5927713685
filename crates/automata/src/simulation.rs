use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::automaton::Automaton;
use crate::dfa::Dfa;
use crate::nfa::Nfa;

/// The outcome of a simulation run. Invalid symbols and dead ends are
/// expected outcomes a caller must be able to distinguish, so they are
/// reported here rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    NoStartState,
    InvalidSymbol(char),
    DeadEnd,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "ACCEPT"),
            Verdict::Reject => write!(f, "REJECT"),
            Verdict::NoStartState => write!(f, "No start state"),
            Verdict::InvalidSymbol(character) => write!(f, "Invalid symbol \"{character}\""),
            Verdict::DeadEnd => write!(f, "Dead end"),
        }
    }
}

/// A simulation result: the acceptance verdict plus one human-readable line
/// per step taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationTrace {
    pub accepted: bool,
    pub verdict: Verdict,
    pub steps: Vec<String>,
}

impl SimulationTrace {
    fn rejected(verdict: Verdict, steps: Vec<String>) -> SimulationTrace {
        SimulationTrace {
            accepted: false,
            verdict,
            steps,
        }
    }
}

/// Formats a configuration as a comma-joined sorted list, with ∅ for the
/// empty set.
fn format_configuration(states: &BTreeSet<String>) -> String {
    if states.is_empty() {
        "∅".to_owned()
    } else {
        states.iter().format(", ").to_string()
    }
}

/// Simulates the NFA on the given input, recording the epsilon-closed
/// configuration after every consumed character. The automaton itself is
/// not modified.
pub fn simulate_nfa(nfa: &Nfa, input: &str) -> SimulationTrace {
    let Some(start) = nfa.start() else {
        return SimulationTrace::rejected(Verdict::NoStartState, Vec::new());
    };

    let mut current = nfa.epsilon_closure(&BTreeSet::from([start.to_owned()]));
    let mut steps = vec![format!("Starting at: {}", format_configuration(&current))];

    for (step, character) in input.chars().enumerate() {
        let symbol = character.to_string();
        if !nfa.symbols().iter().any(|existing| *existing == symbol) {
            return SimulationTrace::rejected(Verdict::InvalidSymbol(character), steps);
        }

        let mut next_states = BTreeSet::new();
        for state in &current {
            next_states.extend(nfa.destinations(state, &symbol).iter().map(|target| (*target).to_owned()));
        }
        current = nfa.epsilon_closure(&next_states);

        steps.push(format!(
            "{}) After input '{}' -> {}",
            step + 1,
            character,
            format_configuration(&current)
        ));

        if current.is_empty() {
            return SimulationTrace::rejected(Verdict::DeadEnd, steps);
        }
    }

    let accepted = current.iter().any(|state| nfa.finals().contains(state));
    steps.push(format!("Final states reached: {}", format_configuration(&current)));

    SimulationTrace {
        accepted,
        verdict: if accepted { Verdict::Accept } else { Verdict::Reject },
        steps,
    }
}

/// Simulates the DFA on the given input, recording the single current state
/// after every consumed character.
pub fn simulate_dfa(dfa: &Dfa, input: &str) -> SimulationTrace {
    let Some(start) = dfa.start() else {
        return SimulationTrace::rejected(Verdict::NoStartState, Vec::new());
    };

    let mut current = start;
    let mut steps = vec![format!("Starting at: {current}")];

    for (step, character) in input.chars().enumerate() {
        let symbol = character.to_string();
        if !dfa.symbols().iter().any(|existing| *existing == symbol) {
            return SimulationTrace::rejected(Verdict::InvalidSymbol(character), steps);
        }

        let next_state = dfa.destinations(current, &symbol).first().copied();
        steps.push(format!(
            "{}) Input '{}' -> {}",
            step + 1,
            character,
            next_state.unwrap_or("∅")
        ));

        match next_state {
            Some(next_state) => current = next_state,
            None => return SimulationTrace::rejected(Verdict::DeadEnd, steps),
        }
    }

    let accepted = dfa.finals().contains(current);
    steps.push(format!("Final state reached: {current}"));

    SimulationTrace {
        accepted,
        verdict: if accepted { Verdict::Accept } else { Verdict::Reject },
        steps,
    }
}
