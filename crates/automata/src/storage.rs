use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use crate::automaton::AutomatonError;
use crate::dfa::Dfa;
use crate::nfa::Nfa;

/// Structural dump of an NFA: states and symbols in insertion order,
/// destination lists sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfaDump {
    pub states: Vec<String>,
    pub symbols: Vec<String>,
    pub start: Option<String>,
    pub finals: Vec<String>,
    #[serde(default)]
    pub transitions: IndexMap<String, IndexMap<String, Vec<String>>>,
}

/// Structural dump of a DFA with scalar transition cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaDump {
    pub states: Vec<String>,
    pub symbols: Vec<String>,
    pub start: Option<String>,
    pub finals: Vec<String>,
    #[serde(default)]
    pub transitions: IndexMap<String, IndexMap<String, String>>,
}

/// A dump of either automaton kind, tagged with the mode it was saved in so
/// reloading restores the correct engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AutomatonDump {
    #[serde(rename = "NFA")]
    Nfa(NfaDump),

    #[serde(rename = "DFA")]
    Dfa(DfaDump),
}

impl Nfa {
    /// Serializes the automaton into its structural dump.
    pub fn to_dump(&self) -> NfaDump {
        let mut transitions: IndexMap<String, IndexMap<String, Vec<String>>> = IndexMap::new();
        for state in self.states() {
            for symbol in self.symbols() {
                if let Some(destinations) = self.targets(state, symbol) {
                    transitions
                        .entry(state.clone())
                        .or_default()
                        .insert(symbol.clone(), destinations.iter().cloned().collect());
                }
            }
        }

        NfaDump {
            states: self.states().to_vec(),
            symbols: self.symbols().to_vec(),
            start: self.start().map(str::to_owned),
            finals: self.finals().iter().cloned().collect(),
            transitions,
        }
    }

    /// Builds an automaton from a dump by replaying every mutation, which
    /// re-validates all membership invariants.
    pub fn from_dump(dump: &NfaDump) -> Result<Nfa, AutomatonError> {
        let mut nfa = Nfa::new();
        for state in &dump.states {
            nfa.add_state(state)?;
        }
        for symbol in &dump.symbols {
            nfa.add_symbol(symbol)?;
        }
        nfa.set_start(dump.start.as_deref())?;
        for state in &dump.finals {
            nfa.add_final(state)?;
        }
        for (source, by_symbol) in &dump.transitions {
            for (symbol, destinations) in by_symbol {
                for target in destinations {
                    nfa.add_transition(source, symbol, target)?;
                }
            }
        }

        Ok(nfa)
    }
}

impl Dfa {
    /// Serializes the automaton into its structural dump.
    pub fn to_dump(&self) -> DfaDump {
        let mut transitions: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for state in self.states() {
            for symbol in self.symbols() {
                if let Some(target) = self.target(state, symbol) {
                    transitions
                        .entry(state.clone())
                        .or_default()
                        .insert(symbol.clone(), target.to_owned());
                }
            }
        }

        DfaDump {
            states: self.states().to_vec(),
            symbols: self.symbols().to_vec(),
            start: self.start().map(str::to_owned),
            finals: self.finals().iter().cloned().collect(),
            transitions,
        }
    }

    /// Builds an automaton from a dump by replaying every mutation, which
    /// re-validates all membership invariants.
    pub fn from_dump(dump: &DfaDump) -> Result<Dfa, AutomatonError> {
        let mut dfa = Dfa::new();
        for state in &dump.states {
            dfa.add_state(state)?;
        }
        for symbol in &dump.symbols {
            dfa.add_symbol(symbol)?;
        }
        dfa.set_start(dump.start.as_deref())?;
        for state in &dump.finals {
            dfa.add_final(state)?;
        }
        for (source, by_symbol) in &dump.transitions {
            for (symbol, target) in by_symbol {
                dfa.add_transition(source, symbol, target)?;
            }
        }

        Ok(dfa)
    }
}
