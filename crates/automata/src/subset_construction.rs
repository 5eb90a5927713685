use std::collections::BTreeSet;
use std::collections::VecDeque;

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use log::trace;

use crate::automaton::is_epsilon;
use crate::dfa::Dfa;
use crate::nfa::Nfa;

/// Mapping from each epsilon-closed NFA state subset to the DFA state name
/// it was assigned, in discovery order. The empty subset maps to the dead
/// state when one was introduced.
pub type SubsetMap = IndexMap<BTreeSet<String>, String>;

impl Nfa {
    /// Converts the NFA into an equivalent DFA using the subset
    /// construction and returns it together with the subset-to-name map.
    ///
    /// The seed subset {start} and every discovered destination subset are
    /// epsilon closed before becoming a DFA state, so the per-symbol
    /// destination unions inside the loop are plain unions. Subsets are
    /// processed first-in-first-out and named q0, q1, ... in discovery
    /// order. An empty destination is materialized once as a dead state
    /// that self-loops on every symbol and is never accepting, which makes
    /// the resulting DFA total over its alphabet. An NFA without a start
    /// state converts to an empty DFA.
    pub fn to_dfa(&self) -> (Dfa, SubsetMap) {
        let mut dfa = Dfa::new();
        let mut mapping = SubsetMap::default();

        let Some(start) = self.start() else {
            return (dfa, mapping);
        };

        // The DFA alphabet is the NFA alphabet without epsilon.
        let dfa_symbols: Vec<String> = self
            .symbols()
            .iter()
            .filter(|symbol| !is_epsilon(symbol))
            .cloned()
            .collect();
        dfa.symbols.clone_from(&dfa_symbols);

        let seed = self.epsilon_closure(&BTreeSet::from([start.to_owned()]));
        trace!("Seed subset {{{}}} becomes state q0", seed.iter().format(", "));

        dfa.states.push("q0".to_owned());
        dfa.start = Some("q0".to_owned());
        if seed.iter().any(|state| self.finals().contains(state)) {
            dfa.finals.insert("q0".to_owned());
        }
        mapping.insert(seed.clone(), "q0".to_owned());

        let mut worklist = VecDeque::from([(seed, "q0".to_owned())]);
        let mut state_id = 1;

        while let Some((subset, source_name)) = worklist.pop_front() {
            for symbol in &dfa_symbols {
                let mut destinations = BTreeSet::new();
                for state in &subset {
                    if let Some(targets) = self.targets(state, symbol) {
                        destinations.extend(targets.iter().cloned());
                    }
                }

                let target_name = if destinations.is_empty() {
                    // The empty subset stays empty under closure, so the
                    // dead state is created at most once and reused.
                    match mapping.get(&BTreeSet::new()) {
                        Some(name) => name.clone(),
                        None => {
                            let name = format!("q{state_id}");
                            state_id += 1;
                            debug!("Introducing dead state {name}");

                            dfa.states.push(name.clone());
                            let self_loops = dfa.transitions.entry(name.clone()).or_default();
                            for loop_symbol in &dfa_symbols {
                                self_loops.insert(loop_symbol.clone(), name.clone());
                            }
                            mapping.insert(BTreeSet::new(), name.clone());
                            name
                        }
                    }
                } else {
                    let closed = self.epsilon_closure(&destinations);
                    match mapping.get(&closed) {
                        Some(name) => name.clone(),
                        None => {
                            let name = format!("q{state_id}");
                            state_id += 1;
                            trace!(
                                "Subset {{{}}} becomes state {}",
                                closed.iter().format(", "),
                                name
                            );

                            dfa.states.push(name.clone());
                            if closed.iter().any(|state| self.finals().contains(state)) {
                                dfa.finals.insert(name.clone());
                            }
                            mapping.insert(closed.clone(), name.clone());
                            worklist.push_back((closed, name.clone()));
                            name
                        }
                    }
                };

                dfa.transitions
                    .entry(source_name.clone())
                    .or_default()
                    .insert(symbol.clone(), target_name);
            }
        }

        debug!(
            "Subset construction produced {} states over {} symbols",
            dfa.states.len(),
            dfa.symbols.len()
        );
        (dfa, mapping)
    }
}
