use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use log::debug;

use crate::automaton::Automaton;
use crate::automaton::AutomatonError;
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::simulation;
use crate::simulation::SimulationTrace;
use crate::storage::AutomatonDump;

/// Selects which contained engine a manager routes its operations to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Nfa,
    Dfa,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Nfa => write!(f, "NFA"),
            Mode::Dfa => write!(f, "DFA"),
        }
    }
}

/// Holds one NFA and one DFA, routes generic operations to the engine
/// selected by the mode and owns the conversion provenance: the mapping from
/// each generated DFA state name to the NFA state subset it represents.
///
/// A manager is an explicit caller-owned object; every session gets its own
/// instance and no synchronization is provided.
#[derive(Debug, Default)]
pub struct AutomatonManager {
    nfa: Nfa,
    dfa: Dfa,
    mode: Mode,
    state_map: IndexMap<String, BTreeSet<String>>,
}

impl AutomatonManager {
    pub fn new() -> AutomatonManager {
        AutomatonManager::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Read access to the currently active engine.
    pub fn current(&self) -> &dyn Automaton {
        match self.mode {
            Mode::Nfa => &self.nfa,
            Mode::Dfa => &self.dfa,
        }
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn nfa_mut(&mut self) -> &mut Nfa {
        &mut self.nfa
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn dfa_mut(&mut self) -> &mut Dfa {
        &mut self.dfa
    }

    /// The name-to-subset mapping produced by the most recent conversion,
    /// in discovery order. Empty until a conversion has run.
    pub fn state_map(&self) -> &IndexMap<String, BTreeSet<String>> {
        &self.state_map
    }

    pub fn add_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        match self.mode {
            Mode::Nfa => self.nfa.add_state(name),
            Mode::Dfa => self.dfa.add_state(name),
        }
    }

    pub fn delete_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        match self.mode {
            Mode::Nfa => self.nfa.delete_state(name),
            Mode::Dfa => self.dfa.delete_state(name),
        }
    }

    pub fn add_symbol(&mut self, symbol: &str) -> Result<(), AutomatonError> {
        match self.mode {
            Mode::Nfa => self.nfa.add_symbol(symbol),
            Mode::Dfa => self.dfa.add_symbol(symbol),
        }
    }

    pub fn delete_symbol(&mut self, symbol: &str) -> Result<(), AutomatonError> {
        match self.mode {
            Mode::Nfa => self.nfa.delete_symbol(symbol),
            Mode::Dfa => self.dfa.delete_symbol(symbol),
        }
    }

    pub fn add_transition(&mut self, src: &str, symbol: &str, tgt: &str) -> Result<(), AutomatonError> {
        match self.mode {
            Mode::Nfa => self.nfa.add_transition(src, symbol, tgt),
            Mode::Dfa => self.dfa.add_transition(src, symbol, tgt),
        }
    }

    pub fn delete_transition(&mut self, src: &str, symbol: &str, tgt: &str) {
        match self.mode {
            Mode::Nfa => self.nfa.delete_transition(src, symbol, tgt),
            Mode::Dfa => self.dfa.delete_transition(src, symbol, tgt),
        }
    }

    pub fn set_start(&mut self, name: Option<&str>) -> Result<(), AutomatonError> {
        match self.mode {
            Mode::Nfa => self.nfa.set_start(name),
            Mode::Dfa => self.dfa.set_start(name),
        }
    }

    pub fn add_final(&mut self, name: &str) -> Result<(), AutomatonError> {
        match self.mode {
            Mode::Nfa => self.nfa.add_final(name),
            Mode::Dfa => self.dfa.add_final(name),
        }
    }

    pub fn remove_final(&mut self, name: &str) {
        match self.mode {
            Mode::Nfa => self.nfa.remove_final(name),
            Mode::Dfa => self.dfa.remove_final(name),
        }
    }

    /// Replaces the active engine with a fresh empty instance. The state map
    /// is cleared as well, since the conversion provenance is meaningless
    /// once either automaton changes.
    pub fn reset_automaton(&mut self) {
        match self.mode {
            Mode::Nfa => self.nfa = Nfa::new(),
            Mode::Dfa => self.dfa = Dfa::new(),
        }
        self.state_map.clear();
    }

    /// Converts the held NFA and replaces the held DFA wholesale. Returns
    /// the user-facing success message; fails when the NFA has no states.
    pub fn convert_to_dfa(&mut self) -> Result<&'static str, AutomatonError> {
        if self.nfa.states().is_empty() {
            return Err(AutomatonError::EmptyNfa);
        }

        let (dfa, mapping) = self.nfa.to_dfa();
        debug!("Conversion produced {} DFA states", dfa.states().len());

        self.dfa = dfa;
        self.state_map = mapping
            .into_iter()
            .map(|(subset, name)| (name, subset))
            .collect();

        Ok("NFA converted to DFA")
    }

    /// Simulates the input against the engine selected by the mode.
    pub fn simulate_current(&self, input: &str) -> SimulationTrace {
        match self.mode {
            Mode::Nfa => self.simulate_nfa(input),
            Mode::Dfa => self.simulate_dfa(input),
        }
    }

    pub fn simulate_nfa(&self, input: &str) -> SimulationTrace {
        simulation::simulate_nfa(&self.nfa, input)
    }

    pub fn simulate_dfa(&self, input: &str) -> SimulationTrace {
        simulation::simulate_dfa(&self.dfa, input)
    }

    /// Dumps the active engine, tagged with the mode.
    pub fn to_dump(&self) -> AutomatonDump {
        match self.mode {
            Mode::Nfa => AutomatonDump::Nfa(self.nfa.to_dump()),
            Mode::Dfa => AutomatonDump::Dfa(self.dfa.to_dump()),
        }
    }

    /// Restores the engine tagged in the dump and switches the mode to it.
    /// The manager is left unchanged when loading fails.
    pub fn load_dump(&mut self, dump: &AutomatonDump) -> Result<(), AutomatonError> {
        match dump {
            AutomatonDump::Nfa(dump) => {
                self.nfa = Nfa::from_dump(dump)?;
                self.mode = Mode::Nfa;
            }
            AutomatonDump::Dfa(dump) => {
                self.dfa = Dfa::from_dump(dump)?;
                self.mode = Mode::Dfa;
            }
        }

        // The loaded automaton has no relation to any earlier conversion.
        self.state_map.clear();
        Ok(())
    }

    /// Installs the sample NFA accepting strings over {a, b} that end in
    /// 'a' as the held NFA.
    pub fn load_sample(&mut self) {
        self.nfa = sample_nfa().expect("the sample automaton is well formed");
        self.state_map.clear();
    }
}

fn sample_nfa() -> Result<Nfa, AutomatonError> {
    let mut nfa = Nfa::new();
    nfa.add_state("q0")?;
    nfa.add_state("q1")?;
    nfa.add_symbol("a")?;
    nfa.add_symbol("b")?;
    nfa.set_start(Some("q0"))?;
    nfa.add_final("q1")?;
    nfa.add_transition("q0", "a", "q1")?;
    nfa.add_transition("q0", "a", "q0")?;
    nfa.add_transition("q0", "b", "q0")?;
    nfa.add_transition("q1", "a", "q1")?;
    nfa.add_transition("q1", "b", "q0")?;
    Ok(nfa)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_mode_routes_to_the_selected_engine() {
        let mut manager = AutomatonManager::new();

        manager.add_state("q0").unwrap();
        manager.set_mode(Mode::Dfa);
        manager.add_state("q0").unwrap();

        assert_eq!(manager.nfa().states(), ["q0"]);
        assert_eq!(manager.dfa().states(), ["q0"]);
        assert_eq!(manager.current().states(), ["q0"]);
    }

    #[test]
    fn test_convert_requires_a_nonempty_nfa() {
        let mut manager = AutomatonManager::new();

        assert_eq!(manager.convert_to_dfa().unwrap_err(), AutomatonError::EmptyNfa);
    }

    #[test]
    fn test_convert_replaces_the_dfa_and_stores_the_state_map() {
        let mut manager = AutomatonManager::new();
        manager.load_sample();

        let message = manager.convert_to_dfa().unwrap();
        assert_eq!(message, "NFA converted to DFA");

        // Conversion fills the DFA but does not switch the mode.
        assert_eq!(manager.mode(), Mode::Nfa);
        assert_eq!(manager.dfa().states(), ["q0", "q1"]);

        assert_eq!(
            manager.state_map().get("q0"),
            Some(&BTreeSet::from(["q0".to_owned()]))
        );
        assert_eq!(
            manager.state_map().get("q1"),
            Some(&BTreeSet::from(["q0".to_owned(), "q1".to_owned()]))
        );

        // A later conversion replaces the DFA wholesale.
        manager.nfa_mut().delete_state("q1").unwrap();
        manager.convert_to_dfa().unwrap();
        assert_eq!(manager.state_map().len(), 1);
    }

    #[test]
    fn test_reset_clears_the_state_map() {
        let mut manager = AutomatonManager::new();
        manager.load_sample();
        manager.convert_to_dfa().unwrap();
        assert!(!manager.state_map().is_empty());

        manager.reset_automaton();
        assert!(manager.nfa().states().is_empty());
        assert!(manager.state_map().is_empty());

        // Resetting in DFA mode leaves the NFA alone.
        manager.load_sample();
        manager.set_mode(Mode::Dfa);
        manager.reset_automaton();
        assert!(manager.dfa().states().is_empty());
        assert_eq!(manager.nfa().states(), ["q0", "q1"]);
    }

    #[test]
    fn test_dump_round_trip_preserves_the_mode() {
        let mut manager = AutomatonManager::new();
        manager.load_sample();
        manager.convert_to_dfa().unwrap();
        manager.set_mode(Mode::Dfa);

        let dump = manager.to_dump();

        let mut restored = AutomatonManager::new();
        restored.load_dump(&dump).unwrap();

        assert_eq!(restored.mode(), Mode::Dfa);
        assert_eq!(restored.to_dump(), dump);
        assert!(restored.state_map().is_empty());
        assert!(restored.dfa().accepts("aaba"));
    }

    #[test]
    fn test_simulation_follows_the_mode() {
        let mut manager = AutomatonManager::new();
        manager.load_sample();

        assert!(manager.simulate_current("aba").accepted);

        // The DFA is still empty, so DFA-mode simulation has no start.
        manager.set_mode(Mode::Dfa);
        assert!(!manager.simulate_current("aba").accepted);

        manager.set_mode(Mode::Nfa);
        manager.convert_to_dfa().unwrap();
        manager.set_mode(Mode::Dfa);
        assert!(manager.simulate_current("aba").accepted);
    }
}
