use std::io::Read;
use std::io::Write;

use log::trace;
use thiserror::Error;

use fsmlab_automata::AutomatonDump;
use fsmlab_automata::AutomatonError;
use fsmlab_automata::AutomatonManager;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("invalid automaton file: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}

/// Reads a mode-tagged automaton dump from the given reader.
///
/// The format is a JSON object with the fields `states`, `symbols`, `start`,
/// `finals` and `transitions`, plus a `"mode": "NFA" | "DFA"` tag selecting
/// the transition shape (lists of states versus a single state).
pub fn read_automaton(reader: impl Read) -> Result<AutomatonDump, IOError> {
    let dump: AutomatonDump = serde_json::from_reader(reader)?;
    match &dump {
        AutomatonDump::Nfa(_) => trace!("Read NFA dump"),
        AutomatonDump::Dfa(_) => trace!("Read DFA dump"),
    }

    Ok(dump)
}

/// Writes a mode-tagged automaton dump to the given writer, pretty-printed
/// with two-space indentation.
pub fn write_automaton(writer: impl Write, dump: &AutomatonDump) -> Result<(), IOError> {
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}

/// Reads a dump and loads it into a fresh manager, re-validating every
/// membership invariant of the stored automaton.
pub fn read_manager(reader: impl Read) -> Result<AutomatonManager, IOError> {
    let dump = read_automaton(reader)?;

    let mut manager = AutomatonManager::new();
    manager.load_dump(&dump)?;
    Ok(manager)
}
