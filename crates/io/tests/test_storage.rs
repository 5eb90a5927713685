use test_case::test_case;

use fsmlab_automata::Mode;
use fsmlab_io::io_json::read_automaton;
use fsmlab_io::io_json::read_manager;
use fsmlab_io::io_json::write_automaton;
use fsmlab_io::io_json::IOError;

const SAMPLE_NFA: &str = r#"{
  "mode": "NFA",
  "states": ["q0", "q1"],
  "symbols": ["a", "b"],
  "start": "q0",
  "finals": ["q1"],
  "transitions": {
    "q0": { "a": ["q0", "q1"], "b": ["q0"] },
    "q1": { "a": ["q1"], "b": ["q0"] }
  }
}"#;

const EPSILON_NFA: &str = r#"{
  "mode": "NFA",
  "states": ["q0", "q1"],
  "symbols": ["ε", "a"],
  "start": "q0",
  "finals": ["q1"],
  "transitions": {
    "q0": { "ε": ["q1"] },
    "q1": { "a": ["q1"] }
  }
}"#;

const SAMPLE_DFA: &str = r#"{
  "mode": "DFA",
  "states": ["q0", "q1"],
  "symbols": ["a", "b"],
  "start": "q0",
  "finals": ["q1"],
  "transitions": {
    "q0": { "a": "q1", "b": "q0" },
    "q1": { "a": "q1", "b": "q0" }
  }
}"#;

const DANGLING_NFA: &str = r#"{
  "mode": "NFA",
  "states": ["q0"],
  "symbols": ["a"],
  "start": "q0",
  "finals": [],
  "transitions": {
    "q0": { "a": ["q7"] }
  }
}"#;

#[test_case(SAMPLE_NFA, Mode::Nfa ; "sample nfa")]
#[test_case(EPSILON_NFA, Mode::Nfa ; "epsilon nfa")]
#[test_case(SAMPLE_DFA, Mode::Dfa ; "sample dfa")]
fn test_round_trip(input: &str, mode: Mode) {
    let _ = env_logger::builder().is_test(true).try_init();

    let dump = read_automaton(input.as_bytes()).unwrap();

    let manager = read_manager(input.as_bytes()).unwrap();
    assert_eq!(manager.mode(), mode);
    assert_eq!(manager.to_dump(), dump);

    // Writing and reading back yields an identical dump.
    let mut buffer = Vec::new();
    write_automaton(&mut buffer, &dump).unwrap();
    assert_eq!(read_automaton(buffer.as_slice()).unwrap(), dump);
}

#[test]
fn test_loaded_nfa_is_usable() {
    let _ = env_logger::builder().is_test(true).try_init();

    let manager = read_manager(SAMPLE_NFA.as_bytes()).unwrap();

    assert!(manager.nfa().accepts("aaba"));
    assert!(!manager.nfa().accepts("ab"));
}

#[test]
fn test_dangling_reference_is_rejected_on_load() {
    let _ = env_logger::builder().is_test(true).try_init();

    // The dump itself parses, but loading it re-validates the references.
    assert!(read_automaton(DANGLING_NFA.as_bytes()).is_ok());
    assert!(matches!(
        read_manager(DANGLING_NFA.as_bytes()),
        Err(IOError::Automaton(_))
    ));
}

#[test]
fn test_malformed_json_is_rejected() {
    let _ = env_logger::builder().is_test(true).try_init();

    assert!(matches!(
        read_automaton("des (0, 1, 2)".as_bytes()),
        Err(IOError::InvalidFormat(_))
    ));

    // A dump without a mode tag cannot select an engine.
    assert!(matches!(
        read_automaton(r#"{"states": [], "symbols": []}"#.as_bytes()),
        Err(IOError::InvalidFormat(_))
    ));
}
