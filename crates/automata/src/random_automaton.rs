use rand::Rng;

use crate::automaton::EPSILON;
use crate::nfa::Nfa;

/// Generates a random NFA with the desired number of states and symbols and
/// the given maximum out degree per state. States are named q0..qN and the
/// symbols are lower case letters; when with_epsilon is set the alphabet
/// additionally contains epsilon and roughly a quarter of the generated
/// arcs are epsilon arcs. State q0 is the start state and every state is
/// accepting with probability one in three.
pub fn random_nfa(num_of_states: usize, num_of_symbols: u32, out_degree: usize, with_epsilon: bool) -> Nfa {
    let mut nfa = Nfa::new();

    for index in 0..num_of_states {
        nfa.add_state(&format!("q{index}")).unwrap();
    }

    let mut symbols: Vec<String> = Vec::new();
    for index in 0..num_of_symbols {
        let symbol = char::from_digit(index + 10, 36).unwrap().to_string();
        nfa.add_symbol(&symbol).unwrap();
        symbols.push(symbol);
    }
    if with_epsilon {
        nfa.add_symbol(EPSILON).unwrap();
    }

    let mut rng = rand::rng();

    for index in 0..num_of_states {
        let source = format!("q{index}");

        for _ in 0..rng.random_range(0..=out_degree) {
            let symbol = if with_epsilon && rng.random_bool(0.25) {
                EPSILON.to_owned()
            } else {
                symbols[rng.random_range(0..symbols.len())].clone()
            };
            let target = format!("q{}", rng.random_range(0..num_of_states));

            nfa.add_transition(&source, &symbol, &target).unwrap();
        }

        if rng.random_bool(1.0 / 3.0) {
            nfa.add_final(&source).unwrap();
        }
    }

    nfa.set_start(Some("q0")).unwrap();
    nfa
}
