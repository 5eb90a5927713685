use std::fs::File;
use std::io::stdout;
use std::io::BufWriter;

use anyhow::bail;
use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use log::info;

use fsmlab_automata::AutomatonManager;
use fsmlab_automata::Mode;
use fsmlab_io::io_json::read_automaton;
use fsmlab_io::io_json::write_automaton;

#[derive(Parser, Debug)]
#[command(
    name = "fsmconvert",
    about = "An NFA to DFA conversion tool",
    long_about = "Converts a stored NFA into an equivalent DFA using the subset construction and writes the resulting dump"
)]
struct Cli {
    #[arg(value_name = "FILE")]
    nondeterministic_automaton: String,

    output: Option<String>,

    /// Print the mapping from generated DFA states to NFA state subsets on
    /// standard error.
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let file = File::open(&cli.nondeterministic_automaton)?;
    let dump = read_automaton(file)?;

    let mut manager = AutomatonManager::new();
    manager.load_dump(&dump)?;
    if manager.mode() != Mode::Nfa {
        bail!("{} does not contain an NFA", cli.nondeterministic_automaton);
    }

    let message = manager.convert_to_dfa()?;
    info!("{message}");

    manager.set_mode(Mode::Dfa);
    let dump = manager.to_dump();
    if let Some(filename) = cli.output {
        write_automaton(BufWriter::new(File::create(filename)?), &dump)?;
    } else {
        write_automaton(stdout(), &dump)?;
    }

    if cli.map {
        for (name, subset) in manager.state_map() {
            eprintln!("{name} = {{{}}}", subset.iter().format(", "));
        }
    }

    Ok(())
}
