use std::error::Error;
use std::fs::File;

use clap::Parser;

use fsmlab_automata::Automaton;
use fsmlab_io::io_json::read_manager;

#[derive(Parser, Debug)]
#[command(
    name = "fsminfo",
    about = "Prints the formal definition of a stored automaton"
)]
struct Cli {
    #[arg(value_name = "FILE")]
    filename: String,

    /// Also print the transition table.
    #[arg(long)]
    table: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let file = File::open(cli.filename)?;
    let manager = read_manager(file)?;
    let automaton = manager.current();

    println!("Mode: {}", manager.mode());
    println!("Number of states: {}", automaton.states().len());
    println!();
    println!("{}", automaton.formal_definition());

    if cli.table {
        let (header, rows) = automaton.transition_table();
        print_row(&header);
        for row in &rows {
            print_row(row);
        }
    }

    Ok(())
}

fn print_row(cells: &[String]) {
    for cell in cells {
        print!("{cell:>12}");
    }
    println!();
}
