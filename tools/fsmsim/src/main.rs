use std::error::Error;
use std::fs::File;
use std::process::ExitCode;

use clap::Parser;

use fsmlab_io::io_json::read_manager;

#[derive(Parser, Debug)]
#[command(
    name = "fsmsim",
    about = "Simulates an input string on a stored automaton",
    long_about = "Runs the input against the stored automaton and prints a step-by-step trace; the exit code reflects acceptance"
)]
struct Cli {
    #[arg(value_name = "FILE")]
    filename: String,

    input: String,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let file = File::open(cli.filename)?;
    let manager = read_manager(file)?;

    let trace = manager.simulate_current(&cli.input);
    for step in &trace.steps {
        println!("{step}");
    }
    println!("{}", trace.verdict);

    Ok(if trace.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
