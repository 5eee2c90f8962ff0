//! Prints a search trace written by the visualizer (`logging.trace_path`)
//! as one line per cell-state transition, followed by a summary.

use pathviz::logging::init_logging;
use pathviz::SearchTrace;
use std::env;
use std::process;

fn main() {
    init_logging("warn");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <trace.json>", args[0]);
        eprintln!("Prints the cell-state transitions recorded during a search");
        process::exit(1);
    }

    let filename = &args[1];
    let trace = match SearchTrace::load_from_file(filename) {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!("Failed to load {}: {}", filename, e);
            process::exit(1);
        }
    };

    println!("=== Search Trace: {} ===", filename);
    for transition in trace.transitions() {
        println!("{}", transition);
    }

    println!("\n=== Summary ===");
    println!("{}", trace.summary());
}
