//! cwalk CLI
//!
//! Runs or dumps a bincode-encoded cwalk program.

use std::path::Path;

use cwalk::commands::{dump_file, parse_run_options, run_file, DriverError};

fn main() {
    cwalk::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let outcome = match args[1].as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: cwalk run <file> [--stats] [--max-depth=<n|unlimited>]");
                std::process::exit(1);
            }
            parse_run_options(&args[3..])
                .and_then(|options| run_file(Path::new(&args[2]), &options))
                .map(|_| ())
        }
        "dump" => {
            if args.len() < 3 {
                eprintln!("Usage: cwalk dump <file>");
                std::process::exit(1);
            }
            dump_file(Path::new(&args[2])).map(|text| print!("{text}"))
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(DriverError::Usage(format!("unknown command '{other}'"))),
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        if matches!(err, DriverError::Usage(_)) {
            print_usage();
        }
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("cwalk - tree-walking evaluator for a small C subset");
    eprintln!();
    eprintln!("Usage: cwalk <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file>     Execute main of a program file");
    eprintln!("  dump <file>    Print the program tree");
    eprintln!("  help           Show this message");
    eprintln!();
    eprintln!("Run options:");
    eprintln!("  --stats                    Print execution counters to stderr");
    eprintln!("  --max-depth=<n|unlimited>  Call depth limit (default 10000)");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=cwalk_eval=debug) for tracing output.");
}
