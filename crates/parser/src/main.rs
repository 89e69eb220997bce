use clap::Parser;
use common::{get_demo_files, AllResultsFormatter, Args, FailurePhase};
use parser::program::Program;
use parser::ParserError;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.should_process_all() {
        run_all_demos();
        return;
    }

    match Program::parse(args.program()) {
        Ok(program) => {
            info!(
                "Resolved program {} ({} predicates, {} rules)",
                args.program_name(),
                program.predicates().len() + program.special_predicates().len(),
                program.rules().len()
            );
            println!("{program}");
        }
        Err(e) => {
            error!("Failed to resolve {}: {e}", args.program());
            process::exit(1);
        }
    }
}

fn run_all_demos() {
    let demo_files = get_demo_files();
    let mut formatter = AllResultsFormatter::new("parser", demo_files.len());

    for file_path in &demo_files {
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<non-utf8 path>");
        let Some(path) = file_path.to_str() else {
            formatter.report_failure(file_name, FailurePhase::Parse, "non-UTF-8 path");
            continue;
        };

        match Program::parse(path) {
            Ok(program) => {
                let stats = format!(
                    "{} predicates, {} special, {} rules, {} constraints",
                    program.predicates().len(),
                    program.special_predicates().len(),
                    program.rules().len(),
                    program.constraints().len()
                );
                formatter.report_success(file_name, Some(&stats));
            }
            Err(e) => {
                let phase = match &e {
                    ParserError::Io(_) | ParserError::FailedToParseProgram(_) => {
                        FailurePhase::Parse
                    }
                    _ => FailurePhase::Resolve,
                };
                formatter.report_failure(file_name, phase, &e.to_string());
            }
        }
    }

    formatter.finish();
}
