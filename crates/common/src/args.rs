//! Command line argument parsing for Brioche tools.

use clap::Parser;
use std::{fs, path::Path, process};

/// Command line arguments for Brioche tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path of the Datalog program, or "all" to process all demo files
    #[arg(value_name = "PROGRAM")]
    pub program: String,
}

impl Args {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn should_process_all(&self) -> bool {
        self.program == "all" || self.program == "--all"
    }

    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown_program".into())
    }
}

/// Get all .dl files from the demo directory, sorted alphabetically
pub fn get_demo_files() -> Vec<std::path::PathBuf> {
    let demo_dir = "demos";

    // Check if demo directory exists
    if !Path::new(demo_dir).exists() {
        eprintln!("Error: Directory '{}' not found", demo_dir);
        process::exit(1);
    }

    // Read and collect .dl files
    let entries = match fs::read_dir(demo_dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error reading demo dir: {}", e);
            process::exit(1);
        }
    };

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("dl") {
            files.push(path);
        }
    }

    files.sort();

    if files.is_empty() {
        eprintln!("No .dl files found in {}", demo_dir);
        process::exit(1);
    }

    files
}
