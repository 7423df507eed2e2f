//! Generate EQUATIONS.md from the equation registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-equations
//! ```
//!
//! Run from the workspace root. Writes `bridge_core/src/equations/EQUATIONS.md`.

use std::path::Path;
use std::process::ExitCode;

use bridge_core::equations::{generate_equations_markdown, ALL_EQUATIONS};
use bridge_core::file_io::write_atomic;

fn main() -> ExitCode {
    let markdown = generate_equations_markdown();
    let output_path = Path::new("bridge_core/src/equations/EQUATIONS.md");

    match write_atomic(output_path, markdown.as_bytes()) {
        Ok(()) => {
            println!(
                "Wrote {} equations ({} bytes) to {}",
                ALL_EQUATIONS.len(),
                markdown.len(),
                output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
