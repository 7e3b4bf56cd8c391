use std::env;
use std::path::PathBuf;

use vbrief_core::{ValidationReport, load_file, validate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut path: Option<PathBuf> = None;
    let mut strict = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strict = true,
            _ => {
                if path.is_none() {
                    path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let path = path.ok_or("missing document path")?;
    let document = load_file(&path, strict)?;
    let report = validate(&document);

    if !report.is_valid() {
        eprintln!("document validation failed");
        print_report(&report);
        std::process::exit(1);
    }

    if !report.warnings.is_empty() {
        eprintln!("document validated with warnings:");
        print_report(&report);
    } else {
        println!("document validated successfully");
    }

    Ok(())
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        eprintln!("error {} {}: {}", issue.code(), issue.path(), issue.message());
    }
    for issue in &report.warnings {
        eprintln!("warning {} {}: {}", issue.code(), issue.path(), issue.message());
    }
}
