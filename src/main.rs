//! docverifier - Checks that docstrings agree with the code they document
//!
//! Reads the fact reports produced by a source extractor and reports every
//! place where a docstring disagrees with its function.

use anyhow::Result;
use docverifier::cli::{
    check, config, detect, fix, normalize_types, parse, print_config_text, print_descriptor_text,
    print_fix_text, print_json, print_results_text, should_fail, Cli, Commands, OutputFormat,
};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Get project root
    let root = Path::new(&cli.path);

    // Execute command
    match cli.command {
        Commands::Check(args) => {
            let results = check(root, &args.targets, &args.codes)?;

            match cli.format {
                OutputFormat::Json => print_json(&results)?,
                OutputFormat::Text => print_results_text(&results),
            }

            if should_fail(&results, args.fail_on) {
                std::process::exit(1);
            }
        }

        Commands::Detect(args) => {
            let detected = detect(&args.file)?;

            match cli.format {
                OutputFormat::Json => print_json(&detected)?,
                OutputFormat::Text => println!("{}", detected),
            }
        }

        Commands::Parse(args) => {
            let (style, doc) = parse(root, &args.file, args.style)?;

            match cli.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "style": style,
                    "docstring": doc,
                }))?,
                OutputFormat::Text => print_descriptor_text(style, &doc),
            }
        }

        Commands::Normalize(args) => {
            let normalized = normalize_types(&args.types);

            match cli.format {
                OutputFormat::Json => print_json(&normalized)?,
                OutputFormat::Text => {
                    for entry in &normalized {
                        println!("{} -> {}", entry.input, entry.normalized);
                    }
                }
            }
        }

        Commands::Fix(args) => {
            let outcome = fix(root, &args.report, &args.function, args.write.as_deref())?;

            match cli.format {
                OutputFormat::Json => print_json(&outcome)?,
                OutputFormat::Text if args.write.is_some() => {
                    for title in &outcome.applied {
                        println!("• {}", title);
                    }
                }
                OutputFormat::Text => print_fix_text(&outcome),
            }
        }

        Commands::Config(args) => {
            let current = config(root, args.show, args.reset)?;

            if args.show || !args.reset {
                match cli.format {
                    OutputFormat::Json => print_json(&current)?,
                    OutputFormat::Text => print_config_text(&current),
                }
            }
        }
    }

    Ok(())
}
