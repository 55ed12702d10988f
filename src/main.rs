//! Wordlist Gen - combinatorial wordlist generation for penetration testing
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use wordlist_gen::cli::Args;
use wordlist_gen::processor::{GenerationMode, Generator, GeneratorConfig};
use wordlist_gen::progress::{print_banner, print_error, print_header, print_info, print_warning};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        for cause in e.chain().skip(1) {
            print_error(&format!("  Caused by: {}", cause));
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Print banner unless quiet mode
    if !args.quiet {
        print_banner();
    }

    args.validate()?;

    let config = GeneratorConfig::from_args(&args)?;

    if !args.quiet {
        if has_unicode(&config) {
            print_warning("Input contains non-ASCII characters; output is UTF-8 encoded");
        }
        if let Some(safe) = args.large_chunk_threshold() {
            print_warning(&format!(
                "Chunks may exceed 2GB, which some tools (e.g. john) cannot read; use -c {} or less",
                safe
            ));
        }
        if args.verbose {
            print_config(&config);
        }
    }

    let generator = Generator::new(config);
    let summary = generator.run()?;

    if !args.quiet {
        generator.stats().print_summary(summary.stopped);
    }

    Ok(())
}

fn has_unicode(config: &GeneratorConfig) -> bool {
    match config.mode {
        GenerationMode::Odometer(ref options) => options.has_unicode(),
        GenerationMode::Permute(ref words) => words.iter().any(|w| !w.is_ascii()),
    }
}

/// Print configuration summary
fn print_config(config: &GeneratorConfig) {
    print_header("Configuration");

    match config.mode {
        GenerationMode::Odometer(ref options) => {
            print_info(&format!("Lengths:      {}..={}", options.min, options.max));
            if let Some(ref pattern) = options.pattern {
                print_info(&format!("Pattern:      {}", pattern));
            }
            if let Some(ref literal) = options.literal {
                print_info(&format!("Literal:      {}", literal));
            }
            if let Some(ref start) = options.start {
                print_info(&format!("Start:        {}", start));
            }
            if let Some(ref end) = options.end {
                print_info(&format!("End:          {}", end));
            }
            if options.duplicates.is_active() {
                print_info(&format!("Duplicates:   {:?}", options.duplicates.as_array()));
            }
            print_info(&format!("Order:        {:?}", options.order));
        }
        GenerationMode::Permute(ref words) => {
            print_info(&format!("Permuting:    {} elements", words.len()));
        }
    }

    match config.output {
        Some(ref path) => print_info(&format!("Output:       {:?}", path)),
        None => print_info("Output:       stdout"),
    }
    if config.split.is_set() {
        print_info(&format!("Split:        {:?}", config.split));
    }
    print_info(&format!("Resume:       {}", config.resume));
    print_info(&format!("Buffer size:  {} KB", config.buffer_size / 1024));
}
