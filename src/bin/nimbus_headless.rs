//! Nimbus Headless Display Runner
//!
//! A headless display for testing and automation.
//! Reads text from stdin or a file, prints it on the console and writes the
//! resulting frame as PNG or the display state as a JSON snapshot.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use nimbus_display::app::Config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Parse command line arguments
    let mut mode: Option<u16> = None;
    let mut input_file: Option<String> = None;
    let mut config_file: Option<PathBuf> = None;
    let mut png_path: Option<PathBuf> = None;
    let mut output_format = OutputFormat::Text;
    let mut logo = false;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-m" | "--mode" => {
                i += 1;
                if i < args.len() {
                    mode = args[i].parse().ok();
                }
            },
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-o" | "--png" => {
                i += 1;
                if i < args.len() {
                    png_path = Some(PathBuf::from(&args[i]));
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-l" | "--logo" => {
                logo = true;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let config = match &config_file {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => Config::load_or_default(),
    };

    // Create display
    let (display, mut host) = nimbus_display::init(&config);
    if let Some(id) = mode {
        if let Err(e) = display.set_mode(id) {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    // Read input
    let input_data = match &input_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            // Read from stdin
            let mut data = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    if logo {
        let height = display.mode().pixel_height() as i32;
        display.plonk_logo(4, height - 16);
        display.set_curpos(0, 2);
    }

    display.print(&input_data);
    let frame = host.publish();

    if let Some(path) = &png_path {
        if let Err(e) = frame.save_png(path) {
            eprintln!("Error writing '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    // Output result
    match output_format {
        OutputFormat::Text => {
            let snapshot = display.snapshot();
            println!(
                "Display State (mode {}, {}x{}):",
                snapshot.mode, snapshot.width, snapshot.height
            );
            println!("Cursor: ({}, {})", snapshot.cursor.row, snapshot.cursor.col);
            println!(
                "Frame: {}x{} with {} px border",
                frame.width(),
                frame.height(),
                frame.border()
            );
        },
        OutputFormat::Json => {
            let snapshot = display.snapshot();
            match snapshot.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing snapshot: {}", e);
                    return ExitCode::FAILURE;
                },
            }
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("Nimbus Headless Display Runner");
    println!();
    println!("Usage: nimbus-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -m, --mode <ID>      Screen mode, 40 or 80 (default: from config)");
    println!("  -f, --file <PATH>    Read input from file");
    println!("  -c, --config <PATH>  Load configuration from a JSON file");
    println!("  -o, --png <PATH>     Write the published frame as PNG");
    println!("  -l, --logo           Draw the boot logo before printing");
    println!("  -j, --json           Output snapshot as JSON");
    println!("  -t, --text           Output a summary as text (default)");
    println!("  -h, --help           Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  echo 'HELLO WORLD' | nimbus-headless -m 40 -o hello.png");
    println!("  nimbus-headless --logo -o boot.png listing.txt");
    println!("  nimbus-headless --json < listing.txt > snapshot.json");
}
