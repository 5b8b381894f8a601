use clap::Parser;
use medcard_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Load .env before reading any configuration from the environment
    dotenv::dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => {
                result
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(medcard_processor::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Medical Card Processor - Card Image Data Extractor");
    println!("==================================================");
    println!();
    println!("Extract structured patient data from photographed medical cards via a");
    println!("remote vision-language model and export validated records to CSV.");
    println!();
    println!("USAGE:");
    println!("    medcard-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process a directory of card images (main command)");
    println!("    parse       Parse a saved model reply without calling the API");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process the default ./images directory:");
    println!("    medcard-processor process");
    println!();
    println!("    # Process a specific directory, extracting only age and sex:");
    println!("    medcard-processor process --input /path/to/cards --fields age,sex");
    println!();
    println!("    # Re-parse a saved reply:");
    println!("    medcard-processor parse \"<age>34</age><sex>M</sex>\"");
    println!();
    println!("For detailed help on any command, use:");
    println!("    medcard-processor <COMMAND> --help");
}
