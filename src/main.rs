//! values-hoist CLI
//!
//! Entry point for the `values-hoist` command-line tool.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use values_hoist::{
    ConfigOverrides, ConsoleReporter, HoistConfig, Pipeline, PipelineConfig,
};

#[derive(Parser)]
#[command(name = "values-hoist")]
#[command(about = "Hoist values shared by every service in a layer", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Root directory containing the layer directories
    root: PathBuf,

    /// Path to a config file (default: <root>/.values-hoist.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Glob matched against layer directory names
    #[arg(long)]
    layer_glob: Option<String>,

    /// Flat path separator between key segments
    #[arg(long)]
    separator: Option<String>,

    /// File name of shared and service documents
    #[arg(long)]
    shared_filename: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hoist common values into each layer's shared document
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Compute everything but do not write any file
        #[arg(long)]
        dry_run: bool,

        /// Print every loaded and saved document
        #[arg(long, short = 'v')]
        verbose: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List discovered layers and their service documents
    Layers {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the common values of one layer as YAML, without writing
    Common {
        #[command(flatten)]
        config: ConfigArgs,

        /// Layer name
        #[arg(long, short = 'l')]
        layer: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            dry_run,
            verbose,
            json,
        } => run_hoist(config, dry_run, verbose, json),
        Commands::Layers { config, json } => run_layers(config, json),
        Commands::Common { config, layer } => run_common(config, &layer),
    }
}

fn build_pipeline_config(args: ConfigArgs, dry_run: bool) -> PipelineConfig {
    let overrides = ConfigOverrides {
        shared_filename: args.shared_filename,
        layer_glob: args.layer_glob,
        separator: args.separator,
    };
    let hoist = match HoistConfig::load(&args.root, args.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    PipelineConfig {
        root: args.root,
        hoist,
        dry_run,
    }
}

fn run_hoist(args: ConfigArgs, dry_run: bool, verbose: bool, json: bool) {
    let config = build_pipeline_config(args, dry_run);
    let reporter = ConsoleReporter::new(verbose);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
            eprintln!("Warning: could not install Ctrl-C handler: {}", e);
        }
    }

    let pipeline = Pipeline::new(config, &reporter).with_cancel_flag(cancel);
    match pipeline.run() {
        Ok(summary) => {
            if json {
                match summary.to_json() {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error serializing summary: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                println!("{}", summary.human_summary);
            }
            process::exit(summary.status.exit_code());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run_layers(args: ConfigArgs, json: bool) {
    let config = build_pipeline_config(args, false);
    let reporter = ConsoleReporter::new(false);
    let pipeline = Pipeline::new(config, &reporter);

    let layers = match pipeline.discover() {
        Ok(layers) => layers,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if json {
        let output: Vec<serde_json::Value> = layers
            .iter()
            .map(|layer| {
                serde_json::json!({
                    "name": layer.name,
                    "shared_path": layer.shared_path.display().to_string(),
                    "services": layer
                        .service_paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else if layers.is_empty() {
        println!("No layers with service documents found");
    } else {
        for layer in &layers {
            println!("{}: {} service document(s)", layer.name, layer.service_paths.len());
            for path in &layer.service_paths {
                println!("  - {}", path.display());
            }
        }
    }
}

fn run_common(args: ConfigArgs, layer: &str) {
    let config = build_pipeline_config(args, true);
    let reporter = ConsoleReporter::new(false);
    let pipeline = Pipeline::new(config, &reporter);

    match pipeline.common_values(layer) {
        Ok(common) => match serde_yaml::to_string(&common.to_value()) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
