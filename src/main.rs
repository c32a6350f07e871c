use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use revealer::logging::{init_tracing_with, level_for_verbosity};
use revealer::{analyze_bytes, Dataset, ExtractionEngine, Registry, RevealerConfig};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "revealer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract features from labeled executable samples")]
#[command(after_help = "EXAMPLES:\n  \
    revealer extract conf.toml ./dataset -o ./out\n  \
    revealer extract conf.json ./dataset --workers 8 --json-logs\n  \
    revealer inspect conf.toml ./dataset/malicious/sample.bin")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configured extractors over a labeled dataset
    Extract {
        /// Configuration file (.toml or .json)
        conf_file: PathBuf,

        /// Dataset root; each subdirectory is a label
        input_dir: PathBuf,

        /// Output root
        #[arg(short, long, default_value = "./out")]
        output_dir: PathBuf,

        /// Samples processed concurrently (overrides engine.workers)
        #[arg(long, env = "REVEALER_WORKERS")]
        workers: Option<usize>,
    },
    /// Extract features from one file and print them as JSON
    Inspect {
        /// Configuration file (.toml or .json)
        conf_file: PathBuf,

        /// Sample to analyze
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing_with(level_for_verbosity(cli.verbose), cli.json_logs);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{:#}", err), "revealer failed");
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Extract {
            conf_file,
            input_dir,
            output_dir,
            workers,
        } => {
            let mut config = RevealerConfig::load_from_file(&conf_file)?;
            if let Some(workers) = workers {
                config.engine.workers = workers;
            }
            let dataset = Dataset::open(&input_dir)?;
            let engine =
                ExtractionEngine::from_config(&config, &Registry::with_builtins(), &output_dir)?;
            let report = engine.run(&dataset)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Inspect { conf_file, file } => {
            let config = RevealerConfig::load_from_file(&conf_file)?;
            let providers = Registry::with_builtins().resolve(&config.features, &config.providers);
            let data = revealer::io::read_sample(&file, &config.io)
                .with_context(|| format!("reading {}", file.display()))?;
            let analysis = analyze_bytes(&data, &providers, config.digest);

            let images: Vec<_> = analysis
                .images
                .iter()
                .map(|img| {
                    let (width, height) = img.artifact.dimensions();
                    json!({
                        "provider": img.provider,
                        "width": width,
                        "height": height,
                        "format": img.artifact.encoding.extension(),
                    })
                })
                .collect();
            let out = json!({
                "id": analysis.id,
                "record": analysis.record,
                "images": images,
                "outcomes": analysis.outcomes,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
