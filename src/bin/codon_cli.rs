use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use codon_optimizer::{
    cai,
    codon_usage::{CodonUsageCatalog, DEFAULT_ORGANISM},
    engine::CodonOptimizationEngine,
    enzymes::RestrictionData,
    error::OptimizerError,
    parameters::OptimizerParameters,
    restriction_sites::find_sites,
    sequence_input::{SequenceInput, SequenceKind},
    terminators::detect_terminators,
    CODON_USAGE, ENZYMES,
};
use codon_protocol::{EngineError, ErrorCode, OptimizationRequest, DEFAULT_END_LENGTH};
use serde::Serialize;
use serde_json::json;
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codon_cli", version, about = "Codon optimization for heterologous expression")]
struct Cli {
    /// Host organism, full name or alias such as `ecoli`
    #[arg(short, long, global = true, default_value = DEFAULT_ORGANISM)]
    organism: String,

    /// Codon usage CSV replacing the builtin tables
    #[arg(long, global = true)]
    table: Option<String>,

    /// Enzyme registry JSON replacing the builtin one
    #[arg(long, global = true)]
    enzyme_file: Option<String>,

    /// Search bounds and thresholds as JSON (inline or @file)
    #[arg(long, global = true)]
    parameters: Option<String>,

    /// Log search progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Optimize a DNA or protein sequence (inline, FASTA, or @file)
    Optimize {
        sequence: String,
        #[arg(long)]
        remove_sites: bool,
        #[arg(long)]
        remove_terminators: bool,
        /// Comma-separated enzyme names; all enzymes when omitted
        #[arg(long, value_delimiter = ',')]
        enzymes: Vec<String>,
        #[arg(long)]
        optimize_ends: bool,
        #[arg(long, default_value_t = DEFAULT_END_LENGTH)]
        end_length: usize,
    },
    /// Run an optimization request given as JSON (inline or @file)
    Request { json: String },
    /// Codon Adaptation Index of a DNA sequence
    Cai { sequence: String },
    /// Codon count, GC content and w_i moments of a DNA sequence
    Stats { sequence: String },
    /// Restriction sites in a DNA sequence
    Sites {
        sequence: String,
        #[arg(long, value_delimiter = ',')]
        enzymes: Vec<String>,
    },
    /// Terminator-like structures in a DNA sequence
    Terminators { sequence: String },
    /// Available organisms
    Organisms {
        #[arg(long)]
        search: Option<String>,
    },
    /// Enzyme registry
    Enzymes,
    Capabilities,
}

fn load_arg(value: &str) -> Result<String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| {
            EngineError::new(ErrorCode::Io, format!("Could not read file '{path}': {e}")).into()
        })
    } else {
        Ok(value.to_string())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn load_dna(value: &str) -> Result<String> {
    match SequenceInput::parse(&load_arg(value)?)?.kind {
        SequenceKind::Dna(dna) => Ok(dna),
        SequenceKind::Protein(_) => Err(EngineError::new(
            ErrorCode::InvalidInput,
            "This command expects a DNA sequence",
        )
        .into()),
    }
}

fn enzyme_filter(enzymes: &[String]) -> Option<&[String]> {
    Some(enzymes).filter(|names| !names.is_empty())
}

fn main() {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        let error = match e.downcast::<OptimizerError>() {
            Ok(optimizer_error) => EngineError::from(optimizer_error),
            Err(e) => match e.downcast::<EngineError>() {
                Ok(engine_error) => engine_error,
                Err(e) => EngineError::new(ErrorCode::Internal, e.to_string()),
            },
        };
        match serde_json::to_string_pretty(&error) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("{error}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let custom_catalog = cli
        .table
        .as_deref()
        .map(CodonUsageCatalog::from_csv_path)
        .transpose()?;
    let catalog = custom_catalog.as_ref().unwrap_or(&*CODON_USAGE);
    let custom_registry = cli
        .enzyme_file
        .as_deref()
        .map(RestrictionData::load_from_path)
        .transpose()?;
    let registry = custom_registry.as_ref().unwrap_or(&*ENZYMES);
    let parameters = match cli.parameters.as_deref() {
        Some(value) => OptimizerParameters::from_json_text(&load_arg(value)?)?,
        None => OptimizerParameters::default(),
    };

    match &cli.command {
        Commands::Organisms { search } => {
            let organisms = match search {
                Some(query) => catalog.search(query),
                None => catalog.organisms(),
            };
            return print_json(&organisms);
        }
        Commands::Enzymes => {
            return print_json(&json!({
                "restriction_enzymes": registry.restriction_enzymes(),
                "simplified_motifs": registry.simplified_motifs(),
            }));
        }
        Commands::Capabilities => {
            return print_json(&CodonOptimizationEngine::capabilities(catalog));
        }
        _ => {}
    }

    let table = catalog.get(&cli.organism).ok_or_else(|| {
        EngineError::new(
            ErrorCode::NotFound,
            format!("Unknown organism '{}'", cli.organism),
        )
    })?;
    let engine = CodonOptimizationEngine::with_parameters(table, registry, parameters);

    match cli.command {
        Commands::Optimize {
            sequence,
            remove_sites,
            remove_terminators,
            enzymes,
            optimize_ends,
            end_length,
        } => {
            let request = OptimizationRequest {
                sequence: load_arg(&sequence)?,
                remove_restriction_sites: remove_sites,
                remove_terminators,
                selected_enzymes: Some(enzymes).filter(|names| !names.is_empty()),
                optimize_ends,
                end_length,
            };
            print_json(&engine.run(&request)?)
        }
        Commands::Request { json } => {
            let request: OptimizationRequest = serde_json::from_str(&load_arg(&json)?)
                .map_err(|e| EngineError::new(ErrorCode::InvalidInput, format!("Invalid request JSON: {e}")))?;
            print_json(&engine.run(&request)?)
        }
        Commands::Cai { sequence } => {
            print_json(&cai::score(&load_dna(&sequence)?, engine.weights())?)
        }
        Commands::Stats { sequence } => {
            print_json(&cai::stats(&load_dna(&sequence)?, engine.weights())?)
        }
        Commands::Sites { sequence, enzymes } => print_json(&find_sites(
            &load_dna(&sequence)?,
            registry,
            enzyme_filter(&enzymes),
        )),
        Commands::Terminators { sequence } => print_json(&detect_terminators(
            &load_dna(&sequence)?,
            &engine.parameters().terminators,
        )),
        Commands::Organisms { .. } | Commands::Enzymes | Commands::Capabilities => Ok(()),
    }
}
