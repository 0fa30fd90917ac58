//! rankpdf CLI - persona-driven section ranking for PDF collections

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use rankpdf::rank::load_embedder;
use rankpdf::render::to_json;
use rankpdf::{
    detect::document_name, EmbedderKind, JsonFormat, ParseOptions, Pipeline, PipelineConfig,
    Report,
};

#[derive(Parser)]
#[command(name = "rankpdf")]
#[command(version)]
#[command(about = "Rank PDF sections against a persona and job to be done", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, rank and write the report (default)
    Run(RunArgs),

    /// Print the titles and paragraphs found in one PDF as JSON
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Skip unreadable pages instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Directory containing input.json and PDFs/
    #[arg(long, value_name = "DIR", env = "RANKPDF_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Directory receiving output.json
    #[arg(long, value_name = "DIR", env = "RANKPDF_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Directory containing the embedding model
    #[arg(long, value_name = "DIR", env = "RANKPDF_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Embedding backend: hashing, or onnx (requires the onnx feature)
    #[arg(long, value_name = "KIND", env = "RANKPDF_EMBEDDER")]
    embedder: Option<EmbedderKind>,

    /// Vector length for the hashing embedder
    #[arg(long, value_name = "N")]
    dimension: Option<usize>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("rankpdf=info"))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run(args)) => cmd_run(args),
        Some(Commands::Extract {
            input,
            output,
            compact,
            lenient,
        }) => cmd_extract(&input, output.as_deref(), compact, lenient),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_config(args: RunArgs) -> PipelineConfig {
    let mut config = PipelineConfig::resolve();

    if let Some(dir) = args.input_dir {
        config = config.with_input_dir(dir);
    }
    if let Some(dir) = args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(dir) = args.model_dir {
        config = config.with_model_dir(dir);
    }
    if let Some(kind) = args.embedder {
        config = config.with_embedder(kind);
    }
    if let Some(dimension) = args.dimension {
        config = config.with_dimension(dimension);
    }
    if args.compact {
        config = config.with_format(JsonFormat::Compact);
    }
    config
}

fn cmd_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(build_config(args));
    println!(
        "{} {}",
        "Input:".cyan().bold(),
        pipeline.config().input_dir.display()
    );

    let input = pipeline.read_input()?;
    let documents = pipeline.discover()?;

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let corpus = pipeline.extract_all_with(&documents, |path, _| {
        pb.set_message(document_name(path));
        pb.inc(1);
    });
    pb.finish_with_message(format!("{} paragraphs", corpus.len()));

    let report = pipeline.finish(&documents, &input, &corpus, |config| {
        load_embedder(config.embedder, &config.model_dir, config.dimension)
    })?;

    print_summary(&report, &pipeline.config().output_path());
    Ok(())
}

fn print_summary(report: &Report, output: &Path) {
    println!();
    println!("{}", "Top sections".green().bold());
    println!("{}", "─".repeat(40).dimmed());

    if report.extracted_sections.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for section in &report.extracted_sections {
        println!(
            "  {}. {} {}",
            section.rank,
            section.title.bold(),
            format!("({} p{})", section.document, section.page).dimmed()
        );
    }

    println!();
    println!("{} {}", "Saved to".green(), output.display());
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = if lenient {
        ParseOptions::new().lenient()
    } else {
        ParseOptions::new()
    };
    let doc = rankpdf::parser::parse_path(input, options)?;
    let records = rankpdf::PageBlockClassifier::new().classify_document(&doc);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&records, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "rankpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Persona-driven section ranking for PDF collections");
    println!();
    println!(
        "ONNX embedder: {}",
        if cfg!(feature = "onnx") {
            "available".green()
        } else {
            "not built".dimmed()
        }
    );
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_embedder_flag_parses_kind() {
        let cli = Cli::try_parse_from(["rankpdf", "--embedder", "onnx"]).unwrap();
        assert_eq!(cli.run.embedder, Some(EmbedderKind::Onnx));

        let cli = Cli::try_parse_from(["rankpdf", "run", "--embedder", "Hashing"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => assert_eq!(args.embedder, Some(EmbedderKind::Hashing)),
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_embedder_flag_rejects_unknown_kind() {
        let err = Cli::try_parse_from(["rankpdf", "--embedder", "word2vec"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("word2vec"));
    }
}
