//! descreve CLI - wildfire-domain corpus builder
//!
//! Cleans raw documents, extracts training sentences and compiles the final
//! corpus.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use descreve::analysis::{analyze, ngrams, tokenize};
use descreve::{
    storage, CleanupOptions, CleanupProfile, CompileOptions, DomainKeywords,
    Pipeline, RawDocument, RuleSegmenter, SourceType,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Wildfire-domain Portuguese corpus normalization and compilation
#[derive(Parser)]
#[command(
    name = "descreve",
    version,
    about = "Build wildfire-domain Portuguese training corpora",
    long_about = "descreve - normalization and compilation engine for wildfire-domain corpora.\n\n\
                  Usage:\n  \
                  descreve clean <file>                 Print the cleaned text\n  \
                  descreve process <inputs> -o <dir>    Write one sentence file per document\n  \
                  descreve compile <dir> <output>       Merge sentence files into a corpus\n  \
                  descreve stats <file>                 Corpus statistics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cleanup pipeline on a raw text file or collector record
    Clean {
        /// Input file (.txt or .json)
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source type for plain text inputs
        #[arg(short, long, default_value = "pdf-document")]
        source_type: SourceKind,

        /// Cleanup profile override
        #[arg(long)]
        profile: Option<ProfileMode>,
    },

    /// Clean, segment and gate documents into sentence files
    Process {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for sentence files
        #[arg(short, long, default_value = "data/04_training_corpus")]
        out_dir: PathBuf,

        /// Source type for plain text inputs
        #[arg(short, long, default_value = "pdf-document")]
        source_type: SourceKind,

        /// Also archive each raw document as JSON in this directory
        #[arg(long)]
        archive: Option<PathBuf>,

        /// Disable parallel processing
        #[arg(long)]
        sequential: bool,
    },

    /// Merge sentence files into a deduplicated corpus
    Compile {
        /// Directory of sentence files
        #[arg(default_value = "data/04_training_corpus")]
        input_dir: PathBuf,

        /// Output corpus file
        #[arg(default_value = "data/final/corpus_descreve.txt")]
        output: PathBuf,

        /// Newline-separated keyword file replacing the built-in vocabulary
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Minimum sentence length in characters
        #[arg(long, default_value_t = descreve::compiler::DEFAULT_MIN_LENGTH)]
        min_length: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show corpus statistics and frequent n-grams
    Stats {
        /// Corpus or sentence file
        input: PathBuf,

        /// Number of terms to list
        #[arg(short, long, default_value = "20")]
        top: usize,

        /// N-gram size
        #[arg(short, long, default_value = "2")]
        ngram: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Collector that produced a plain text input
#[derive(Clone, Copy, ValueEnum)]
enum SourceKind {
    /// Scraped news page
    WebNews,
    /// PDF text extraction
    PdfDocument,
    /// Dashboard snapshot
    DynamicDashboard,
}

impl From<SourceKind> for SourceType {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::WebNews => SourceType::WebNews,
            SourceKind::PdfDocument => SourceType::PdfDocument,
            SourceKind::DynamicDashboard => SourceType::DynamicDashboard,
        }
    }
}

/// Cleanup profile
#[derive(Clone, Copy, ValueEnum)]
enum ProfileMode {
    /// PDF and academic text
    Document,
    /// Scraped web and dashboard text
    Web,
}

impl From<ProfileMode> for CleanupProfile {
    fn from(mode: ProfileMode) -> Self {
        match mode {
            ProfileMode::Document => CleanupProfile::Document,
            ProfileMode::Web => CleanupProfile::Web,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(log_level(cli.verbose));

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Clean {
            input,
            output,
            source_type,
            profile,
        } => {
            let doc = storage::load_document(&input, source_type.into())?;
            let mut options = CleanupOptions::for_source(doc.source_type);
            if let Some(profile) = profile {
                options = options.with_profile(profile.into());
            }

            let clean = descreve::cleanup(&doc.content, &options);
            write_output(output.as_ref(), &clean)?;

            if let Some(path) = output {
                println!("{} Cleaned text: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Process {
            inputs,
            out_dir,
            source_type,
            archive,
            sequential,
        } => {
            run_process(
                &inputs,
                &out_dir,
                source_type.into(),
                archive.as_deref(),
                sequential,
            )?;
        }

        Commands::Compile {
            input_dir,
            output,
            keywords,
            min_length,
            json,
        } => {
            let mut options = CompileOptions::default().with_min_length(min_length);
            if let Some(path) = keywords {
                options = options.with_keywords(DomainKeywords::from_file(&path)?);
            }

            let pb = create_spinner("Compiling corpus...");
            let report = descreve::compile(&input_dir, &output, &options)?;
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
                println!(
                    "{} Corpus saved to {}",
                    "✓".green().bold(),
                    report.output.display()
                );
            }
        }

        Commands::Stats {
            input,
            top,
            ngram,
            json,
        } => {
            let text = storage::read_text(&input)?;
            let pb = create_spinner("Analyzing corpus...");
            let stats = analyze(&text, &RuleSegmenter::new(), top);
            let grams = ngrams(&tokenize(&text), ngram, top);
            pb.finish_and_clear();

            if json {
                let value = serde_json::json!({ "stats": stats, "ngrams": grams });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            println!("{}", "Corpus Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Sentences".bold(), stats.total_sentences);
            println!("{}: {}", "Tokens".bold(), stats.total_tokens_raw);
            println!("{}: {}", "Content tokens".bold(), stats.total_tokens_clean);
            println!("{}: {}", "Unique words".bold(), stats.unique_words);
            println!(
                "{}: {:.4}",
                "Lexical richness".bold(),
                stats.lexical_richness
            );

            println!("\n{}", "Top Terms".cyan().bold());
            println!("{}", "─".repeat(40));
            for term in &stats.top_terms {
                println!("  {:<30} {}", term.term, term.count);
            }

            println!("\n{}", format!("Top {}-grams", ngram).cyan().bold());
            println!("{}", "─".repeat(40));
            for gram in &grams {
                println!("  {:<30} {}", gram.term, gram.count);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn run_process(
    inputs: &[PathBuf],
    out_dir: &Path,
    source_type: SourceType,
    archive: Option<&Path>,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        println!("{} No .txt or .json inputs found", "!".yellow().bold());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    pb.set_message("Loading documents...");

    let loaded = load_documents(&files, source_type, archive, &pb);
    let load_failures = loaded.load_failures;
    let docs = loaded.docs;

    pb.set_message("Extracting sentences...");
    let mut pipeline = Pipeline::new();
    if sequential {
        pipeline = pipeline.sequential();
    }
    let report = pipeline.save_all(&docs, out_dir)?;
    pb.finish_and_clear();

    println!("{}", "Processing Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), out_dir.display());
    println!("{}: {}", "Documents".bold(), report.documents + load_failures);
    println!("{}: {}", "Sentence files".bold(), report.succeeded());
    println!("{}: {}", "Sentences".bold(), report.sentences);
    if report.empty > 0 {
        println!(
            "{}: {}",
            "Empty files".bold(),
            report.empty.to_string().yellow()
        );
    }
    if loaded.archive_failures > 0 {
        println!(
            "{}: {}",
            "Archive failures".bold(),
            loaded.archive_failures.to_string().yellow()
        );
    }
    if !report.failures.is_empty() || load_failures > 0 {
        println!(
            "{}: {}",
            "Skipped".bold(),
            (report.failures.len() + load_failures).to_string().red()
        );
        for (source, reason) in &report.failures {
            println!("  {} {}: {}", "✗".red(), source, reason);
        }
    }

    Ok(())
}

struct LoadedDocuments {
    docs: Vec<RawDocument>,
    load_failures: usize,
    archive_failures: usize,
}

/// Loads every input; a failed load or archive write skips only that file.
fn load_documents(
    files: &[PathBuf],
    source_type: SourceType,
    archive: Option<&Path>,
    pb: &ProgressBar,
) -> LoadedDocuments {
    let mut loaded = LoadedDocuments {
        docs: Vec::with_capacity(files.len()),
        load_failures: 0,
        archive_failures: 0,
    };
    for path in files {
        match storage::load_document(path, source_type) {
            Ok(doc) => {
                if let Some(dir) = archive {
                    if let Err(e) = storage::write_raw_record(dir, &doc) {
                        tracing::warn!(path = %path.display(), error = %e, "could not archive raw record");
                        loaded.archive_failures += 1;
                    }
                }
                loaded.docs.push(doc);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not load document");
                loaded.load_failures += 1;
            }
        }
        pb.inc(1);
    }
    loaded
}

/// Expands directories into their `.txt` and `.json` files, sorted by name.
fn collect_inputs(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_supported_input(path))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("json"))
}

fn print_version() {
    println!("{} {}", "descreve".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Wildfire-domain Portuguese corpus normalization and compilation");
    println!();
    println!("Sources: web news, PDF documents, dynamic dashboards");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
