//! transpdf CLI - PDF translation tool

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use transpdf::translate::shutdown_local_model;
use transpdf::{
    document_info, PageSelection, TranslateOptions, TranslationStats, TranslatorKind, Transpdf,
};

#[derive(Parser)]
#[command(name = "transpdf")]
#[command(version)]
#[command(about = "Translate PDF documents into self-contained HTML", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output HTML file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    translate: TranslateArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a PDF into an HTML file
    Translate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output HTML file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        translate: TranslateArgs,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct TranslateArgs {
    /// Source language code
    #[arg(short, long, default_value = "en")]
    source: String,

    /// Target language code
    #[arg(short, long, default_value = "it")]
    target: String,

    /// Translation provider
    #[arg(long, value_enum, default_value = "remote", env = "TRANSPDF_TRANSLATOR")]
    translator: Provider,

    /// Provider endpoint URL
    #[arg(long, env = "TRANSPDF_ENDPOINT")]
    endpoint: Option<String>,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Print run statistics as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Provider {
    /// Public web translation endpoint
    Remote,
    /// Locally hosted model server
    Local,
}

impl From<Provider> for TranslatorKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Remote => TranslatorKind::Remote,
            Provider::Local => TranslatorKind::Local,
        }
    }
}

impl TranslateArgs {
    fn to_options(&self) -> Result<TranslateOptions, Box<dyn std::error::Error>> {
        let pages = match &self.pages {
            Some(p) => PageSelection::parse(p)?,
            None => PageSelection::All,
        };

        let mut options = TranslateOptions::new()
            .with_source_lang(&self.source)
            .with_target_lang(&self.target)
            .with_translator(self.translator.into())
            .with_pages(pages);

        if let Some(endpoint) = &self.endpoint {
            options = options.with_endpoint(endpoint);
        }
        if let Some(threads) = self.threads {
            options = options.with_threads(threads);
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Translate {
            input,
            output,
            translate,
        }) => cmd_translate(&input, &output, &translate),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.input, cli.output) {
            (Some(input), Some(output)) => cmd_translate(&input, &output, &cli.translate),
            _ => {
                println!("{}", "Usage: transpdf <FILE> <OUTPUT> [-s en] [-t it]".yellow());
                println!("       transpdf --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_translate(
    input: &Path,
    output: &Path,
    args: &TranslateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' not found", input.display()).into());
    }

    let options = args.to_options()?;
    let local = options.translator == TranslatorKind::Local;

    println!(
        "{} {} ({} -> {})",
        "Translating".cyan().bold(),
        input.display(),
        options.source_lang,
        options.target_lang
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")?
            .progress_chars("#>-"),
    );

    let progress = pb.clone();
    let result = Transpdf::new()
        .with_options(options)
        .with_progress(move |done, total| {
            progress.set_length(total as u64);
            progress.set_position(done as u64);
        })
        .translate_file(input);

    if local {
        shutdown_local_model();
        log::debug!("Local translation model released");
    }

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };
    pb.finish_with_message("done");

    result.write_html(output)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(result.stats())?);
    } else {
        print_stats(result.stats());
    }
    println!("{} {}", "Saved to".green(), output.display());

    Ok(())
}

fn print_stats(stats: &TranslationStats) {
    println!();
    println!("{}", "Translation Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Links".bold(), stats.link_count);

    if stats.has_failures() {
        println!();
        println!("{}", "Degraded output".yellow().bold());
        println!("{}: {}", "Failed pages".bold(), stats.failed_pages);
        println!("{}: {}", "Failed paragraphs".bold(), stats.failed_paragraphs);
        println!("{}: {}", "Unresolved links".bold(), stats.unresolved_links);
        println!("{}: {}", "Dropped images".bold(), stats.dropped_images);
    }
    println!();
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let info = document_info(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.pdf_version);
    println!("{}: {}", "Pages".bold(), info.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if info.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref subject) = info.subject {
        println!("{}: {}", "Subject".bold(), subject);
    }
    if let Some(ref creator) = info.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = info.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = info.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "transpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF translation tool");
    println!();
    println!("License: MIT");
}
