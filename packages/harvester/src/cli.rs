//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{
    validate_archive_path, validate_output_path, ArchiveConfig, DocumentSelection,
    HarvestConfig, StripMode, SynonymOptions, UnnamedPolicy, DEFAULT_BRACKET_TERMS_FILE,
    DEFAULT_CLASSES_OUTPUT, DEFAULT_SYNONYMS_OUTPUT,
};
use crate::error::Result;
use crate::harvester::{harvest, ChemIdPlusParser, TableSummary};

/// ChemIDplus harvester - Extract synonym and classification tables from the
/// NIH ChemIDplus subset XML dump.
#[derive(Parser)]
#[command(name = "chemidplus-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write both the classes and the synonyms table.
    Extract {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Classes output file
        #[arg(long, default_value = DEFAULT_CLASSES_OUTPUT)]
        classes_output: PathBuf,

        /// Synonyms output file
        #[arg(long, default_value = DEFAULT_SYNONYMS_OUTPUT)]
        synonyms_output: PathBuf,

        #[command(flatten)]
        synonyms: SynonymArgs,
    },

    /// Write only the classes table.
    Classes {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_CLASSES_OUTPUT)]
        output: PathBuf,
    },

    /// Write only the synonyms table.
    Synonyms {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_SYNONYMS_OUTPUT)]
        output: PathBuf,

        #[command(flatten)]
        synonyms: SynonymArgs,
    },
}

/// Input archive options shared by every command.
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// ChemIDplus zip archive (e.g., chemid-20230222.zip)
    pub archive: PathBuf,

    /// Directory to unpack the archive into (default: a temporary directory)
    #[arg(long)]
    pub extract_dir: Option<PathBuf>,

    /// Use the lexicographically first XML file if the archive holds several
    #[arg(long)]
    pub first_xml: bool,

    /// Skip chemicals without a displayName instead of failing
    #[arg(long)]
    pub skip_unnamed: bool,
}

impl ArchiveArgs {
    fn to_config(&self) -> ArchiveConfig {
        ArchiveConfig {
            archive: self.archive.clone(),
            extract_dir: self.extract_dir.clone(),
            selection: if self.first_xml {
                DocumentSelection::First
            } else {
                DocumentSelection::Strict
            },
            unnamed: if self.skip_unnamed {
                UnnamedPolicy::Skip
            } else {
                UnnamedPolicy::Fail
            },
        }
    }
}

/// Synonym generation options.
#[derive(Args, Debug)]
pub struct SynonymArgs {
    /// Bracket-term list, one term per line
    #[arg(long, default_value = DEFAULT_BRACKET_TERMS_FILE)]
    pub bracket_terms: PathBuf,

    /// Do not generate synonyms by stripping bracket terms
    #[arg(long)]
    pub no_generate: bool,

    /// Strip every bracket term from synonyms, not only the last one
    #[arg(long)]
    pub strip_all_terms: bool,
}

impl SynonymArgs {
    fn to_options(&self) -> SynonymOptions {
        SynonymOptions {
            generate: !self.no_generate,
            bracket_terms: self.bracket_terms.clone(),
            strip_mode: if self.strip_all_terms {
                StripMode::Cumulative
            } else {
                StripMode::LastTermOnly
            },
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            archive,
            classes_output,
            synonyms_output,
            synonyms,
        } => extract_command(HarvestConfig {
            archive: archive.to_config(),
            synonyms: synonyms.to_options(),
            classes_output,
            synonyms_output,
        }),
        Commands::Classes { archive, output } => classes_command(&archive.to_config(), &output),
        Commands::Synonyms {
            archive,
            output,
            synonyms,
        } => synonyms_command(&archive.to_config(), &output, &synonyms.to_options()),
    }
}

/// Validate paths before touching the archive.
fn validate_paths(archive: &ArchiveConfig, outputs: &[&Path]) -> Result<()> {
    validate_archive_path(&archive.archive)?;
    for output in outputs {
        validate_output_path(output)?;
    }
    Ok(())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn announce(archive: &Path) {
    println!(
        "{} {}",
        style("Extracting").bold(),
        style(archive.display()).cyan()
    );
    println!();
}

fn print_table(label: &str, path: &Path, summary: TableSummary) {
    print!(
        "  {label}: {} rows -> {}",
        style(summary.rows).green(),
        path.display()
    );
    if summary.generated > 0 {
        print!(" ({} generated)", style(summary.generated).yellow());
    }
    println!();
}

/// Finish the spinner either way and pass the result through.
fn finish<T>(pb: &ProgressBar, result: Result<T>) -> Result<T> {
    pb.finish_and_clear();
    result
}

/// Execute the extract command.
fn extract_command(config: HarvestConfig) -> Result<()> {
    validate_paths(
        &config.archive,
        &[
            config.classes_output.as_path(),
            config.synonyms_output.as_path(),
        ],
    )?;
    announce(&config.archive.archive);

    let pb = spinner();
    pb.set_message("Unpacking archive and extracting tables...");
    let summary = finish(&pb, harvest(&config))?;

    println!("  Chemicals: {}", summary.chemicals);
    if summary.skipped > 0 {
        println!(
            "  Skipped (no displayName): {}",
            style(summary.skipped).yellow().bold()
        );
    }
    print_table("Classes", &config.classes_output, summary.classes);
    print_table("Synonyms", &config.synonyms_output, summary.synonyms);
    Ok(())
}

/// Execute the classes command.
fn classes_command(archive: &ArchiveConfig, output: &Path) -> Result<()> {
    validate_paths(archive, &[output])?;
    announce(&archive.archive);

    let pb = spinner();
    pb.set_message("Unpacking archive...");
    let parser = finish(&pb, ChemIdPlusParser::open(archive))?;

    let pb = spinner();
    pb.set_message("Extracting classes...");
    let summary = finish(&pb, parser.extract_all_classes(output))?;

    print_table("Classes", output, summary);
    Ok(())
}

/// Execute the synonyms command.
fn synonyms_command(
    archive: &ArchiveConfig,
    output: &Path,
    options: &SynonymOptions,
) -> Result<()> {
    validate_paths(archive, &[output])?;
    announce(&archive.archive);

    let pb = spinner();
    pb.set_message("Unpacking archive...");
    let parser = finish(&pb, ChemIdPlusParser::open(archive))?;

    let pb = spinner();
    pb.set_message("Extracting synonyms...");
    let summary = finish(&pb, parser.extract_all_synonyms(output, options))?;

    print_table("Synonyms", output, summary);
    Ok(())
}
