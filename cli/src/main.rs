//! dossier CLI - record extraction from investigation documents

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use dossier::model::order_for_report;
use dossier::render::{self, TextSummary};
use dossier::{
    detect_format_from_path, process_batch, BatchReport, Dossier, InputFormat, JsonFormat,
    PdfParser, TaggedBlock,
};

#[derive(Parser)]
#[command(name = "dossier")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Extract structured records from reports, registry extracts and spreadsheets",
    long_about = None
)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, env = "DOSSIER_FORMAT", default_value = "json")]
    format: OutputFormat,

    /// Output compact JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Skip unreadable pages instead of failing the file
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split analytical reports into captioned blocks
    Segment {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Extract person records from migration-service extracts
    Person {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory to save photos into
        #[arg(long, value_name = "DIR")]
        photo_dir: Option<PathBuf>,
    },

    /// Extract property objects and encumbrances from registry extracts
    #[command(alias = "re")]
    RealEstate {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Read border-crossing spreadsheets
    Border {
        /// Input .xlsx files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Extract vehicle facts from a text snippet or spreadsheet
    Vehicle {
        /// Input text or .xlsx file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Extract insurer facts from a pension-fund register line
    Insurance {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Build a person record from "Label: value" lines
    Manual {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show input information
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// JSON records
    Json,
    /// Report wording
    Text,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Where and how results are written.
struct Output {
    format: OutputFormat,
    json: JsonFormat,
    path: Option<PathBuf>,
}

impl Output {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            json: if cli.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            },
            path: cli.output.clone(),
        }
    }

    /// Write either the JSON form of `value` or the given text.
    fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce() -> String) -> CliResult<()> {
        let rendered = match self.format {
            OutputFormat::Json => render::to_json(value, self.json)?,
            OutputFormat::Text => text(),
        };

        if let Some(path) = &self.path {
            fs::write(path, &rendered)?;
            println!("{} {}", "Saved to".green(), path.display());
        } else {
            println!("{}", rendered);
        }

        Ok(())
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let output = Output::from_cli(&cli);
    let mut extractor = Dossier::new();
    if cli.lenient {
        extractor = extractor.lenient();
    }

    let result = match &cli.command {
        Commands::Segment { inputs } => cmd_segment(&extractor, inputs, &output),
        Commands::Person { inputs, photo_dir } => {
            cmd_person(&extractor, inputs, photo_dir.as_deref(), &output)
        }
        Commands::RealEstate { inputs } => cmd_real_estate(&extractor, inputs, &output),
        Commands::Border { inputs } => cmd_border(inputs, &output),
        Commands::Vehicle { input } => cmd_vehicle(input, &output),
        Commands::Insurance { input } => cmd_insurance(input, &output),
        Commands::Manual { input } => cmd_manual(input, &output),
        Commands::Info { input } => cmd_info(input),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Run `process` over every input with a progress bar, then print warnings
/// for the files that failed.
fn run_batch<T, F>(inputs: &[PathBuf], mut process: F) -> BatchReport<T>
where
    F: FnMut(&Path) -> dossier::Result<T>,
{
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let report = process_batch(inputs, |path| {
        pb.set_message(dossier::batch::display_name(path));
        let result = process(path);
        pb.inc(1);
        result
    });
    pb.finish_and_clear();

    for failure in &report.failures {
        eprintln!("{} {}", "Warning:".yellow().bold(), failure);
    }
    if report.len() > 1 {
        eprintln!(
            "{} {} of {} files processed",
            "Done!".green().bold(),
            report.successes.len(),
            report.len()
        );
    }

    report
}

fn cmd_segment(extractor: &Dossier, inputs: &[PathBuf], output: &Output) -> CliResult<bool> {
    let report = run_batch(inputs, |path| extractor.segment_file(path));

    let mut blocks: Vec<TaggedBlock> = report
        .successes
        .iter()
        .flat_map(|s| TaggedBlock::tag_all(&s.file_name, &s.value))
        .collect();
    if report.successes.len() > 1 {
        order_for_report(&mut blocks);
    }

    output.emit(&blocks, || render::to_text(&blocks))?;
    Ok(!report.all_failed())
}

fn cmd_person(
    extractor: &Dossier,
    inputs: &[PathBuf],
    photo_dir: Option<&Path>,
    output: &Output,
) -> CliResult<bool> {
    let report = run_batch(inputs, |path| extractor.person_file(path));

    if let Some(dir) = photo_dir {
        fs::create_dir_all(dir)?;
        let mut used = HashSet::new();
        for success in &report.successes {
            if let Some(photo) = &success.value.photo {
                let stem = Path::new(&success.file_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| success.file_name.clone());
                let filename = photo.suggested_filename(&unique_stem(stem, &mut used));
                fs::write(dir.join(&filename), &photo.data)?;
                eprintln!("{} {}", "Extracted".green(), filename);
            }
        }
    }

    let people: Vec<_> = report.values().cloned().collect();
    output.emit(&people, || render::to_text(&people))?;
    Ok(!report.all_failed())
}

/// `stem`, or `stem_2`, `stem_3`, ... when an input from another directory
/// already claimed it.
fn unique_stem(stem: String, used: &mut HashSet<String>) -> String {
    let mut candidate = stem.clone();
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        n += 1;
        candidate = format!("{}_{}", stem, n);
    }
    candidate
}

fn cmd_real_estate(extractor: &Dossier, inputs: &[PathBuf], output: &Output) -> CliResult<bool> {
    let report = run_batch(inputs, |path| extractor.real_estate_file(path));

    let records = report.merged();
    output.emit(&records, || render::real_estate_text(&records))?;
    Ok(!report.all_failed())
}

fn cmd_border(inputs: &[PathBuf], output: &Output) -> CliResult<bool> {
    let report = run_batch(inputs, |path| dossier::extract_border_crossings_file(path));

    output.emit(&report.successes, || {
        report
            .values()
            .map(|rows| render::border_text(rows))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    })?;
    Ok(!report.all_failed())
}

fn cmd_vehicle(input: &Path, output: &Output) -> CliResult<bool> {
    let vehicle = dossier::extract_vehicle_file(input)?;
    if vehicle.is_empty() {
        eprintln!("{} no vehicle facts found", "Warning:".yellow().bold());
    }
    output.emit(&vehicle, || vehicle.to_text())?;
    Ok(true)
}

fn cmd_insurance(input: &Path, output: &Output) -> CliResult<bool> {
    let record = dossier::extract_insurance_file(input)?;
    output.emit(&record, || render::insurance_text(&record, None))?;
    Ok(true)
}

fn cmd_manual(input: &Path, output: &Output) -> CliResult<bool> {
    let person = dossier::extract_manual_person_file(input)?;
    output.emit(&person, || person.to_text())?;
    Ok(true)
}

fn cmd_info(input: &Path) -> CliResult<bool> {
    let format = detect_format_from_path(input)?;

    println!("{}", "Input Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);

    match format {
        InputFormat::Pdf { .. } => {
            let parser = PdfParser::open(input)?;
            println!("{}: {}", "Pages".bold(), parser.page_count());
            println!(
                "{}: {}",
                "Encrypted".bold(),
                if parser.is_encrypted() { "Yes" } else { "No" }
            );

            let layouts = parser.layouts()?;
            let runs: usize = layouts.iter().map(|l| l.runs.len()).sum();
            let rects: usize = layouts.iter().map(|l| l.rects.len()).sum();

            println!();
            println!("{}", "Content Statistics".cyan().bold());
            println!("{}", "─".repeat(40).dimmed());
            println!("{}: {}", "Text runs".bold(), runs);
            println!("{}: {}", "Rectangles".bold(), rects);
        }
        InputFormat::Spreadsheet => {
            let rows = dossier::extract_border_crossings_file(input);
            match rows {
                Ok(rows) => println!("{}: {}", "Border crossings".bold(), rows.len()),
                Err(e) => println!("{}: {}", "Border crossings".bold(), e.to_string().dimmed()),
            }
        }
        InputFormat::Text => {
            let text = fs::read_to_string(input)?;
            println!("{}: {}", "Lines".bold(), text.lines().count());
            println!("{}: {}", "Characters".bold(), text.chars().count());
        }
    }

    Ok(true)
}
