// Aadhaar card fraud detection CLI.
//
// `single` and `batch` run the verification pipeline; without an external
// field-detection model wired in they degrade to basic mode, mirroring the
// library's capability handling. `authenticity` runs only the card gate,
// which needs nothing beyond the bundled OCR engine.

use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{info, warn};

use kavach::aadhaar_verifier::{AadhaarVerifier, BatchItem, BatchOutcome};
use kavach::models::{AssessmentRecord, BatchSummary, PipelineConfig};
use kavach::processing::collaborators::OcrEngine;
use kavach::processing::{assess_authenticity, Capabilities, TesseractOcr};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

#[derive(Parser)]
#[command(
    name = "kavach",
    about = "Aadhaar card fraud detection and verification",
    version
)]
struct Cli {
    /// Emit results as JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a single card image
    Single {
        image: PathBuf,
        /// Also attempt the secure-QR cross-check
        #[arg(long)]
        qr_check: bool,
    },
    /// Verify every image in a directory or ZIP archive
    Batch {
        input: PathBuf,
        /// Also attempt the secure-QR cross-check per item
        #[arg(long)]
        qr_check: bool,
        /// Process at most this many items
        #[arg(long)]
        max_items: Option<usize>,
        /// Delay between items, in milliseconds
        #[arg(long, default_value_t = 0)]
        pacing_ms: u64,
    },
    /// Run only the card-authenticity heuristic on an image
    Authenticity { image: PathBuf },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Single { image, qr_check } => {
            let config = PipelineConfig::default();
            let verifier = build_verifier(config);
            let bytes = fs::read(&image)?;
            let record = verifier.verify_bytes(&bytes, &display_name(&image), qr_check);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record);
            }
        }
        Command::Batch {
            input,
            qr_check,
            max_items,
            pacing_ms,
        } => {
            let config = PipelineConfig {
                max_batch_items: max_items,
                pacing_ms,
                ..PipelineConfig::default()
            };
            let verifier = build_verifier(config);
            let items = if input.is_dir() {
                read_directory_items(&input)?
            } else {
                read_zip_items(&input)?
            };
            info!("processing {} images from {}", items.len(), input.display());
            let outcome = verifier.verify_batch(items, qr_check);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_batch(&outcome);
            }
        }
        Command::Authenticity { image } => {
            let config = PipelineConfig::default();
            let ocr = TesseractOcr::new("eng", config.ocr_timeout_ms);
            let img = image::open(&image)?;
            let text = match ocr.full_page_text(&img) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("full-page OCR failed, judging on geometry only: {}", e);
                    None
                }
            };
            let verdict = assess_authenticity(&img, text.as_deref());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!(
                    "{} (confidence {}/100)",
                    if verdict.is_card {
                        "Accepted as an Aadhaar card"
                    } else {
                        "Rejected: does not look like an Aadhaar card"
                    },
                    verdict.confidence
                );
                println!("  Keywords found   : {}", verdict.details.keywords_found);
                println!("  ID numbers found : {}", verdict.details.id_numbers_found);
                println!("  Aspect ratio ok  : {}", verdict.details.aspect_ratio_valid);
                println!("  Size ok          : {}", verdict.details.size_valid);
            }
        }
    }
    Ok(())
}

fn build_verifier(config: PipelineConfig) -> AadhaarVerifier {
    // No field-detection model ships with the CLI; the pipeline runs in
    // basic mode until a detector implementation is wired in here.
    let caps = Capabilities {
        detector: None,
        ocr: Some(Box::new(TesseractOcr::new("eng", config.ocr_timeout_ms))),
        qr: None,
    };
    AadhaarVerifier::new(config, caps)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("input")
        .to_string()
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn read_directory_items(dir: &Path) -> Result<Vec<BatchItem>, Box<dyn Error>> {
    let mut items = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = display_name(&path);
        if !has_image_extension(&name) {
            continue;
        }
        items.push(BatchItem {
            filename: name,
            bytes: fs::read(&path)?,
        });
    }
    items.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(items)
}

fn read_zip_items(path: &Path) -> Result<Vec<BatchItem>, Box<dyn Error>> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut items = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if !has_image_extension(&name) {
            continue;
        }
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        items.push(BatchItem {
            filename: name,
            bytes,
        });
    }
    Ok(items)
}

fn print_record(record: &AssessmentRecord) {
    println!("===============================================");
    println!("  AADHAAR VERIFICATION REPORT: {}", record.filename);
    println!("===============================================");
    println!("  Assessment  : {}", record.assessment);
    println!("  Fraud score : {}", record.fraud_score);
    if let Some(error) = &record.error {
        println!("  Error       : {}", error);
    }
    if let Some(authenticity) = &record.authenticity {
        println!(
            "  Card check  : {} (confidence {}/100)",
            if authenticity.is_card { "passed" } else { "failed" },
            authenticity.confidence
        );
    }
    println!("  Extracted:");
    println!("    Name    : {}", record.extracted.name);
    println!("    DOB     : {}", record.extracted.dob);
    println!("    Gender  : {}", record.extracted.gender);
    println!("    Aadhaar : {}", record.extracted.aadhaar);
    if !record.indicators.is_empty() {
        println!("  Indicators:");
        for indicator in &record.indicators {
            println!("    - [{}] {}", indicator.severity, indicator.message);
        }
    }
}

fn print_batch(outcome: &BatchOutcome) {
    for record in &outcome.records {
        print_record(record);
    }
    print_summary(&outcome.summary);
}

fn print_summary(summary: &BatchSummary) {
    println!("===============================================");
    println!("  BATCH SUMMARY");
    println!("===============================================");
    println!("  Total processed : {}", summary.total);
    println!("  Valid           : {}", summary.valid);
    println!("  Not a card      : {}", summary.non_card);
    println!("  Errors          : {}", summary.errors);
    println!("  Success rate    : {}", summary.success_rate);
}
