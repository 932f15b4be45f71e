//! vocalize - Convert long-form text into an audiobook using speech synthesis

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tts_client::{ApiCredential, OpenAiSpeech, QualityTier, Voice};
use vocalize::config::VocalizeConfig;
use vocalize::convert::{CancelToken, ChunkState, ConversionSettings, Orchestrator};
use vocalize::{estimate, export, text};

#[derive(Parser, Debug)]
#[command(name = "vocalize")]
#[command(about = "Convert long-form text into an audiobook using speech synthesis", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the input text file
    input: Option<PathBuf>,

    /// Output directory for audio chunks (default: audiobook_output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Voice to use (alloy, echo, fable, onyx, nova, shimmer)
    #[arg(long)]
    voice: Option<String>,

    /// Quality tier (standard, high)
    #[arg(long)]
    quality: Option<String>,

    /// API key (default: OPENAI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum characters per synthesis request
    #[arg(long)]
    max_chunk_chars: Option<usize>,

    /// Title used for the playlist and combined output
    #[arg(long)]
    title: Option<String>,

    /// Skip writing the combined single-file audiobook
    #[arg(long)]
    no_combine: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show character, chunk, cost, and duration estimates without converting
    Estimate {
        /// Path to the input text file
        input: PathBuf,
    },
    /// Clean and normalize a text file ahead of conversion
    Prepare {
        /// Path to the input text file
        input: PathBuf,

        /// Where to write the cleaned text (default: <input>_clean.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice
    SetVoice {
        /// Voice name (alloy, echo, fable, onyx, nova, shimmer)
        voice: String,
    },
    /// Set default quality tier
    SetQuality {
        /// Tier name (standard, high)
        quality: String,
    },
    /// Set maximum characters per synthesis request
    SetMaxChunkChars {
        /// Value (e.g. 4096)
        value: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // Handle subcommands
    match &args.command {
        Some(Commands::Estimate { input }) => {
            return handle_estimate(input);
        }
        Some(Commands::Prepare { input, output }) => {
            return handle_prepare(input, output.as_deref());
        }
        Some(Commands::Config { action }) => {
            return handle_config_command(action);
        }
        None => {}
    }

    // Require an input file for conversion
    let input_path = args.input.clone().ok_or_else(|| {
        anyhow::anyhow!("Input file path is required. Run 'vocalize --help' for usage.")
    })?;

    if !input_path.exists() {
        anyhow::bail!("Input file not found: {}", input_path.display());
    }

    // Load configuration, then apply CLI overrides
    let config = VocalizeConfig::load().context("Failed to load configuration")?;

    let voice: Voice = match &args.voice {
        Some(name) => name.parse()?,
        None => config.voice,
    };
    let quality: QualityTier = match &args.quality {
        Some(name) => name.parse()?,
        None => config.quality,
    };
    let max_chunk_chars = args.max_chunk_chars.unwrap_or(config.max_chunk_chars);

    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .unwrap_or_default();
    let credential = ApiCredential::new(api_key);
    if credential.is_empty() {
        anyhow::bail!("No API key provided. Pass --api-key or set OPENAI_API_KEY.");
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("audiobook_output"));
    let title = args.title.clone().unwrap_or_else(|| {
        input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audiobook".to_string())
    });

    let source_text =
        fs::read_to_string(&input_path).context("Failed to read input file")?;

    if args.debug {
        eprintln!("Input: {}", input_path.display());
        eprintln!("Output dir: {}", output_dir.display());
        eprintln!("Voice: {}", voice);
        eprintln!("Quality: {}", quality);
        eprintln!("Max chunk chars: {}", max_chunk_chars);
    }

    // Show what the run will roughly cost before committing to it
    let chars = estimate::char_count(&source_text);
    let cost = estimate::estimate_cost(&source_text, quality, &config.rates());
    let duration_secs =
        estimate::estimate_duration_secs(&source_text, max_chunk_chars, config.seconds_per_chunk);
    eprintln!("Characters: {}", chars);
    eprintln!("Estimated cost: ${:.2}", cost);
    eprintln!("Estimated time: ~{} min", duration_secs.div_ceil(60));

    eprintln!("Splitting text into chunks...");
    let chunks = text::split_text(&source_text, max_chunk_chars);
    eprintln!("Total chunks: {}", chunks.len());

    if chunks.is_empty() {
        anyhow::bail!("Input file contains no text to convert");
    }

    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let settings = ConversionSettings {
        voice,
        quality,
        credential,
    };
    let backend = OpenAiSpeech::new();

    // Ctrl-C stops scheduling new chunks; the one in flight finishes
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nCancellation requested, finishing current chunk...");
                cancel.cancel();
            }
        });
    }

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let orchestrator = Orchestrator::new(&backend, output_dir.clone())
        .with_request_gap(Duration::from_millis(config.request_gap_ms));

    let ledger = orchestrator
        .run(&chunks, &settings, &cancel, |chunk| match chunk.state {
            ChunkState::InProgress => {
                pb.set_message(format!("chunk {}", chunk.sequence));
            }
            ChunkState::Completed | ChunkState::Failed => {
                pb.inc(1);
            }
            _ => {}
        })
        .await?;

    if ledger.cancelled {
        pb.abandon_with_message("Cancelled");
    } else {
        pb.finish_with_message("Conversion complete");
    }

    // Persist the ledger and exports
    export::write_manifest(&ledger, &output_dir)?;

    if ledger.completed_count() > 0 {
        let playlist_path = export::write_playlist(&ledger, &output_dir, &title)?;
        eprintln!("Playlist: {}", playlist_path.display());

        if !args.no_combine {
            let combined_path = output_dir.join(format!("{}.mp3", title));
            export::combine_audio(&ledger, &combined_path)?;
            let size_mb = fs::metadata(&combined_path)?.len() as f64 / (1024.0 * 1024.0);
            eprintln!("Combined: {} ({:.1} MB)", combined_path.display(), size_mb);
        }
    }

    eprintln!(
        "\nCompleted: {}, Failed: {}",
        ledger.completed_count(),
        ledger.failed_count()
    );
    if ledger.cancelled {
        eprintln!("Run cancelled before all chunks were submitted");
    }

    Ok(())
}

/// Print conversion estimates for a text file without converting it.
fn handle_estimate(input: &Path) -> Result<()> {
    let config = VocalizeConfig::load().context("Failed to load configuration")?;
    let text = fs::read_to_string(input).context("Failed to read input file")?;

    let chars = estimate::char_count(&text);
    let rates = config.rates();
    let predicted = estimate::predicted_chunk_count(&text, config.max_chunk_chars);
    let actual = text::split_text(&text, config.max_chunk_chars).len();
    let duration_secs =
        estimate::estimate_duration_secs(&text, config.max_chunk_chars, config.seconds_per_chunk);

    println!("Characters: {}", chars);
    println!("Predicted chunks (length / limit): {}", predicted);
    println!("Actual chunks (boundary-respecting): {}", actual);
    println!(
        "Estimated cost ({}): ${:.2}",
        QualityTier::Standard.label(),
        estimate::estimate_cost(&text, QualityTier::Standard, &rates)
    );
    println!(
        "Estimated cost ({}): ${:.2}",
        QualityTier::High.label(),
        estimate::estimate_cost(&text, QualityTier::High, &rates)
    );
    println!("Estimated time: ~{} min", duration_secs.div_ceil(60));

    Ok(())
}

/// Clean a text file and write the result for later conversion.
fn handle_prepare(input: &Path, output: Option<&Path>) -> Result<()> {
    let config = VocalizeConfig::load().context("Failed to load configuration")?;
    let text = fs::read_to_string(input).context("Failed to read input file")?;
    let cleaned = text::cleaner::prepare_text(&text);

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let stem = input.file_stem().unwrap_or_default();
            input.with_file_name(format!("{}_clean.txt", stem.to_string_lossy()))
        }
    };

    fs::write(&output_path, &cleaned).context("Failed to write cleaned text")?;

    println!("Cleaned text saved to: {}", output_path.display());
    println!("Character count: {}", estimate::char_count(&cleaned));
    println!(
        "Estimated cost ({}): ${:.2}",
        QualityTier::High.label(),
        estimate::estimate_cost(&cleaned, QualityTier::High, &config.rates())
    );

    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = VocalizeConfig::load()?;
            println!("Configuration file: {:?}", VocalizeConfig::config_path()?);
            println!();
            println!("voice = \"{}\"", config.voice);
            println!("quality = \"{}\"", config.quality);
            println!("max_chunk_chars = {}", config.max_chunk_chars);
            println!("seconds_per_chunk = {}", config.seconds_per_chunk);
            println!("standard_rate_per_1k = {}", config.standard_rate_per_1k);
            println!("high_rate_per_1k = {}", config.high_rate_per_1k);
            println!("request_gap_ms = {}", config.request_gap_ms);
        }
        ConfigAction::SetVoice { voice } => {
            let parsed: Voice = voice.parse()?;
            let mut config = VocalizeConfig::load()?;
            config.voice = parsed;
            config.save()?;
            println!("Default voice set to: {}", parsed.label());
        }
        ConfigAction::SetQuality { quality } => {
            let parsed: QualityTier = quality.parse()?;
            let mut config = VocalizeConfig::load()?;
            config.quality = parsed;
            config.save()?;
            println!("Default quality set to: {}", parsed.label());
        }
        ConfigAction::SetMaxChunkChars { value } => {
            if *value == 0 {
                anyhow::bail!("max_chunk_chars must be positive");
            }
            let mut config = VocalizeConfig::load()?;
            config.max_chunk_chars = *value;
            config.save()?;
            println!("Max chunk chars set to: {}", config.max_chunk_chars);
        }
    }
    Ok(())
}
