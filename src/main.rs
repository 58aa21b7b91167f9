//! Capscribe command-line interface.
//!
//! Reconstructs a readable transcript from a live-caption overlay window:
//! capture on a fixed cadence, OCR changed frames, merge the overlapping
//! readings, and hand complete sentences to the clipboard.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use capscribe::capture::{CaptureLoop, PollOutcome};
use capscribe::clipboard::{copy_sentences, SystemClipboard};
use capscribe::models::{MergeParams, SessionStats, TranscriptDump};
use capscribe::ocr::TesseractOcr;
use capscribe::output::{write_json, write_json_file, write_text, write_text_file};
use capscribe::screen::{list_window_titles, WindowSource};
use capscribe::sentence::SentenceSegmenter;
use capscribe::similarity::{clean_tokens, similarity, word_edit_distance};
use capscribe::transcript::{SharedTranscript, Transcript};

#[derive(Parser)]
#[command(name = "capscribe")]
#[command(about = "Incremental transcript reconstruction from live-caption OCR")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for the merged transcript
#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpFormat {
    /// Sentences, one per line
    Text,
    /// Full snapshot: parameters, raw lines, sentences
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a caption window and build the transcript live
    ///
    /// Polls the window on a fixed cadence, re-running OCR only when the
    /// frame content actually changed. Stop with Ctrl-C.
    Run {
        /// Substring of the caption window's title (case-insensitive)
        #[arg(long, default_value = "Live Caption")]
        window: String,

        /// Polling cadence in milliseconds
        #[arg(long, default_value = "500")]
        interval_ms: u64,

        /// OCR language passed to tesseract
        #[arg(long, default_value = "eng")]
        lang: String,

        /// Explicit path to the tesseract binary
        #[arg(long)]
        tesseract: Option<PathBuf>,

        /// Anchor similarity threshold for the merge engine [default: 0.5]
        #[arg(long)]
        anchor_threshold: Option<f32>,

        /// Write the final transcript snapshot as JSON on exit
        #[arg(long)]
        output: Option<PathBuf>,

        /// Publish the last N sentences to the clipboard on exit
        #[arg(long)]
        copy_last: Option<usize>,

        /// Suppress the live status line and summary
        #[arg(long)]
        quiet: bool,
    },

    /// List capturable window titles
    Windows,

    /// Merge OCR batches from files and print the reconstructed sentences
    ///
    /// Each input file is treated as one OCR reading, applied in order.
    /// Useful for replaying a recorded session through the merge engine.
    Merge {
        /// Input files, one OCR batch per file
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: DumpFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Anchor similarity threshold [default: 0.5]
        #[arg(long)]
        anchor_threshold: Option<f32>,
    },

    /// Score two text fragments with the similarity comparator
    Similar {
        a: String,
        b: String,

        /// Classification threshold. Stricter than the merge engine's
        /// 0.5 anchor threshold: the diagnostic answers "same reading?",
        /// not "plausible continuation?".
        #[arg(long, default_value = "0.8")]
        threshold: f32,
    },

    /// Wall-clock benchmark of the similarity and merge hot paths
    Bench {
        /// Number of iterations per scenario
        #[arg(long, default_value = "10000")]
        iterations: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            window,
            interval_ms,
            lang,
            tesseract,
            anchor_threshold,
            output,
            copy_last,
            quiet,
        } => run_live(RunArgs {
            window,
            interval_ms,
            lang,
            tesseract,
            anchor_threshold,
            output,
            copy_last,
            quiet,
        }),

        Commands::Windows => {
            let titles = list_window_titles()?;
            println!("Available windows:");
            for (i, title) in titles.iter().enumerate() {
                println!("{}: {}", i + 1, title);
            }
            Ok(())
        }

        Commands::Merge {
            inputs,
            format,
            output,
            anchor_threshold,
        } => run_merge(inputs, format, output, anchor_threshold),

        Commands::Similar { a, b, threshold } => {
            run_similar(&a, &b, threshold);
            Ok(())
        }

        Commands::Bench { iterations } => {
            run_bench(iterations);
            Ok(())
        }
    }
}

struct RunArgs {
    window: String,
    interval_ms: u64,
    lang: String,
    tesseract: Option<PathBuf>,
    anchor_threshold: Option<f32>,
    output: Option<PathBuf>,
    copy_last: Option<usize>,
    quiet: bool,
}

fn run_live(args: RunArgs) -> Result<()> {
    let defaults = MergeParams::default();
    let params = MergeParams {
        anchor_threshold: args.anchor_threshold.unwrap_or(defaults.anchor_threshold),
    };

    let source = WindowSource::new(&args.window);
    let engine = TesseractOcr::locate(args.tesseract.as_deref(), &args.lang)
        .context("OCR engine unavailable")?;
    let transcript = Transcript::with_config(params, SentenceSegmenter::default()).into_shared();

    let mut capture = CaptureLoop::new(
        source,
        engine,
        Arc::clone(&transcript),
        Duration::from_millis(args.interval_ms),
    );

    let stop = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    {
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))
            .context("failed to install SIGINT handler")?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))
            .context("failed to install SIGTERM handler")?;
    }

    let spinner = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(format!("watching \"{}\"...", args.window));
        Some(pb)
    };

    let mut stats = SessionStats::default();
    let mut printed = 0usize;
    let watcher = Arc::clone(&transcript);

    capture.run_with(&stop, |outcome| {
        stats.polls += 1;
        match outcome {
            PollOutcome::NoFrame => {}
            PollOutcome::Unchanged | PollOutcome::OcrFailed => stats.frames += 1,
            PollOutcome::Merged => {
                stats.frames += 1;
                stats.merges += 1;
                printed = report_progress(&watcher, spinner.as_ref(), printed);
            }
        }
    });

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let mut guard = transcript
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let sentences = guard.all_sentences();
    let lines = guard.lines().to_vec();
    drop(guard);

    if !args.quiet {
        eprintln!(
            "Session ended: {} polls, {} frames, {} merges",
            stats.polls, stats.frames, stats.merges
        );
        eprintln!(
            "Transcript: {} lines, {} sentences",
            lines.len(),
            sentences.len()
        );
    }

    if let Some(n) = args.copy_last {
        let start = sentences.len().saturating_sub(n);
        let selected = &sentences[start..];
        copy_sentences(&mut SystemClipboard, selected)
            .context("failed to publish to the clipboard")?;
        if !args.quiet {
            eprintln!("Copied {} sentence(s) to the clipboard", selected.len());
        }
    }

    if let Some(path) = &args.output {
        let dump = TranscriptDump {
            params,
            lines,
            sentences,
        };
        write_json_file(&dump, path)?;
        if !args.quiet {
            eprintln!("Output: {}", path.display());
        }
    }

    Ok(())
}

/// Print sentences that have settled since the last report and refresh the
/// status line. A trailing unterminated sentence is still growing, so it
/// is held back.
fn report_progress(
    transcript: &SharedTranscript,
    spinner: Option<&ProgressBar>,
    printed: usize,
) -> usize {
    let mut guard = transcript
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let line_count = guard.lines().len();
    let sentences = guard.sentences();

    let mut settled = sentences.len();
    if let Some(last) = sentences.last() {
        if !last.ends_with(['.', '!', '?']) {
            settled -= 1;
        }
    }

    let from = printed.min(settled);
    for sentence in &sentences[from..settled] {
        match spinner {
            Some(pb) => pb.println(sentence),
            None => println!("{sentence}"),
        }
    }

    if let Some(pb) = spinner {
        pb.set_message(format!(
            "{} lines, {} sentences",
            line_count,
            sentences.len()
        ));
    }

    printed.max(settled)
}

fn run_merge(
    inputs: Vec<PathBuf>,
    format: DumpFormat,
    output: Option<PathBuf>,
    anchor_threshold: Option<f32>,
) -> Result<()> {
    let defaults = MergeParams::default();
    let params = MergeParams {
        anchor_threshold: anchor_threshold.unwrap_or(defaults.anchor_threshold),
    };

    let mut transcript = Transcript::with_config(params, SentenceSegmenter::default());
    for path in &inputs {
        let batch = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        transcript.add_batch(&batch);
    }

    let dump = TranscriptDump {
        params,
        lines: transcript.lines().to_vec(),
        sentences: transcript.all_sentences(),
    };

    match (format, output) {
        (DumpFormat::Text, None) => write_text(&dump.sentences, &mut io::stdout())?,
        (DumpFormat::Text, Some(path)) => write_text_file(&dump.sentences, &path)?,
        (DumpFormat::Json, None) => write_json(&dump, &mut io::stdout())?,
        (DumpFormat::Json, Some(path)) => write_json_file(&dump, &path)?,
    }

    Ok(())
}

fn run_similar(a: &str, b: &str, threshold: f32) {
    let tokens_a = clean_tokens(a);
    let tokens_b = clean_tokens(b);

    println!("Comparing words: {tokens_a:?}");
    println!("            and: {tokens_b:?}");

    match similarity(a, b) {
        None => println!("No comparable tokens on one side: not similar"),
        Some(score) => {
            let dist = word_edit_distance(&tokens_a, &tokens_b);
            let max_len = tokens_a.len().max(tokens_b.len());
            println!("Edit distance: {dist}, Max length: {max_len}");
            println!("Similarity ratio: {score:.3}");
            if score >= threshold {
                println!("similar (threshold {threshold})");
            } else {
                println!("not similar (threshold {threshold})");
            }
        }
    }
}

/// Quick wall-clock numbers for the hot paths; the criterion benches in
/// benches/ give the rigorous picture.
fn run_bench(iterations: usize) {
    use std::time::Instant;

    println!("=== Similarity / Merge Benchmark ===");
    println!("Iterations: {iterations}");

    let base = "the quick brown fox jumps over the lazy dog tonight";
    let noisy = "the quick brown fox jumped over the lazy dog tonight";
    let unrelated = "completely different caption content goes right here instead";

    for (label, a, b) in [
        ("identical", base, base),
        ("one edit", base, noisy),
        ("unrelated", base, unrelated),
    ] {
        let start = Instant::now();
        for _ in 0..iterations {
            let _ = similarity(a, b);
        }
        let elapsed = start.elapsed();
        let per_call = elapsed.as_secs_f64() / iterations as f64;
        println!("\n{label} lines:");
        println!("  Total time: {:.3}s", elapsed.as_secs_f64());
        println!("  Per comparison: {:.1}us", per_call * 1e6);
        println!("  Comparisons/sec: {:.0}", 1.0 / per_call);
    }

    // Scrolling-merge throughput: each batch re-reads the previous tail.
    let batches: Vec<String> = (0..16)
        .map(|i| {
            format!(
                "caption line number {i} keeps on scrolling by\ncaption line number {} keeps on scrolling by",
                i + 1
            )
        })
        .collect();

    let start = Instant::now();
    let mut transcript = Transcript::new();
    for i in 0..iterations {
        transcript.add_batch(&batches[i % batches.len()]);
    }
    let elapsed = start.elapsed();
    let per_batch = elapsed.as_secs_f64() / iterations as f64;
    println!("\nscrolling merge:");
    println!("  Total time: {:.3}s", elapsed.as_secs_f64());
    println!("  Per batch: {:.1}us", per_batch * 1e6);
    println!("  Batches/sec: {:.0}", 1.0 / per_batch);
    println!("  Store settled at {} lines", transcript.lines().len());
}
