use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tweetstats::{format_day, init_tracing_once, profile, Analysis, Mode, TweetStats};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AnalysisArg {
    Dates,
    Emojis,
    Mentions,
    All,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Memory,
    Time,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "tweetstats", version, about = "Top emojis, mentions and active dates over a JSONL post dump")]
struct Cli {
    /// Line-delimited JSON file, one post per line.
    #[arg(long = "file-path", visible_alias = "file_path", short = 'f')]
    file_path: PathBuf,

    #[arg(long, value_enum, default_value = "all")]
    analysis: AnalysisArg,

    #[arg(long, value_enum, default_value = "both")]
    mode: ModeArg,

    /// Worker threads for time mode (default: host parallelism).
    #[arg(long)]
    workers: Option<usize>,

    /// Records per chunk (default: 1000 in memory mode, 10000 in time mode).
    #[arg(long)]
    chunk_size: Option<usize>,

    #[arg(long, default_value_t = 10)]
    top: usize,

    #[arg(long)]
    progress: bool,

    /// Print results as JSON instead of lines.
    #[arg(long)]
    json: bool,
}

fn run_one(stats: &TweetStats, cli: &Cli, analysis: Analysis, mode: Mode) -> Result<()> {
    let path = &cli.file_path;
    let label = format!("{}_{}", analysis.name(), mode);

    let (result, report) = profile(&label, || -> Result<serde_json::Value> {
        let value = match analysis {
            Analysis::Dates => {
                let rows = stats.top_dates(path, mode)?;
                json!(rows.iter().map(|(d, u)| json!([format_day(*d), u])).collect::<Vec<_>>())
            }
            Analysis::Emojis => json!(stats.top_emojis(path, mode)?),
            Analysis::Mentions => json!(stats.top_mentions(path, mode)?),
        };
        Ok(value)
    });
    let value = result.with_context(|| format!("{label} over {}", path.display()))?;

    if cli.json {
        println!("{}", json!({ "analysis": analysis.name(), "mode": mode.to_string(), "top": value }));
    } else {
        println!("== {label}");
        if let Some(rows) = value.as_array() {
            for row in rows {
                println!("  {row}");
            }
        }
    }
    eprintln!("{report}");
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let mut stats = TweetStats::new().top_n(cli.top).progress(cli.progress);
    if let Some(n) = cli.workers {
        stats = stats.workers(n);
    }
    if let Some(n) = cli.chunk_size {
        stats = stats.chunk_size(n);
    }

    let analyses: &[Analysis] = match cli.analysis {
        AnalysisArg::Dates => &[Analysis::Dates],
        AnalysisArg::Emojis => &[Analysis::Emojis],
        AnalysisArg::Mentions => &[Analysis::Mentions],
        AnalysisArg::All => &Analysis::ALL,
    };
    let modes: &[Mode] = match cli.mode {
        ModeArg::Memory => &[Mode::Memory],
        ModeArg::Time => &[Mode::Time],
        ModeArg::Both => &[Mode::Memory, Mode::Time],
    };

    for &analysis in analyses {
        for &mode in modes {
            run_one(&stats, cli, analysis, mode)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing_once();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("An unexpected error occurred: {err:#}");
            ExitCode::FAILURE
        }
    }
}
