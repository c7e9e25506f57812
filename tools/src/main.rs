use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use evdb_tools::{
    decode_objects, encode_events, format_decode_pretty, format_elements_pretty,
    format_inspect_pretty, inspect_events, list_elements, load_config, EncodeInput,
};
use glob::Pattern;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "evdb-tools",
    version,
    about = "evdb event buffer inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk event buffer structure without a cursor config.
    Inspect {
        /// Path to an event buffer, or a directory of them.
        path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// List every element instead of summarizing events.
        #[arg(long)]
        elements: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Decode events through a configured cursor.
    Decode {
        /// Path to an event buffer, or a directory of them (one object each).
        path: PathBuf,
        /// Cursor config JSON.
        #[arg(long)]
        config: PathBuf,
        /// Optional glob filter when decoding a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Session idle threshold in seconds, overriding the config.
        #[arg(long)]
        idle: Option<u32>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Build an event buffer from a JSON description.
    Encode {
        /// JSON description of the events.
        input: PathBuf,
        /// Where to write the buffer.
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            path,
            glob,
            elements,
            format,
        } => {
            for file in collect_files(&path, glob.as_deref())? {
                let bytes = read_buffer(&file)?;
                let (json, pretty) = if elements {
                    let listing = list_elements(&bytes);
                    (
                        serde_json::to_string_pretty(&listing),
                        format_elements_pretty(&listing),
                    )
                } else {
                    let report = inspect_events(&bytes);
                    (
                        serde_json::to_string_pretty(&report),
                        format_inspect_pretty(&report),
                    )
                };
                match format {
                    OutputFormat::Json => println!("{}", json.context("serialize json")?),
                    OutputFormat::Pretty => {
                        println!("== {} ==", file.display());
                        print!("{pretty}");
                    }
                }
            }
        }
        Command::Decode {
            path,
            config,
            glob,
            idle,
            format,
        } => {
            let contents = fs::read_to_string(&config)
                .with_context(|| format!("read config {}", config.display()))?;
            let config = load_config(&contents)?;
            let files = collect_files(&path, glob.as_deref())?;
            let buffers = files
                .iter()
                .map(|file| read_buffer(file))
                .collect::<Result<Vec<_>>>()?;
            let objects: Vec<&[u8]> = buffers.iter().map(Vec::as_slice).collect();
            let outputs = decode_objects(&objects, &config, idle).context("decode")?;
            for (file, output) in files.iter().zip(&outputs) {
                info!(
                    file = %file.display(),
                    events = output.events.len(),
                    sessions = output.sessions,
                    "decoded"
                );
                match format {
                    OutputFormat::Json => {
                        let json =
                            serde_json::to_string_pretty(output).context("serialize json")?;
                        println!("{json}");
                    }
                    OutputFormat::Pretty => {
                        println!("== {} ==", file.display());
                        print!("{}", format_decode_pretty(output));
                    }
                }
            }
        }
        Command::Encode { input, output } => {
            let contents = fs::read_to_string(&input)
                .with_context(|| format!("read input {}", input.display()))?;
            let input: EncodeInput =
                serde_json::from_str(&contents).context("parse input json")?;
            let bytes = encode_events(&input)?;
            fs::write(&output, &bytes)
                .with_context(|| format!("write buffer {}", output.display()))?;
            info!(path = %output.display(), bytes = bytes.len(), "wrote event buffer");
        }
    }
    Ok(())
}

fn read_buffer(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read buffer {}", path.display()))
}

/// Expands a directory into its matching files, sorted by path.
fn collect_files(path: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("read dir {}", path.display()))? {
        let entry = entry?;
        let file = entry.path();
        if !file.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&file);
            let matches_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        files.push(file);
    }
    files.sort();
    Ok(files)
}
