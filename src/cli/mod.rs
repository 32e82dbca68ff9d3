//! Command-line surface for refmap.
//!
//! Flags override `.refmap.toml`, which overrides the built-in defaults.

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::RefmapConfig;
use crate::error::RefmapError;
use crate::export::{render, DisplayPaths, ExportOptions, Orientation, OutputFormat, TreeStyle};
use crate::graph::{build_graph, normalize_extension, ScanOptions};

#[derive(Parser, Debug)]
#[command(name = "refmap", version)]
#[command(about = "Scan a repository for cross-file references and render them as a graph", long_about = None)]
pub struct Cli {
    /// Repository root directory
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format [default: ascii]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Mermaid flowchart orientation [default: LR]
    #[arg(long, value_enum)]
    pub orientation: Option<Orientation>,

    /// Group Mermaid nodes by top-level directory
    #[arg(long)]
    pub group_by_dir: bool,

    /// Tree connectors: Unicode box drawing or plain ASCII [default: tree]
    #[arg(long, value_enum)]
    pub ascii_style: Option<TreeStyle>,

    /// File extensions to scan (replaces the defaults)
    #[arg(long, num_args = 1..)]
    pub include_ext: Option<Vec<String>>,

    /// Extra directory names to skip
    #[arg(long, num_args = 1..)]
    pub exclude_dir: Option<Vec<String>>,

    /// Maximum directory depth to scan
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Show paths relative to this directory
    #[arg(long)]
    pub relative_to: Option<PathBuf>,

    /// Hide unresolved file references
    #[arg(long)]
    pub ignore_missing: bool,

    /// Hide URL references
    #[arg(long)]
    pub ignore_remote: bool,

    /// Hide references with unrendered {{ }} placeholders
    #[arg(long)]
    pub ignore_templates: bool,

    /// Include files with no connections
    #[arg(long)]
    pub show_all: bool,

    /// Config file (default: <ROOT>/.refmap.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Everything a run needs once flags and config are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub scan: ScanOptions,
    pub format: OutputFormat,
    pub export: ExportOptions,
    /// Display base; `None` means the root.
    pub base: Option<PathBuf>,
}

impl Cli {
    /// Merge flags over a loaded config.
    pub fn settings(&self, config: &RefmapConfig) -> Settings {
        let mut scan = config.scan.to_options();
        if let Some(exts) = &self.include_ext {
            scan.extensions = exts.iter().map(|e| normalize_extension(e)).collect();
        }
        if let Some(dirs) = &self.exclude_dir {
            scan.exclude_dirs.extend(dirs.iter().cloned());
        }
        if self.max_depth.is_some() {
            scan.max_depth = self.max_depth;
        }

        let out = &config.output;
        let format = self.format.or(out.format).unwrap_or_default();
        let export = ExportOptions {
            include_missing: !(self.ignore_missing || out.ignore_missing),
            include_remote: !(self.ignore_remote || out.ignore_remote),
            include_templates: !(self.ignore_templates || out.ignore_templates),
            show_all: self.show_all || out.show_all,
            tree_style: self.ascii_style.or(out.ascii_style).unwrap_or_default(),
            orientation: self.orientation.or(out.orientation).unwrap_or_default(),
            group_by_dir: self.group_by_dir || out.group_by_dir,
        };

        Settings {
            scan,
            format,
            export,
            base: self.relative_to.clone(),
        }
    }

    fn warn_unused_flags(&self, format: OutputFormat) {
        if format != OutputFormat::Mermaid {
            if self.orientation.is_some() {
                warn!("--orientation only applies to mermaid output");
            }
            if self.group_by_dir {
                warn!("--group-by-dir only applies to mermaid output");
            }
        }
        if format != OutputFormat::Ascii && self.ascii_style.is_some() {
            warn!("--ascii-style only applies to ascii output");
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Scan, render, and write the result.
pub fn run(cli: &Cli) -> Result<()> {
    if !cli.root.is_dir() {
        return Err(RefmapError::NotADirectory(cli.root.clone()).into());
    }

    let config = RefmapConfig::load_for_root(&cli.root, cli.config.as_deref())?;
    let settings = cli.settings(&config);
    debug!(?settings, "resolved settings");
    cli.warn_unused_flags(settings.format);

    let base = usable_base(settings.base.as_deref());
    let graph = build_graph(&cli.root, &settings.scan)?;
    let display = DisplayPaths::new(&cli.root, base);
    let rendered = render(&graph, &display, settings.format, &settings.export)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered)).map_err(|source| RefmapError::Output {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "wrote output");
            eprintln!("Output written to: {}", path.display());
        }
        None => emit(io::stdout().lock(), &rendered).map_err(|source| RefmapError::Output {
            path: PathBuf::from("<stdout>"),
            source,
        })?,
    }
    Ok(())
}

/// Write the rendered graph plus a trailing newline.
fn emit(mut out: impl Write, rendered: &str) -> io::Result<()> {
    writeln!(out, "{}", rendered)?;
    out.flush()
}

/// A display base that is not a directory is ignored.
fn usable_base(base: Option<&Path>) -> Option<&Path> {
    let base = base?;
    if base.is_dir() {
        Some(base)
    } else {
        warn!(base = %base.display(), "--relative-to is not a directory, using the root");
        None
    }
}
