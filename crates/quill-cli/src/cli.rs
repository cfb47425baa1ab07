// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument parsing and command dispatch for `quill`.

use crate::render;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use quill_app_core::config::ConfigService;
use quill_app_core::config_port::PrefsPort;
use quill_app_core::prefs::AppPrefs;
use quill_config_fs::FsConfigStore;
use quill_geom::Viewport;
use quill_outline::{
    ActiveSectionTracker, BlockTree, Course, ExpandedState, FeatureAggregator, StackLayout,
    StackMetrics, TocBuilder, TrackerConfig,
};
use quill_progress::{parse_timestamps, ProgressStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Quill course-notes developer tools
#[derive(Parser, Debug)]
#[command(name = "quill", version)]
pub struct Cli {
    /// Directory holding prefs and watch progress (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a course's table of contents
    Toc {
        /// Course JSON file
        course: PathBuf,
        /// Only show entries whose title contains this text (plus their ancestors)
        #[arg(long)]
        search: Option<String>,
        /// Emit JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },
    /// Lay a course out headlessly and report the highlighted sections
    Track {
        /// Course JSON file
        course: PathBuf,
        /// Scroll offset in pixels
        #[arg(long, default_value_t = 0.0)]
        scroll: f64,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        viewport: f64,
        /// Collapse a block before layout (anchor or `:bN:` id); repeatable
        #[arg(long)]
        collapse: Vec<String>,
    },
    /// Summarise challenges and projects under feature-enabled blocks
    Features {
        /// Course JSON file
        course: PathBuf,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Parse a chapter list (`[H:]MM:SS - label` per line)
    Timestamps {
        /// Text file with one marker per line
        file: PathBuf,
        /// Playhead in seconds, to report chapter states
        #[arg(long)]
        at: Option<f64>,
        /// Video length in seconds; the last chapter ends here
        #[arg(long)]
        total: Option<f64>,
    },
    /// Inspect or edit saved watch progress
    Progress {
        /// Progress action
        #[command(subcommand)]
        command: ProgressCommand,
    },
}

/// Watch-progress actions.
#[derive(Subcommand, Debug)]
pub enum ProgressCommand {
    /// List saved positions, most recent first
    List,
    /// Show the record for a video
    Get {
        /// Video URL (any YouTube form)
        url: String,
    },
    /// Record a playback position
    Save {
        /// Video URL
        url: String,
        /// Position in seconds
        time: f64,
        /// Video length in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Video title
        #[arg(long)]
        title: Option<String>,
    },
    /// Forget one video
    Clear {
        /// Video URL
        url: String,
    },
    /// Forget every video
    ClearAll,
    /// Drop expired records (and, with --force, everything past the cap)
    Cleanup {
        /// Also enforce the record cap
        #[arg(long)]
        force: bool,
    },
}

/// Parses arguments, installs logging and runs the command against stdout.
pub fn entrypoint() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs one parsed command, writing its report to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config_dir = cli.config_dir.as_deref();
    match cli.command {
        Commands::Toc {
            course,
            search,
            json,
        } => {
            let course = load_course(&course)?;
            let toc = TocBuilder::build(&course.mount());
            let nodes = match search.as_deref() {
                Some(query) => toc.filter(query).nodes,
                None => toc.roots().to_vec(),
            };
            if json {
                serde_json::to_writer_pretty(&mut *out, &render::toc_json(&nodes))?;
                writeln!(out)?;
            } else {
                if let Some(title) = &course.title {
                    writeln!(out, "{title}")?;
                }
                for line in render::toc_lines(&nodes) {
                    writeln!(out, "{line}")?;
                }
            }
        }
        Commands::Track {
            course,
            scroll,
            viewport,
            collapse,
        } => {
            if !(viewport.is_finite() && viewport > 0.0) {
                bail!("viewport height must be positive, got {viewport}");
            }
            let prefs = load_prefs(config_dir);
            let tree = load_course(&course)?.mount();
            let toc = TocBuilder::build(&tree);
            let expanded = collapsed_state(&tree, &collapse)?;
            let mut layout = StackLayout::measure(&tree, Some(&expanded), StackMetrics::default());
            layout.set_scroll(scroll);
            let tracker = ActiveSectionTracker::new(TrackerConfig::from(&prefs.tracker));
            let active = tracker.compute(Viewport::new(viewport), &tree, &toc, &layout);
            for line in render::active_lines(&tree, &active) {
                writeln!(out, "{line}")?;
            }
            writeln!(out, "progress: {:.0}%", layout.reading_progress(viewport))?;
        }
        Commands::Features { course, json } => {
            let course = load_course(&course)?;
            let summaries = FeatureAggregator::summaries(&course.blocks);
            if json {
                serde_json::to_writer_pretty(&mut *out, &render::features_json(&summaries))?;
                writeln!(out)?;
            } else if summaries.is_empty() {
                writeln!(out, "no feature-enabled blocks")?;
            } else {
                writeln!(out, "{}", render::features_table(&summaries))?;
            }
        }
        Commands::Timestamps { file, at, total } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let stamps = parse_timestamps(&text);
            if stamps.is_empty() {
                bail!("no timestamps found in {}", file.display());
            }
            writeln!(out, "{}", render::timestamps_table(&stamps, at, total))?;
        }
        Commands::Progress { command } => {
            let prefs = load_prefs(config_dir);
            let store = open_store(config_dir)?;
            let mut progress = ProgressStore::open(store, prefs.progress);
            run_progress(command, &mut progress, out)?;
            if progress.is_degraded() {
                bail!("watch progress could not be written; changes were kept in memory only");
            }
        }
    }
    Ok(())
}

fn run_progress(
    command: ProgressCommand,
    progress: &mut ProgressStore<FsConfigStore>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ProgressCommand::List => {
            let records = progress.records();
            if records.is_empty() {
                writeln!(out, "no saved progress")?;
            } else {
                writeln!(out, "{}", render::progress_table(&records))?;
            }
        }
        ProgressCommand::Get { url } => {
            let Some(record) = progress.get(&url) else {
                bail!("no saved progress for {url}");
            };
            serde_json::to_writer_pretty(&mut *out, record)?;
            writeln!(out)?;
        }
        ProgressCommand::Save {
            url,
            time,
            duration,
            title,
        } => {
            let outcome = progress.save(&url, time, duration, title.as_deref());
            writeln!(out, "{}", render::outcome_label(outcome))?;
        }
        ProgressCommand::Clear { url } => {
            if progress.clear(&url) {
                writeln!(out, "cleared")?;
            } else {
                writeln!(out, "nothing saved for {url}")?;
            }
        }
        ProgressCommand::ClearAll => {
            let n = progress.len();
            progress.clear_all();
            writeln!(out, "cleared {n} records")?;
        }
        ProgressCommand::Cleanup { force } => {
            let removed = progress.cleanup(force);
            writeln!(out, "removed {removed}, kept {}", progress.len())?;
        }
    }
    Ok(())
}

fn load_course(path: &Path) -> Result<Course> {
    Course::load(path).with_context(|| format!("failed to load course {}", path.display()))
}

fn open_store(dir: Option<&Path>) -> Result<FsConfigStore> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    store.context("failed to open config store")
}

/// Saved prefs, or defaults when the store is unavailable or holds none.
fn load_prefs(dir: Option<&Path>) -> AppPrefs {
    match open_store(dir) {
        Ok(store) => ConfigService::new(store).load_prefs().unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %err, "using default prefs");
            AppPrefs::default()
        }
    }
}

fn collapsed_state(tree: &BlockTree, collapse: &[String]) -> Result<ExpandedState> {
    let mut expanded = ExpandedState::new();
    for id in tree.document_order() {
        expanded.register(id);
    }
    for key in collapse {
        let Some(id) = tree.resolve(key) else {
            bail!("no block matches {key:?}");
        };
        if expanded.is_expanded(id) {
            expanded.toggle(id);
        }
    }
    Ok(expanded)
}
