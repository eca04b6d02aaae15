//! BackUP - Command-line front-end for the backup orchestrator.
//!
//! Drives the same session state machine as the GUI: paths and options given
//! on the command line become form actions, the snapshot is submitted to the
//! engine, and progress notifications are printed until the session completes.

use clap::{Parser, Subcommand};
use engine::CollisionMode;
use orchestrator::{
    logging, Action, AppState, EventBridge, EventHub, LocalEngine, Orchestrator,
    PreferenceCache, Preferences, Screen,
};
use std::path::PathBuf;
use std::time::Duration;

/// How long one wait on the event bridge may block before re-checking.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// BackUP - Back up files and folders with remembered preferences
#[derive(Parser, Debug)]
#[command(name = "backup")]
#[command(version = "0.1.0")]
#[command(about = "Back up files and directories with progress tracking")]
struct Args {
    /// Preference file (defaults to the platform configuration directory)
    #[arg(long, value_name = "FILE", global = true)]
    prefs_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Back up one or more sources into a target directory
    Run(RunArgs),

    /// Show stored preferences and path history
    Prefs,

    /// Edit the stored blacklist
    Blacklist {
        #[command(subcommand)]
        action: BlacklistCommand,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// File or directory to back up (repeatable)
    #[arg(long = "source", value_name = "PATH", required = true)]
    sources: Vec<String>,

    /// Directory receiving the backup
    #[arg(long, value_name = "PATH")]
    target: String,

    /// Extra pattern to exclude; remembered for later runs (repeatable)
    #[arg(long = "blacklist", value_name = "PATTERN")]
    blacklist: Vec<String>,

    /// Honour .gitignore files: true or false (default: stored preference)
    #[arg(long, value_name = "BOOL")]
    gitignore: Option<bool>,

    /// Copy directories under their own name: true or false (default: stored preference)
    #[arg(long, value_name = "BOOL")]
    include_source_dir: Option<bool>,

    /// Collision mode: overwrite, skip, or rename (default: stored preference)
    #[arg(long, value_name = "MODE")]
    collision: Option<String>,
}

#[derive(Subcommand, Debug)]
enum BlacklistCommand {
    /// Add a pattern
    Add { pattern: String },
    /// Remove a pattern
    Remove { pattern: String },
    /// List patterns
    List,
}

/// Prints session progress to stderr.
struct CliProgress {
    verbose: bool,
    printed_errors: usize,
}

impl CliProgress {
    fn new(verbose: bool) -> Self {
        CliProgress {
            verbose,
            printed_errors: 0,
        }
    }

    fn format_duration(elapsed: Duration) -> String {
        let secs = elapsed.as_secs();
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, mins, secs)
        } else if mins > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}s", secs)
        }
    }

    fn progress_bar(percent: u8) -> String {
        let filled = usize::from(percent.min(100) / 5);
        format!("[{}{}] {:3}%", "=".repeat(filled), " ".repeat(20 - filled), percent)
    }

    fn on_submitted(&self, state: &AppState) {
        if let Some(config) = &state.session.config {
            eprintln!("Preparing backup...");
            for source in config.source_paths() {
                eprintln!("  Source: {}", source);
            }
            eprintln!("  Target: {}", config.target_path());
            eprintln!("  Collisions: {}", config.collision_mode());
            eprintln!();
        }
    }

    fn on_update(&mut self, state: &AppState) {
        let errors = state.session.errors.entries();
        if self.verbose {
            for entry in &errors[self.printed_errors.min(errors.len())..] {
                eprintln!();
                eprintln!("  error: {}", describe_error(&entry.message, entry.file.as_deref()));
            }
        }
        self.printed_errors = errors.len();

        if state.screen != Screen::Progress {
            return;
        }

        let progress = &state.session.progress;
        eprint!(
            "\rProgress: {} | {}/{} files | {}",
            Self::progress_bar(progress.percent()),
            progress.copied_count + progress.skipped_count,
            progress.total_count,
            progress.current_file
        );
        let _ = std::io::Write::flush(&mut std::io::stderr());
    }

    fn on_complete(&self, state: &AppState) {
        eprintln!();
        let outcome = match &state.session.outcome {
            Some(outcome) => outcome,
            None => return,
        };

        eprintln!(
            "{}",
            if outcome.success { "Backup complete!" } else { "Backup failed." }
        );
        eprintln!("{}", outcome.message);
        eprintln!(
            "Summary: {} copied, {} skipped, {} errors",
            outcome.copied_count,
            outcome.skipped_count,
            state.session.errors.len()
        );

        if let Some(config) = &state.session.config {
            let elapsed: chrono::Duration = outcome.finished_at - config.submitted_at();
            let elapsed = elapsed.to_std().unwrap_or_default();
            eprintln!("Session: {}", config.id());
            eprintln!(
                "Started: {}",
                config.submitted_at().format("%Y-%m-%d %H:%M:%S")
            );
            eprintln!("Elapsed: {}", Self::format_duration(elapsed));
        }

        let errors = &state.session.errors;
        if !errors.is_empty() {
            eprintln!();
            eprintln!("Errors:");
            for entry in errors.visible() {
                eprintln!("  {}", describe_error(&entry.message, entry.file.as_deref()));
            }
            if errors.hidden_count() > 0 {
                eprintln!("  ... and {} more", errors.hidden_count());
            }
        }
    }
}

fn describe_error(message: &str, file: Option<&str>) -> String {
    match file {
        Some(file) => format!("{}: {}", file, message),
        None => message.to_string(),
    }
}

fn open_cache(prefs_file: Option<&PathBuf>) -> Result<PreferenceCache, String> {
    match prefs_file {
        Some(path) => Ok(PreferenceCache::new(path)),
        None => PreferenceCache::default_location().map_err(|e| e.to_string()),
    }
}

/// Parse and validate command-line arguments, then run the command
fn main() {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    let exit_code = match run(&args) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(args: &Args) -> Result<(), String> {
    let cache = open_cache(args.prefs_file.as_ref())?;
    tracing::debug!(path = %cache.path().display(), "preference cache");

    match &args.command {
        Command::Run(run_args) => run_backup(run_args, cache, args.verbose),
        Command::Prefs => {
            print_preferences(&cache.load_or_default());
            Ok(())
        }
        Command::Blacklist { action } => edit_blacklist(action, cache),
    }
}

/// Run one backup session - separated for testability
fn run_backup(args: &RunArgs, cache: PreferenceCache, verbose: bool) -> Result<(), String> {
    let collision = match &args.collision {
        Some(value) => Some(CollisionMode::parse(value).ok_or_else(|| {
            format!(
                "Invalid collision mode '{}'. Must be 'overwrite', 'skip', or 'rename'",
                value
            )
        })?),
        None => None,
    };

    let hub = EventHub::new();
    let bridge = EventBridge::mount(&hub);
    let mut orchestrator = Orchestrator::with_cache(LocalEngine::new(hub.clone()), cache);

    orchestrator.dispatch(Action::PickSources(args.sources.clone()));
    if !args.target.trim().is_empty() {
        orchestrator.dispatch(Action::PickTarget(args.target.clone()));
    }
    for pattern in &args.blacklist {
        orchestrator.dispatch(Action::AddBlacklistItem(pattern.clone()));
    }
    if let Some(value) = args.gitignore {
        orchestrator.dispatch(Action::SetRespectGitignore(value));
    }
    if let Some(value) = args.include_source_dir {
        orchestrator.dispatch(Action::SetIncludeSourceDir(value));
    }
    if let Some(mode) = collision {
        orchestrator.dispatch(Action::SetCollisionMode(mode));
    }

    if !orchestrator.submit() {
        return Err("At least one source and a target path are required".to_string());
    }

    let mut progress = CliProgress::new(verbose);
    progress.on_submitted(orchestrator.state());

    // No timeout: a stalled engine keeps the session in progress
    while orchestrator.screen() == Screen::Progress {
        if bridge.wait(&mut orchestrator, POLL_INTERVAL) {
            bridge.pump(&mut orchestrator);
            progress.on_update(orchestrator.state());
        }
    }

    progress.on_complete(orchestrator.state());

    match &orchestrator.state().session.outcome {
        Some(outcome) if outcome.success => Ok(()),
        Some(outcome) => Err(outcome.message.clone()),
        None => Err("Backup ended without an outcome".to_string()),
    }
}

fn edit_blacklist(action: &BlacklistCommand, cache: PreferenceCache) -> Result<(), String> {
    let hub = EventHub::new();
    let mut orchestrator = Orchestrator::with_cache(LocalEngine::new(hub), cache);

    match action {
        BlacklistCommand::Add { pattern } => {
            orchestrator.dispatch(Action::AddBlacklistItem(pattern.clone()));
        }
        BlacklistCommand::Remove { pattern } => {
            if !orchestrator.preferences().blacklist.iter().any(|p| p == pattern) {
                return Err(format!("Pattern '{}' is not in the blacklist", pattern));
            }
            orchestrator.dispatch(Action::RemoveBlacklistItem(pattern.clone()));
        }
        BlacklistCommand::List => {}
    }

    for pattern in &orchestrator.preferences().blacklist {
        println!("{}", pattern);
    }
    Ok(())
}

fn print_preferences(prefs: &Preferences) {
    println!("Respect .gitignore:   {}", prefs.respect_gitignore);
    println!("Include source dir:   {}", prefs.include_source_dir);
    println!("Collision mode:       {}", prefs.collision_mode.as_str());
    println!("Blacklist:            {}", prefs.blacklist.join(", "));
    println!("Recent sources:");
    for path in &prefs.source_history {
        println!("  {}", path);
    }
    println!("Recent targets:");
    for path in &prefs.target_history {
        println!("  {}", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_args(sources: Vec<String>, target: String) -> RunArgs {
        RunArgs {
            sources,
            target,
            blacklist: Vec::new(),
            gitignore: None,
            include_source_dir: None,
            collision: None,
        }
    }

    fn cache_in(dir: &TempDir) -> PreferenceCache {
        PreferenceCache::new(dir.path().join("prefs.json"))
    }

    #[test]
    fn test_run_with_valid_directories() {
        let src_dir = TempDir::new().expect("Failed to create temp dir");
        let dst_dir = TempDir::new().expect("Failed to create temp dir");
        let prefs_dir = TempDir::new().expect("Failed to create temp dir");

        std::fs::write(src_dir.path().join("test.txt"), "hello").expect("Failed to write file");

        let mut args = run_args(
            vec![src_dir.path().to_string_lossy().to_string()],
            dst_dir.path().to_string_lossy().to_string(),
        );
        args.include_source_dir = Some(false);

        let result = run_backup(&args, cache_in(&prefs_dir), false);
        assert!(result.is_ok(), "backup should succeed: {:?}", result);
        assert_eq!(
            std::fs::read_to_string(dst_dir.path().join("test.txt")).unwrap(),
            "hello"
        );

        let prefs = cache_in(&prefs_dir).load().unwrap().unwrap();
        assert!(!prefs.include_source_dir, "override is remembered");
        assert_eq!(prefs.target_history.len(), 1);
    }

    #[test]
    fn test_run_rejects_missing_source() {
        let dst_dir = TempDir::new().expect("Failed to create temp dir");
        let prefs_dir = TempDir::new().expect("Failed to create temp dir");

        let args = run_args(
            vec!["/nonexistent/path".to_string()],
            dst_dir.path().to_string_lossy().to_string(),
        );

        let err = run_backup(&args, cache_in(&prefs_dir), false).unwrap_err();
        assert_eq!(err, "Source path does not exist: /nonexistent/path");
    }

    #[test]
    fn test_run_rejects_blank_target() {
        let src_dir = TempDir::new().expect("Failed to create temp dir");
        let prefs_dir = TempDir::new().expect("Failed to create temp dir");

        let args = run_args(vec![src_dir.path().to_string_lossy().to_string()], "  ".to_string());

        assert!(run_backup(&args, cache_in(&prefs_dir), false).is_err());
    }

    #[test]
    fn test_run_rejects_invalid_collision_mode() {
        let src_dir = TempDir::new().expect("Failed to create temp dir");
        let dst_dir = TempDir::new().expect("Failed to create temp dir");
        let prefs_dir = TempDir::new().expect("Failed to create temp dir");

        let mut args = run_args(
            vec![src_dir.path().to_string_lossy().to_string()],
            dst_dir.path().to_string_lossy().to_string(),
        );
        args.collision = Some("ask".to_string());

        let err = run_backup(&args, cache_in(&prefs_dir), false).unwrap_err();
        assert!(err.starts_with("Invalid collision mode 'ask'"));
    }

    #[test]
    fn test_run_with_failures_is_error() {
        let src_dir = TempDir::new().expect("Failed to create temp dir");
        let dst_dir = TempDir::new().expect("Failed to create temp dir");
        let prefs_dir = TempDir::new().expect("Failed to create temp dir");

        std::fs::write(src_dir.path().join("a.txt"), "a").unwrap();
        // A directory in the way of the file copy
        std::fs::create_dir_all(dst_dir.path().join("a.txt")).unwrap();

        let mut args = run_args(
            vec![src_dir.path().to_string_lossy().to_string()],
            dst_dir.path().to_string_lossy().to_string(),
        );
        args.include_source_dir = Some(false);
        args.collision = Some("overwrite".to_string());

        let err = run_backup(&args, cache_in(&prefs_dir), false).unwrap_err();
        assert_eq!(err, "Copied 0 files with 1 errors");
    }

    #[test]
    fn test_blacklist_commands_persist() {
        let prefs_dir = TempDir::new().expect("Failed to create temp dir");

        edit_blacklist(
            &BlacklistCommand::Add {
                pattern: "*.iso".to_string(),
            },
            cache_in(&prefs_dir),
        )
        .expect("add");
        let prefs = cache_in(&prefs_dir).load().unwrap().unwrap();
        assert!(prefs.blacklist.iter().any(|p| p == "*.iso"));

        edit_blacklist(
            &BlacklistCommand::Remove {
                pattern: "*.iso".to_string(),
            },
            cache_in(&prefs_dir),
        )
        .expect("remove");
        let prefs = cache_in(&prefs_dir).load().unwrap().unwrap();
        assert!(!prefs.blacklist.iter().any(|p| p == "*.iso"));

        let err = edit_blacklist(
            &BlacklistCommand::Remove {
                pattern: "never-added".to_string(),
            },
            cache_in(&prefs_dir),
        )
        .unwrap_err();
        assert!(err.contains("never-added"));
    }

    #[test]
    fn test_parse_run_arguments() {
        let args = Args::try_parse_from([
            "backup",
            "run",
            "--source",
            "/a",
            "--source",
            "/b",
            "--target",
            "/t",
            "--gitignore",
            "false",
            "--collision",
            "rename",
        ])
        .expect("parse");

        match args.command {
            Command::Run(run) => {
                assert_eq!(run.sources, vec!["/a", "/b"]);
                assert_eq!(run.target, "/t");
                assert_eq!(run.gitignore, Some(false));
                assert_eq!(run.include_source_dir, None);
                assert_eq!(run.collision.as_deref(), Some("rename"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_run_requires_a_source() {
        assert!(Args::try_parse_from(["backup", "run", "--target", "/t"]).is_err());
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(CliProgress::progress_bar(0), format!("[{}]   0%", " ".repeat(20)));
        assert_eq!(CliProgress::progress_bar(100), format!("[{}] 100%", "=".repeat(20)));
    }
}
