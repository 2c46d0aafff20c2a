//! Pomodoro Timer CLI
//!
//! Alternates focused work sessions with short breaks, and a long break
//! after every full set of rounds:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 rounds
//!
//! Settings live in a JSON file that can be edited while the timer runs.

use std::io::{self, BufRead};
use std::thread;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use pomodoro_timer::cli::{Cli, Commands, ConfigAction, Display, RunArgs, SetArgs};
use pomodoro_timer::daemon::{
    Command, ConfigWatcher, Daemon, DaemonChannels, EditorLauncher, TimerEngine,
};
use pomodoro_timer::display::{MenuAction, Placement, TerminalDisplay};
use pomodoro_timer::paths::AppPaths;
use pomodoro_timer::sound::NotificationDispatcher;
use pomodoro_timer::store::{ConfigStore, FileSnapshotStore, SnapshotStore};
use pomodoro_timer::types::Config;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr; stdout is the display surface.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let paths = AppPaths::resolve(cli.dir.as_deref())?;
            run_timer(&paths, &args).await?;
        }
        Some(Commands::Status) => {
            let paths = AppPaths::resolve(cli.dir.as_deref())?;
            show_status(&paths);
        }
        Some(Commands::Config { action }) => {
            let paths = AppPaths::resolve(cli.dir.as_deref())?;
            run_config(&paths, action)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

// ============================================================================
// run
// ============================================================================

/// Runs the timer until `quit`, end of input, or Ctrl-C.
async fn run_timer(paths: &AppPaths, args: &RunArgs) -> Result<()> {
    let config_store = ConfigStore::new(paths.settings_file());
    let config = config_store.load_or_init();

    let (event_tx, events_rx) = mpsc::unbounded_channel();
    let (command_tx, commands_rx) = mpsc::unbounded_channel();
    let (changes_tx, changes_rx) = mpsc::unbounded_channel();
    let (display_tx, display_rx) = crossbeam_channel::unbounded();

    let snapshots: Box<dyn SnapshotStore> = Box::new(FileSnapshotStore::new(paths.state_file()));
    let notifier = Box::new(NotificationDispatcher::with_default_backends());
    let mut engine = TimerEngine::new(config.clone(), snapshots, notifier, event_tx);
    if args.restore {
        if !engine.restore() {
            debug!("No saved timer state to restore");
        }
    } else {
        engine.start_fresh();
    }

    // Live reload is optional; the timer works without it.
    let _watcher = match ConfigWatcher::spawn(config_store.path(), changes_tx) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("設定ファイルの変更は反映されません: {}", e);
            None
        }
    };

    let display = TerminalDisplay::new(
        io::stdout(),
        display_rx,
        command_tx.clone(),
        Placement {
            position: config.indicator_position,
            index: config.indicator_index,
        },
        config.show_time_always,
    );
    let display_thread = thread::Builder::new()
        .name("display".into())
        .spawn(move || display.run())
        .context("表示スレッドを起動できません")?;

    spawn_stdin_reader(command_tx.clone())?;

    let interrupt_tx = command_tx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt_tx.send(Command::Quit);
        }
    });

    let channels = DaemonChannels {
        events_rx,
        commands_rx,
        changes_rx,
        display_tx,
    };
    let daemon = Daemon::new(
        engine,
        channels,
        config_store,
        Box::new(EditorLauncher::from_env()),
    );
    let engine = daemon.run().await;
    debug!("Final state: {:?}", engine.state());

    if display_thread.join().is_err() {
        warn!("表示スレッドが異常終了しました");
    }
    Ok(())
}

/// Forwards each line typed on stdin as a command; end of input quits.
fn spawn_stdin_reader(command_tx: mpsc::UnboundedSender<Command>) -> Result<()> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match line.parse::<MenuAction>() {
                    Ok(action) => {
                        if command_tx.send(Command::from(action)).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!("{}", e),
                }
            }
            let _ = command_tx.send(Command::Quit);
        })
        .context("入力スレッドを起動できません")?;
    Ok(())
}

// ============================================================================
// status / config
// ============================================================================

fn show_status(paths: &AppPaths) {
    let config = ConfigStore::new(paths.settings_file()).load();
    let state = FileSnapshotStore::new(paths.state_file()).load();
    Display::show_status(state.as_ref(), &config);
}

fn run_config(paths: &AppPaths, action: ConfigAction) -> Result<()> {
    let store = ConfigStore::new(paths.settings_file());
    match action {
        ConfigAction::Show => Display::show_config(&store.load(), store.path()),
        ConfigAction::Path => println!("{}", store.path().display()),
        ConfigAction::Set(args) => set_config(&store, &args)?,
        ConfigAction::Reset => {
            store
                .save(&Config::default())
                .with_context(|| format!("設定を保存できません: {}", store.path().display()))?;
            Display::show_config_reset(store.path());
        }
    }
    Ok(())
}

fn set_config(store: &ConfigStore, args: &SetArgs) -> Result<()> {
    let update = args.to_update();
    if update.is_empty() {
        anyhow::bail!("変更する設定を指定してください (--help で一覧を表示)");
    }
    let config = store
        .update(&update)
        .with_context(|| format!("設定を保存できません: {}", store.path().display()))?;
    Display::show_config_saved(&config, store.path());
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
