use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use atime_backup::cli::{
    handle_folder, handle_list, handle_local_command, handle_set_command, handle_tick,
    handle_toggle, handle_watch, DestinationArg, LocalCommands, SetCommands,
};
use atime_backup::config::{settings, AutosavePaths, Settings};
use atime_backup::host::{Clock, SystemClock};
use atime_backup::logging;
use atime_backup::storage::JsonConfigStore;

#[derive(Parser)]
#[command(
    name = "atime-backup",
    version,
    about = "Timed, day-bucketed backups of a Nuke autosave script",
    long_about = "atime-backup copies a Nuke autosave file into dated .autosave folders \
                  next to the script (and optionally to a local path) every few minutes, \
                  keeping a bounded number of time-stamped copies per day."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default settings and start the checkpoint clock
    Init,

    /// Run one backup cycle now
    Tick {
        /// Autosave file to back up (overrides the configured source)
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Back up even if the interval has not elapsed
        #[arg(short, long)]
        force: bool,
    },

    /// Run backup cycles on a timer
    Watch {
        /// Autosave file to back up (overrides the configured source)
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Seconds between ticks
        #[arg(short, long, default_value = "30")]
        period_secs: u64,
        /// Stop after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,
    },

    /// Enable timed backups
    Enable,

    /// Disable timed backups
    Disable,

    /// Local destination settings
    #[command(subcommand)]
    Local(LocalCommands),

    /// Change a setting
    #[command(subcommand)]
    Set(SetCommands),

    /// Print today's backup folder for a destination
    Folder {
        #[arg(value_enum)]
        destination: DestinationArg,
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// List today's backups for a destination
    List {
        #[arg(value_enum)]
        destination: DestinationArg,
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let paths = AutosavePaths::new()?;

    match cli.command {
        Some(Commands::Init) => {
            paths.ensure_directories()?;
            let mut store = JsonConfigStore::open(paths.settings_file())?;
            settings::install(&mut store, SystemClock.now())?;
            println!("Initialized atime-backup at: {}", paths.base_dir().display());
            println!("Run 'atime-backup set source <path>' to choose the autosave file.");
        }
        Some(Commands::Tick { source, force }) => handle_tick(&paths, source, force)?,
        Some(Commands::Watch {
            source,
            period_secs,
            max_ticks,
        }) => handle_watch(&paths, source, period_secs, max_ticks)?,
        Some(Commands::Enable) => handle_toggle(&paths, true)?,
        Some(Commands::Disable) => handle_toggle(&paths, false)?,
        Some(Commands::Local(cmd)) => handle_local_command(&paths, cmd)?,
        Some(Commands::Set(cmd)) => handle_set_command(&paths, cmd)?,
        Some(Commands::Folder {
            destination,
            source,
        }) => handle_folder(&paths, destination, source)?,
        Some(Commands::List {
            destination,
            source,
        }) => handle_list(&paths, destination, source)?,
        Some(Commands::Config) => {
            let store = JsonConfigStore::open(paths.settings_file())?;
            let settings = Settings::snapshot(&store);

            println!("atime-backup Configuration");
            println!("==========================");
            println!("Settings file:  {}", paths.settings_file().display());
            println!(
                "Local root:     {}",
                settings.local_root(paths.local_fallback()).display()
            );
            println!();
            println!("Settings:");
            println!("  Enabled:          {}", settings.enabled);
            println!("  Interval:         {} minute(s)", settings.interval_minutes);
            println!("  Copies per day:   {}", settings.retention_ceiling);
            println!("  Local enabled:    {}", settings.local_enabled);
            println!(
                "  Source:           {}",
                settings
                    .autosave_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".into())
            );
            println!(
                "  Last checkpoint:  {}",
                settings.checkpoint.as_deref().unwrap_or("(not set)")
            );
        }
        None => {
            println!("atime-backup - timed backups of a Nuke autosave script");
            println!();
            println!("Run 'atime-backup --help' for usage information.");
            println!("Run 'atime-backup init' to get started.");
        }
    }

    Ok(())
}
