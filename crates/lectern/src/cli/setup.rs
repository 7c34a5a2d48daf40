use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.4.2"
/// Format for dev builds: "v0.4.2\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "lectern",
    bin_name = "lectern",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Run without a command to start the control panel.\nType `help` inside it for the list of controls."
)]
#[command(about = "Project passages and notes onto a second screen", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Shared data directory (defaults to $LECTERN_DATA, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose logging to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive control panel (default)
    #[command(alias = "c", display_order = 1)]
    Control,

    /// Follow the live snapshot and render it to this terminal
    #[command(alias = "s", display_order = 2)]
    Slideshow {
        /// Poll interval in milliseconds (overrides configuration)
        #[arg(long, value_name = "MS")]
        interval: Option<u64>,
    },

    /// Print what is live right now and exit
    #[command(display_order = 3)]
    Show,

    /// Projection history
    #[command(alias = "h", display_order = 4)]
    History {
        #[command(subcommand)]
        action: Option<HistoryCommands>,
    },

    /// List or search books
    #[command(display_order = 5)]
    Books {
        /// Case-insensitive substring of a book name
        query: Option<String>,
    },

    /// Show resolved configuration
    #[command(display_order = 6)]
    Config,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List entries, newest first (default)
    #[command(alias = "ls")]
    List,

    /// Remove every entry
    Clear,

    /// Put entry N (1 = newest) back on screen
    Replay { position: usize },
}
