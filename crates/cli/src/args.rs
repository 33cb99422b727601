//! Command-line argument surface, parsed with `clap`'s derive macros.

use clap::{Parser, Subcommand};

/// Table synchronization tool: maintain named file manifests across local,
/// SSH, and XRootD endpoints and keep their replicas in agreement.
#[derive(Debug, Parser)]
#[command(name = "tablesync", version, about)]
pub struct Cli {
    /// Increase logging verbosity; repeat for more detail (`-v`, `-vv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all but warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// One `NAME=PATH` entry, as accepted by `add-massive` and `add-from-dir`'s
/// sibling `add-massive` call.
#[derive(Clone, Debug)]
pub struct FileSpec {
    /// The table entry name.
    pub name: String,
    /// The bare filesystem path to stamp.
    pub path: String,
}

impl std::str::FromStr for FileSpec {
    type Err = crate::error::CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, path) = s
            .split_once('=')
            .ok_or_else(|| crate::error::CliError::InvalidFileSpec(s.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            path: path.to_string(),
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new, empty table.
    Create {
        /// Protocol-qualified location of the table.
        table: String,
        /// Free-form description stored with the table.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Add a single entry to a table.
    Add {
        /// Protocol-qualified location of the table.
        table: String,
        /// Entry name.
        name: String,
        /// Bare filesystem path to stamp or declare.
        path: String,
        /// Store sentinel marks instead of stamping the local file.
        #[arg(long)]
        bare: bool,
        /// Remote prefix (`user@host` or `root://host`) to qualify `path`
        /// with.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Ingest many entries in parallel.
    #[command(name = "add_massive")]
    AddMassive {
        /// Protocol-qualified location of the table.
        table: String,
        /// Repeatable `NAME=PATH` entry; may be given multiple times.
        #[arg(long = "files", value_name = "NAME=PATH")]
        files: Vec<FileSpec>,
        /// Number of parallel workers.
        #[arg(long, default_value_t = 4)]
        nproc: u32,
        /// Remote prefix to qualify every path with.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Ingest every file under a directory, keyed by file stem.
    #[command(name = "add_from_dir")]
    AddFromDir {
        /// Protocol-qualified location of the table.
        table: String,
        /// Directory to walk.
        dir: String,
        /// Number of parallel workers.
        #[arg(long, default_value_t = 4)]
        nproc: u32,
        /// Remote prefix to qualify every path with.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Remove entries matching a name or pattern.
    Remove {
        /// Protocol-qualified location of the table.
        table: String,
        /// Exact name, or regular expression if `--regex` is given.
        pattern: String,
        /// Treat `pattern` as a regular expression.
        #[arg(long)]
        regex: bool,
    },

    /// Print every entry in a table, sorted by name.
    Display {
        /// Protocol-qualified location of the table.
        table: String,
    },

    /// Reconcile a table against its registered peers.
    Update {
        /// Protocol-qualified location of the table this host reads.
        table: String,
        /// Additional peer table locations to reconcile against; `table`
        /// is registered automatically.
        #[arg(long = "register")]
        register: Vec<String>,
        /// Number of parallel workers.
        #[arg(long, default_value_t = 4)]
        nproc: u32,
    },

    /// Ingest entries into a table, then reconcile it against its peers.
    Replicate {
        /// Protocol-qualified location of the table.
        table: String,
        /// Repeatable `NAME=PATH` entry; may be given multiple times.
        #[arg(long = "files", value_name = "NAME=PATH")]
        files: Vec<FileSpec>,
        /// Additional peer table locations to reconcile against; `table`
        /// is registered automatically.
        #[arg(long = "register")]
        register: Vec<String>,
        /// Number of parallel workers.
        #[arg(long, default_value_t = 4)]
        nproc: u32,
        /// Remote prefix to qualify every ingested path with.
        #[arg(long)]
        remote: Option<String>,
    },
}
