use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line interface definition for refpoints
/// CLI application to track work points against weekly and monthly goals
#[derive(Parser)]
#[command(
    name = "refpoints",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track work points per employee against goals, bucketed by 26-to-25 billing cycles",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Period selection shared by `list`, `progress`, `stats` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// Week number 1-5 of the cycle (the cycle of --month, --date or today)
    #[arg(long, value_name = "N")]
    pub week: Option<u32>,

    /// Billing cycle by closing month (MM/YYYY or YYYY-MM)
    #[arg(long, value_name = "MONTH")]
    pub month: Option<String>,

    /// Calendar range: YYYY, YYYY-MM, YYYY-MM-DD or START:END
    #[arg(long, value_name = "RANGE", conflicts_with_all = ["week", "month"])]
    pub range: Option<String>,

    /// Reference date (YYYY-MM-DD); selects the week containing it
    #[arg(long, value_name = "DATE", conflicts_with_all = ["month", "range"])]
    pub date: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TrendKind {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// Register a new employee
    Add {
        /// Display name
        name: String,

        /// Unique login used by every other command
        login: String,

        #[arg(long = "weekly-goal", help = "Weekly points goal (default from config)")]
        weekly_goal: Option<u32>,

        #[arg(
            long = "monthly-goal",
            help = "Explicit monthly goal (default: weekly goal x goals.monthly_weeks)"
        )]
        monthly_goal: Option<u32>,

        #[arg(long, help = "Default category for new entries")]
        category: Option<String>,
    },

    /// List employees and their goals
    List,

    /// Change an employee's goals
    Goals {
        login: String,

        #[arg(long = "weekly-goal")]
        weekly_goal: Option<u32>,

        #[arg(long = "monthly-goal")]
        monthly_goal: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, short = 'n', help = "Only the most recent N rows")]
        limit: Option<usize>,
    },

    /// Manage employees
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Record points for an employee
    Add {
        /// Employee login
        login: String,

        /// Points earned (>= 0)
        points: u32,

        #[arg(
            long = "at",
            value_name = "TIMESTAMP",
            help = "When the work was done: YYYY-MM-DD[ HH:MM[:SS]] (default: now)"
        )]
        at: Option<String>,

        #[arg(long, help = "Category / refinery (default: employee or config default)")]
        category: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long, short = 'f', help = "Allow a second entry on the same day")]
        force: bool,
    },

    /// Edit an existing entry
    Edit {
        /// Entry id (see `list`)
        id: i64,

        #[arg(long)]
        points: Option<u32>,

        #[arg(long = "at", value_name = "TIMESTAMP")]
        at: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete entries
    Del {
        /// Entry id to delete
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<i64>,

        #[arg(long, help = "Delete every entry (or every entry of --employee)")]
        all: bool,

        #[arg(long, requires = "all", help = "Restrict --all to one employee")]
        employee: Option<String>,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List entries (default: current cycle)
    List {
        #[arg(long, short = 'e', help = "Employee login")]
        employee: Option<String>,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show the cycle, week and month key of a date
    Period {
        /// Date (YYYY-MM-DD, default: today)
        date: Option<String>,
    },

    /// Show progress against goals (default: current week)
    Progress {
        #[arg(long, short = 'e', help = "Employee login")]
        employee: Option<String>,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Executive KPIs for the week containing a date
    Dashboard {
        #[arg(long, value_name = "DATE")]
        date: Option<String>,

        #[arg(long, help = "Print the KPIs as JSON")]
        json: bool,
    },

    /// Per-employee point series
    Trend {
        #[arg(long, value_enum, default_value = "weekly")]
        kind: TrendKind,

        #[arg(long, value_name = "DATE")]
        date: Option<String>,

        #[arg(long, short = 'e', help = "Employee login")]
        employee: Option<String>,

        #[arg(long, default_value_t = 5, help = "Number of cycles (monthly only)")]
        count: usize,
    },

    /// Summary statistics: per employee, category and month (default: last 12 cycles)
    Stats {
        #[arg(long, short = 'e', help = "Employee login")]
        employee: Option<String>,

        #[command(flatten)]
        period: PeriodArgs,

        #[arg(long, help = "Print the statistics as JSON")]
        json: bool,
    },

    /// Import entries from a folder of per-employee spreadsheets
    Import {
        /// Folder searched recursively for .xlsx/.xls files named after employees
        folder: String,

        #[arg(long = "create-missing", help = "Register employees not found in the database")]
        create_missing: bool,

        #[arg(long = "dry-run", help = "Read the files without storing anything")]
        dry_run: bool,
    },

    /// Export entries
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'e', help = "Employee login")]
        employee: Option<String>,

        #[command(flatten)]
        period: PeriodArgs,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
