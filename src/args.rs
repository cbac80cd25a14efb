//! These structs provide the CLI interface for the kantong CLI.

use crate::model::{ExpenseCategory, IncomeCategory, TransactionType};
use crate::report::HistoryFormat;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// kantong: A command-line tool for tracking personal income and expenses.
///
/// Records are kept in two JSON arrays under $KANTONG_HOME/store, one for incomes and one for
/// expenses. Amounts are shown in Indonesian Rupiah.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/kantong; pass --kantong-home or set KANTONG_HOME to put it somewhere else.
    Init,
    /// Record an expense or an income.
    #[command(subcommand)]
    Add(AddSubcommand),
    /// Show income and expense totals, the balance, and the transaction history.
    Summary(SummaryArgs),
    /// Print every transaction, most recent first.
    History(HistoryArgs),
    /// Keep showing the summary, refreshing it periodically until Ctrl-C.
    Watch(WatchArgs),
    /// List the categories that can be used with `add expense` and `add income`.
    Categories,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where kantong data and configuration is held. Defaults to ~/kantong
    #[arg(long, env = "KANTONG_HOME", default_value_t = default_kantong_home())]
    kantong_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, kantong_home: PathBuf) -> Self {
        Self {
            log_level,
            kantong_home: kantong_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn kantong_home(&self) -> &DisplayPath {
        &self.kantong_home
    }
}

/// (Not shown): Subcommands of `kantong add`.
#[derive(Subcommand, Debug, Clone)]
pub enum AddSubcommand {
    /// Record an expense.
    Expense(AddExpenseArgs),
    /// Record an income.
    Income(AddIncomeArgs),
}

impl AddSubcommand {
    pub fn kind(&self) -> TransactionType {
        match self {
            AddSubcommand::Expense(_) => TransactionType::Expense,
            AddSubcommand::Income(_) => TransactionType::Income,
        }
    }

    pub fn amount(&self) -> &str {
        match self {
            AddSubcommand::Expense(args) => &args.amount,
            AddSubcommand::Income(args) => &args.amount,
        }
    }

    /// The category as it will be stored.
    pub fn category(&self) -> String {
        match self {
            AddSubcommand::Expense(args) => args.category.to_string(),
            AddSubcommand::Income(args) => args.category.to_string(),
        }
    }
}

/// (Not shown): Args for the `kantong add expense` command.
#[derive(Debug, Parser, Clone)]
pub struct AddExpenseArgs {
    /// The amount in Rupiah, e.g. 250000
    #[arg(long)]
    amount: String,

    /// The expense category. Run `kantong categories` to see them all.
    #[arg(long)]
    category: ExpenseCategory,
}

impl AddExpenseArgs {
    pub fn new(amount: impl Into<String>, category: ExpenseCategory) -> Self {
        Self {
            amount: amount.into(),
            category,
        }
    }
}

/// (Not shown): Args for the `kantong add income` command.
#[derive(Debug, Parser, Clone)]
pub struct AddIncomeArgs {
    /// The amount in Rupiah, e.g. 1000000
    #[arg(long)]
    amount: String,

    /// The income category: salary or other
    #[arg(long)]
    category: IncomeCategory,
}

impl AddIncomeArgs {
    pub fn new(amount: impl Into<String>, category: IncomeCategory) -> Self {
        Self {
            amount: amount.into(),
            category,
        }
    }
}

/// (Not shown): Args for the `kantong summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// Group the history by category, with a subtotal for each.
    #[arg(long)]
    group_by_category: bool,
}

impl SummaryArgs {
    pub fn new(group_by_category: bool) -> Self {
        Self { group_by_category }
    }

    pub fn group_by_category(&self) -> bool {
        self.group_by_category
    }
}

/// (Not shown): Args for the `kantong history` command.
#[derive(Debug, Parser, Clone)]
pub struct HistoryArgs {
    /// Output format: table, json or csv
    #[arg(long, default_value_t = HistoryFormat::Table)]
    format: HistoryFormat,
}

impl HistoryArgs {
    pub fn new(format: HistoryFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> HistoryFormat {
        self.format
    }
}

/// (Not shown): Args for the `kantong watch` command.
#[derive(Debug, Parser, Clone)]
pub struct WatchArgs {
    /// Seconds between refreshes. Defaults to `refresh_seconds` in config.json.
    #[arg(long)]
    interval: Option<u64>,

    /// Stop after this many refreshes instead of waiting for Ctrl-C.
    #[arg(long)]
    count: Option<u64>,

    /// Group the history by category, with a subtotal for each.
    #[arg(long)]
    group_by_category: bool,
}

impl WatchArgs {
    pub fn new(interval: Option<u64>, count: Option<u64>, group_by_category: bool) -> Self {
        Self {
            interval,
            count,
            group_by_category,
        }
    }

    pub fn interval(&self) -> Option<u64> {
        self.interval
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub fn group_by_category(&self) -> bool {
        self.group_by_category
    }
}

fn default_kantong_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("kantong"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --kantong-home or KANTONG_HOME instead of relying on the \
                default kantong home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("kantong")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut all = vec!["kantong", "--kantong-home", "/tmp/kantong"];
        all.extend_from_slice(args);
        Args::try_parse_from(all).unwrap()
    }

    #[test]
    fn test_add_expense() {
        let args = parse(&[
            "add",
            "expense",
            "--amount",
            "250000",
            "--category",
            "food_beverages",
        ]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.kind(), TransactionType::Expense);
        assert_eq!(add.amount(), "250000");
        assert_eq!(add.category(), "food_beverages");
    }

    #[test]
    fn test_add_income_rejects_expense_category() {
        let result = Args::try_parse_from([
            "kantong",
            "add",
            "income",
            "--amount",
            "1",
            "--category",
            "education",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["history"]);
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        assert_eq!(args.common().kantong_home().path(), Path::new("/tmp/kantong"));
        let Command::History(history) = args.command() else {
            panic!("expected history");
        };
        assert_eq!(history.format(), HistoryFormat::Table);
    }

    #[test]
    fn test_watch_args() {
        let args = parse(&["watch", "--interval", "2", "--count", "3"]);
        let Command::Watch(watch) = args.command() else {
            panic!("expected watch");
        };
        assert_eq!(watch.interval(), Some(2));
        assert_eq!(watch.count(), Some(3));
        assert!(!watch.group_by_category());
    }
}
