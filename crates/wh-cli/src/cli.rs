//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::create::CreateArgs;
use crate::commands::delete::DeleteArgs;
use crate::commands::list::ListArgs;
use crate::commands::start::StartArgs;
use crate::commands::stop::StopArgs;
use crate::commands::summary::SummaryArgs;
use crate::commands::update::UpdateArgs;

/// Log work time in a calendar and compare it with the hours you owe.
///
/// Every event in the calendar is a block of time labelled by its summary
/// (WORK, VACATION, ...). Summaries report the running deviation from the
/// expected hours configured per weekday.
#[derive(Debug, Parser)]
#[command(name = "wh", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Which calendar to work with.
    #[arg(short, long, global = true)]
    pub calendar: Option<String>,

    /// Answer yes to every confirmation.
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Use a local JSON events file instead of Google Calendar.
    #[arg(long, global = true)]
    pub events_file: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a finished event.
    Create(CreateArgs),

    /// Start an ongoing event, offering to stop the current one.
    Start(StartArgs),

    /// Stop the ongoing event.
    Stop(StopArgs),

    /// Change fields of an event.
    Update(UpdateArgs),

    /// Delete events by id.
    Delete(DeleteArgs),

    /// List events in a date range.
    List(ListArgs),

    /// Report deviation from the expected hours.
    Summary(SummaryArgs),

    /// Show today's worked time.
    Today,
}

impl Commands {
    /// Commands that change the calendar, after which today's total is shown.
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Create(_) | Self::Start(_) | Self::Stop(_) | Self::Update(_) | Self::Delete(_)
        )
    }
}
