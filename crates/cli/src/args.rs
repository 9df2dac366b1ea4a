//! Command-line surface of the `carlot` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use carlot_inventory::{CarDraft, CarField};
use carlot_observability::LogFormat;

use crate::panel::Panel;

/// Car dealership inventory and sales records.
#[derive(Parser, Debug)]
#[command(name = "carlot")]
#[command(about = "Car dealership inventory and sales records")]
pub struct Args {
    /// Directory holding cars.jsonl and sales.jsonl (default: $CARLOT_DATA_DIR or the working directory)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log format: pretty or json (default: $CARLOT_LOG_FORMAT or pretty)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Customer panel: browse, search and buy cars
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Admin panel: maintain the inventory and review sales
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Interactive menu-driven session
    Shell {
        /// Panel to start in
        #[arg(long, value_enum, default_value_t = Panel::Customer)]
        panel: Panel,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// List every car
    List,

    /// Search by a column, or sort by it when no query is given
    Search {
        /// Brand, Model, Year, Cost or Shade
        criterion: CarField,

        /// Case-insensitive text to look for
        #[arg(default_value = "")]
        query: String,
    },

    /// Buy the car at a listed position
    Buy {
        /// Position shown in the `#` column
        position: usize,

        #[arg(long)]
        customer: String,

        #[arg(long)]
        salesperson: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List every car
    List,

    /// Show one car's fields
    Show {
        position: usize,
    },

    /// Add a car to the end of the inventory
    Add(CarArgs),

    /// Replace the car at a position
    Update {
        position: usize,

        #[command(flatten)]
        car: CarArgs,
    },

    /// Remove the car at a position
    Delete {
        position: usize,
    },

    /// Show the sales history
    Sales,
}

/// The six car fields.
#[derive(clap::Args, Debug, Clone)]
pub struct CarArgs {
    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub year: String,

    #[arg(long)]
    pub cost: String,

    #[arg(long)]
    pub shade: String,

    /// Available or Sold (add: Available; update: the car's current status)
    #[arg(long)]
    pub status: Option<String>,
}

impl CarArgs {
    /// Draft from the flags, using `fallback_status` when `--status` is absent.
    pub fn into_draft(self, fallback_status: &str) -> CarDraft {
        CarDraft {
            brand: self.brand,
            model: self.model,
            year: self.year,
            cost: self.cost,
            shade: self.shade,
            status: self.status.unwrap_or_else(|| fallback_status.to_string()),
        }
    }
}
