//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the sambasafety binary.

use clap::{Parser, Subcommand, ValueEnum};

/// SambaSafety API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "sambasafety", about = "SambaSafety API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: String,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        per_page: Option<u32>,

        /// Only entities with this status.
        #[arg(long)]
        status: Option<String>,
    },

    /// Validate a driver's license with the issuing state.
    ValidateLicense {
        /// The license number.
        number: String,

        /// Two-letter state code.
        state: String,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A driver.
    #[value(alias = "drivers")]
    Driver,
    /// A fleet of drivers.
    #[value(alias = "fleets")]
    Fleet,
    /// A motor vehicle record.
    #[value(alias = "mvrs")]
    Mvr,
}

