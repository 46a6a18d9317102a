//! SambaSafety API CLI binary.
//!
//! A command-line interface for interacting with the SambaSafety API.

use clap::Parser;
use sambasafety::cli::{Cli, Command, Entity};
use sambasafety::output::PrettyPrint;
use sambasafety::{
    Collection, Driver, Fleet, MvrRecord, QueryParams, SambaSafety, DEFAULT_PAGE_SIZE,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let sdk = match SambaSafety::from_env() {
        Ok(sdk) => sdk,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set SAMBASAFETY_API_KEY environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&sdk, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(sdk: &SambaSafety, cli: Cli) -> sambasafety::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(sdk, entity, &id, cli.json).await,
        Command::List {
            entity,
            page,
            per_page,
            status,
        } => handle_list(sdk, entity, page, per_page, status, cli.json).await,
        Command::ValidateLicense { number, state } => {
            handle_validate(sdk, &number, &state, cli.json).await
        }
    }
}

async fn handle_get(sdk: &SambaSafety, entity: Entity, id: &str, json: bool) -> sambasafety::Result<()> {
    match entity {
        Entity::Driver => output_single(&sdk.drivers().get(id).await?, json),
        Entity::Fleet => output_single(&sdk.fleets().get(id).await?, json),
        Entity::Mvr => output_single(&sdk.mvr().get(id).await?, json),
    }
}

async fn handle_list(
    sdk: &SambaSafety,
    entity: Entity,
    page: Option<u32>,
    per_page: Option<u32>,
    status: Option<String>,
    json: bool,
) -> sambasafety::Result<()> {
    let mut params = QueryParams::new();
    params.insert("page".to_string(), page.unwrap_or(1).to_string());
    params.insert(
        "per_page".to_string(),
        per_page.unwrap_or(DEFAULT_PAGE_SIZE).to_string(),
    );
    if let Some(status) = status {
        params.insert("status".to_string(), status);
    }

    match entity {
        Entity::Driver => {
            let drivers = sdk.drivers().list(&params).await?;
            output_page(&drivers, json, |d| DriverRow::from(d))
        }
        Entity::Fleet => {
            let fleets = sdk.fleets().list(&params).await?;
            output_page(&fleets, json, |f| FleetRow::from(f))
        }
        Entity::Mvr => {
            let records = sdk.mvr().list(&params).await?;
            output_page(&records, json, |r| MvrRow::from(r))
        }
    }
}

async fn handle_validate(sdk: &SambaSafety, number: &str, state: &str, json: bool) -> sambasafety::Result<()> {
    match sdk.license_discovery().validate_license(number, state).await? {
        Some(license) => output_single(&license, json),
        None if json => {
            println!("null");
            Ok(())
        }
        None => {
            println!("No license found for {number} in {state}");
            Ok(())
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> sambasafety::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Collection<T>, json: bool, to_row: F) -> sambasafety::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
        return Ok(());
    }

    let rows: Vec<R> = page.items.iter().map(to_row).collect();
    println!("{}", Table::new(rows));

    let current = page.current_page().unwrap_or(1);
    match (page.total(), page.per_page()) {
        (Some(total), Some(per_page)) if per_page > 0 => {
            let total_pages = total.div_ceil(u64::from(per_page));
            println!("\nPage {}/{} ({} total items)", current, total_pages, total);
        }
        _ if page.has_next_page() => println!("\nPage {} (more available)", current),
        _ => println!("\nPage {} (end)", current),
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct DriverRow {
    id: String,
    name: String,
    email: String,
    license: String,
    status: String,
}

impl From<&Driver> for DriverRow {
    fn from(d: &Driver) -> Self {
        Self {
            id: d.id.clone(),
            name: d.full_name(),
            email: d.email.clone().unwrap_or_default(),
            license: d.license_number.clone().unwrap_or_default(),
            status: d.status().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct FleetRow {
    id: String,
    name: String,
    status: String,
}

impl From<&Fleet> for FleetRow {
    fn from(f: &Fleet) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
            status: f.status.clone(),
        }
    }
}

#[derive(Tabled)]
struct MvrRow {
    id: String,
    driver: String,
    state: String,
    status: String,
    violations: usize,
    accidents: usize,
}

impl From<&MvrRecord> for MvrRow {
    fn from(r: &MvrRecord) -> Self {
        Self {
            id: r.id.clone(),
            driver: r.driver_id.clone(),
            state: r.state.clone(),
            status: r.status.clone(),
            violations: r.violation_count(),
            accidents: r.accident_count(),
        }
    }
}
