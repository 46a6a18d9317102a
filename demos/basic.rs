//! Basic example demonstrating the SambaSafety API client.
//!
//! Run with:
//! ```
//! SAMBASAFETY_API_KEY=your-key cargo run --example basic
//! ```

use sambasafety::{Driver, List, QueryParams, SambaSafety, SortDirection};

#[tokio::main]
async fn main() -> sambasafety::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating SambaSafety client...");
    let sdk = SambaSafety::from_env()?;
    println!("Connected to: {}", sdk.client().base_url());

    // First page of active drivers
    println!("\n--- Listing Active Drivers (first page) ---");
    let params = QueryParams::from([("status".to_string(), "active".to_string())]);
    let drivers = Driver::list_page(sdk.client(), &params, 1, 10).await?;
    println!(
        "Found {} drivers (total: {:?})",
        drivers.len(),
        drivers.total()
    );

    for driver in &drivers {
        println!("  - {} ({})", driver.full_name(), driver.id);
    }

    if let Some(first) = drivers.items.first() {
        println!("\n--- Driver Details ---");
        let driver = sdk.drivers().get(&first.id).await?;
        println!("Driver: {}", driver.full_name());
        println!("  ID: {}", driver.id);
        println!("  Email: {}", driver.email.as_deref().unwrap_or("none"));
        println!("  Status: {}", driver.status().unwrap_or("unknown"));

        println!("\n--- Latest MVR ---");
        match sdk.mvr().latest_by_driver(&driver.id).await? {
            Some(record) => {
                println!("  Record: {} ({})", record.id, record.status);
                println!("  State: {}", record.state);
                println!("  Violations: {}", record.violation_count());
                println!("  Accidents: {}", record.accident_count());

                for violation in record.major_violations() {
                    println!("  ! {} - {}", violation.code, violation.description);
                }
            }
            None => println!("  No MVR on file"),
        }

        if let Some(number) = driver.license_number.as_deref() {
            println!("\n--- License Validation ---");
            let licenses = sdk.license_discovery().discover_for_existing_driver(&driver.id).await?;
            for license in licenses.iter().filter(|l| l.number == number) {
                match sdk.license_discovery().validate_license(number, &license.state).await? {
                    Some(info) => println!(
                        "  {} ({}): {} class {}",
                        info.number, info.state, info.status, info.license_class
                    ),
                    None => println!("  {number} ({}): not found", license.state),
                }
            }
        }
    }

    // Query builder
    println!("\n--- Inactive Drivers ---");
    let inactive = sdk.drivers().query().where_inactive().count().await?;
    println!("Inactive drivers: {inactive}");

    let newest = sdk
        .drivers()
        .query()
        .sort_by_created_at(SortDirection::Desc)
        .first()
        .await?;
    if let Some(driver) = newest {
        println!("Newest driver: {}", driver.full_name());
    }

    println!("\nDone!");
    Ok(())
}
