use anyhow::{Context, Result};
use chrono::NaiveDate;
use powderlines::Client;

fn main() -> Result<()> {
    let client = Client::from_env()?;

    // Last two days of readings for Stevens Pass.
    let recent = client.station_observations("791:WA:SNTL", 2)?;
    println!("{recent}");

    // A fixed window from the archive.
    let start = NaiveDate::from_ymd_opt(2013, 1, 19).context("valid start date")?;
    let end = NaiveDate::from_ymd_opt(2013, 1, 20).context("valid end date")?;
    let window = client.station_observations_range("1125:AZ:SNTL", start, end)?;
    println!("{window}");
    Ok(())
}
