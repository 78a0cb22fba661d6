use anyhow::Result;
use powderlines::Client;

fn main() -> Result<()> {
    let client = Client::from_env()?;

    let stations = client.stations_by_region("AZ")?;
    println!("{stations}");

    // Inventory-wide elevation summary, one CSV row per state.
    let stats = client.region_summary_stats()?;
    stats.write_csv(std::io::stdout())?;
    Ok(())
}
