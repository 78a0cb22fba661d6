use anyhow::Result;
use powderlines::Client;

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Point POWDERLINES_URL at a different endpoint if needed.
    let client = Client::from_env()?;

    let nearby = client.closest_stations(47, -121, 3)?;
    println!("{nearby}");
    Ok(())
}
