use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, front: &str, back: &str, format: &OutputFormat) -> Result<()> {
    let card = app.storage.create_card(front, back)
        .context("Failed to add card")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("Added \"{}\" \u{2192} \"{}\"", card.front, card.back);
            println!("  ID: {}", card.id);
        }
    }

    Ok(())
}
