use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, card_id: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(card_id)?;
    let reset = app.storage.reset_card(card.id)
        .context("Failed to reset card")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reset)?);
        }
        OutputFormat::Plain => {
            println!("Reset statistics for \"{}\"", reset.front);
            println!("  Was: Correct: {} | Wrong: {}", card.correct_count, card.wrong_count);
        }
    }

    Ok(())
}
