use anyhow::{Context, Result};
use chrono::Utc;

use phrasedeck_lib::flashcards::algorithm::record_response;
use phrasedeck_lib::flashcards::CardRepository;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, card_id: &str, remembered: bool, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(card_id)?;
    let updated = record_response(&card, remembered, Utc::now());
    app.storage.save_card(&updated)
        .context("Failed to save card")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        OutputFormat::Plain => {
            let verdict = if remembered { "remembered" } else { "forgotten" };
            println!("Marked \"{}\" as {}", updated.front, verdict);
            println!("  Correct: {} | Wrong: {}", updated.correct_count, updated.wrong_count);
        }
    }

    Ok(())
}
