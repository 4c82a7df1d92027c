use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::render::terminal::{format_age, outcome_mark, paint, truncate, Color};
use crate::OutputFormat;

const SIDE_WIDTH: usize = 28;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.list_readable_cards()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards yet. Add one with `phrasedeck-cli add FRONT BACK`.");
                return Ok(());
            }

            let now = Utc::now();
            let (prompt_header, answer_header) = match app.settings.direction {
                phrasedeck_lib::LearningDirection::FrontToBack => ("Front", "Back"),
                phrasedeck_lib::LearningDirection::BackToFront => ("Back", "Front"),
            };

            println!(
                "{:<8} {:<width$} {:<width$} {:>3} {:>3} {:>6}",
                "ID", prompt_header, answer_header, "\u{2713}", "\u{2717}", "Seen",
                width = SIDE_WIDTH
            );
            println!("{}", "\u{2500}".repeat(8 + 2 * (SIDE_WIDTH + 1) + 18));

            for card in &cards {
                let (prompt, answer) = card.sides(app.settings.direction);
                let short_id = card.id.to_string()[..8].to_string();
                println!(
                    "{} {:<width$} {:<width$} {:>3} {:>3} {:>6} {}",
                    paint(&short_id, Color::GRAY, use_color),
                    truncate(prompt, SIDE_WIDTH),
                    truncate(answer, SIDE_WIDTH),
                    card.correct_count,
                    card.wrong_count,
                    format_age(card.last_shown, now),
                    outcome_mark(card.remembered, use_color),
                    width = SIDE_WIDTH
                );
            }

            println!("\n{} cards total", cards.len());
        }
    }

    Ok(())
}
