use anyhow::Result;
use chrono::Utc;

use phrasedeck_lib::flashcards::CardScheduler;

use crate::app::App;
use crate::render::terminal::{format_age, paint, truncate, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    exclude: Option<&str>,
    explain: bool,
    seed: Option<u64>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let cards = app.list_cards()?;
    let exclude_id = match exclude {
        Some(id) => Some(app.find_card(id)?.id),
        None => None,
    };

    let strategy = app.settings.strategy;
    let mut scheduler = match seed {
        Some(seed) => CardScheduler::seeded(strategy, seed),
        None => CardScheduler::from_entropy(strategy),
    };

    let now = Utc::now();
    let selected = scheduler.select_next(&cards, exclude_id, now).cloned();
    let weights = if explain {
        scheduler.weights(&cards, exclude_id, now)
    } else {
        Vec::new()
    };

    match format {
        OutputFormat::Json => {
            let mut output = serde_json::json!({
                "card": selected,
            });
            if explain {
                output["weights"] = serde_json::to_value(&weights)?;
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let Some(card) = selected else {
                println!("No cards available. Add some with `phrasedeck-cli add FRONT BACK`.");
                return Ok(());
            };

            let (prompt, _) = card.sides(app.settings.direction);
            println!("{}", paint(prompt, Color::BOLD, use_color));
            println!(
                "  {} | Correct: {} | Wrong: {} | Seen: {}",
                card.id, card.correct_count, card.wrong_count, format_age(card.last_shown, now)
            );

            if explain {
                println!();
                let total: f64 = weights.iter().map(|w| w.weight).sum();
                for weighted in &weights {
                    let share = if total > 0.0 { weighted.weight / total * 100.0 } else { 0.0 };
                    let line = format!(
                        "{:>9.2} {:>5.1}%  {}",
                        weighted.weight,
                        share,
                        truncate(&weighted.card.front, 40)
                    );
                    if weighted.card.id == card.id {
                        println!("{}", paint(&line, Color::CYAN, use_color));
                    } else {
                        println!("{}", line);
                    }
                }
            }
        }
    }

    Ok(())
}
