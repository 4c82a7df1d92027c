use anyhow::Result;

use phrasedeck_lib::flashcards::SelectionStrategy;
use phrasedeck_lib::LearningDirection;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    direction: Option<LearningDirection>,
    strategy: Option<SelectionStrategy>,
    format: &OutputFormat,
) -> Result<()> {
    let mut settings = app.settings.clone();
    let changed = direction.is_some() || strategy.is_some();

    if let Some(direction) = direction {
        settings.direction = direction;
    }
    if let Some(strategy) = strategy {
        settings.strategy = strategy;
    }

    if changed {
        app.save_settings(&settings)?;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        OutputFormat::Plain => {
            let direction = match settings.direction {
                LearningDirection::FrontToBack => "front \u{2192} back",
                LearningDirection::BackToFront => "back \u{2192} front",
            };
            let strategy = match settings.strategy {
                SelectionStrategy::Weighted => "weighted random",
                SelectionStrategy::Highest => "highest weight",
            };
            println!("Direction: {}", direction);
            println!("Strategy:  {}", strategy);
            if changed {
                println!("Saved to {}", app.settings_path().display());
            }
        }
    }

    Ok(())
}
