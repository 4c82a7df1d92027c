use anyhow::Result;

use phrasedeck_lib::flashcards::DeckStats;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let cards = app.list_cards()?;
    let stats = DeckStats::from_cards(&cards);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Cards:       {}", stats.total_cards);
            println!("  New:       {}", stats.new_cards);
            println!("  Known:     {}", stats.remembered_cards);
            println!("  Missed:    {}", stats.struggling_cards);
            println!("Answers:     {} correct, {} wrong", stats.total_correct, stats.total_wrong);
            match stats.accuracy {
                Some(accuracy) => println!("Accuracy:    {:.0}%", accuracy * 100.0),
                None => println!("Accuracy:    -"),
            }
        }
    }

    Ok(())
}
