use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::Utc;

use phrasedeck_lib::flashcards::{CardScheduler, ReviewSession};

use crate::app::App;
use crate::render::terminal::{paint, Color};

enum Reply {
    Remembered,
    Forgot,
    Skip,
    Quit,
}

fn parse_reply(line: &str) -> Option<Reply> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" | "+" => Some(Reply::Remembered),
        "n" | "no" | "-" => Some(Reply::Forgot),
        "s" | "skip" => Some(Reply::Skip),
        "q" | "quit" => Some(Reply::Quit),
        _ => None,
    }
}

/// Read one line; `None` on end of input
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(if read == 0 { None } else { Some(line) })
}

pub fn run(app: &App, use_color: bool) -> Result<()> {
    let scheduler = CardScheduler::from_entropy(app.settings.strategy);
    let mut session = ReviewSession::new(&app.storage, scheduler);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    'cards: loop {
        let card = match session.next_card(Utc::now()).context("Failed to pick next card")? {
            Some(card) => card.clone(),
            None => {
                println!("No cards available. Add some with `phrasedeck-cli add FRONT BACK`.");
                break;
            }
        };

        let (prompt, answer) = card.sides(app.settings.direction);
        println!();
        println!("{}", paint(prompt, Color::BOLD, use_color));
        print!("{}", paint("[Enter] to reveal, q to quit ", Color::DIM, use_color));
        stdout.flush()?;

        match read_line(&mut input)? {
            None => break,
            Some(line) if matches!(parse_reply(&line), Some(Reply::Quit)) => break,
            Some(_) => {}
        }

        println!("{}", paint(answer, Color::CYAN, use_color));

        loop {
            print!("{}", paint("Remembered? [y]es / [n]o / [s]kip / [q]uit ", Color::DIM, use_color));
            stdout.flush()?;

            let Some(line) = read_line(&mut input)? else {
                break 'cards;
            };

            match parse_reply(&line) {
                Some(Reply::Remembered) => {
                    session.answer(true, Utc::now()).context("Failed to save card")?;
                    println!("{}", paint("\u{2713}", Color::GREEN, use_color));
                    break;
                }
                Some(Reply::Forgot) => {
                    session.answer(false, Utc::now()).context("Failed to save card")?;
                    println!("{}", paint("\u{2717}", Color::RED, use_color));
                    break;
                }
                Some(Reply::Skip) => {
                    session.skip();
                    break;
                }
                Some(Reply::Quit) => break 'cards,
                None => continue,
            }
        }
    }

    let stats = session.stats();
    println!();
    println!(
        "Session: {} {} | {} {}",
        paint("\u{2713}", Color::GREEN, use_color),
        stats.correct,
        paint("\u{2717}", Color::RED, use_color),
        stats.wrong
    );

    Ok(())
}
