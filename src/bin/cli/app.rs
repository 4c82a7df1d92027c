use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use phrasedeck_lib::flashcards::{Card, FlashcardStorage};
use phrasedeck_lib::Settings;

/// Shared application state for CLI commands
pub struct App {
    pub storage: FlashcardStorage,
    pub settings: Settings,
    settings_path: PathBuf,
}

impl App {
    /// Initialize from the given data directory, or the default one
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FlashcardStorage::default_data_dir()
                .context("Failed to get data directory")?,
        };

        let storage = FlashcardStorage::new(data_dir.clone());
        storage.init().context("Failed to initialize card storage")?;

        let settings_path = Settings::path_in(&data_dir);
        let settings = Settings::load(&settings_path)
            .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

        log::debug!("Using data directory {:?}", data_dir);

        Ok(Self {
            storage,
            settings,
            settings_path,
        })
    }

    /// List all cards, newest first
    pub fn list_cards(&self) -> Result<Vec<Card>> {
        self.storage.list_cards().context("Failed to list cards")
    }

    /// List cards, leaving out files that cannot be read
    pub fn list_readable_cards(&self) -> Result<Vec<Card>> {
        self.storage.list_readable_cards().context("Failed to list cards")
    }

    /// Find a card by ID or unique ID prefix
    pub fn find_card(&self, id: &str) -> Result<Card> {
        let cards = self.list_readable_cards()?;
        let id_lower = id.trim().to_lowercase();
        if id_lower.is_empty() {
            bail!("Card ID must not be empty");
        }

        let matches: Vec<&Card> = cards
            .iter()
            .filter(|c| c.id.to_string().starts_with(&id_lower))
            .collect();

        match matches.len() {
            0 => bail!("No card matching '{}'", id),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous card ID '{}'. Matches:\n{}", id,
                matches.iter().map(|c| format!("  - {} {}", c.id, c.front)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Persist the current settings
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.save(&self.settings_path)
            .with_context(|| format!("Failed to save settings to {}", self.settings_path.display()))
    }

    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }
}
