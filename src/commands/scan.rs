//! Scan command: photo -> identified query -> ranked offers.

use crate::commands::SearchCommand;
use crate::config::Config;
use crate::format::Formatter;
use crate::output::Output;
use crate::shopping::{ProductSearch, ShoppingClient};
use crate::vision::{self, IdentificationRequest, ProductIdentifier, VisionClient};
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Identifies the product in a photo and searches offers for it.
pub struct ScanCommand {
    config: Config,
    output: Output,
}

impl ScanCommand {
    pub fn new(config: Config, output: Output) -> Self {
        Self { config, output }
    }

    /// Executes the scan and returns formatted output.
    ///
    /// Both clients are built before the image is read, so missing credentials are
    /// reported before any work happens.
    pub async fn execute(&self, image: &Path) -> Result<String> {
        let identifier = VisionClient::new(&self.config).context("Failed to create vision client")?;
        let search = ShoppingClient::new(&self.config).context("Failed to create search client")?;
        debug!("Identifying with model {}", identifier.model());

        self.execute_with_clients(&identifier, &search, image).await
    }

    /// Executes the scan with provided clients (for testing).
    pub async fn execute_with_clients(
        &self,
        identifier: &dyn ProductIdentifier,
        search: &dyn ProductSearch,
        image: &Path,
    ) -> Result<String> {
        if !image.is_file() {
            anyhow::bail!("File not found: {}", image.display());
        }

        let request = IdentificationRequest::from_path(image)
            .with_context(|| format!("Failed to read image: {}", image.display()))?;
        debug!("Loaded {:?} from {}", request, image.display());

        let spinner = self.output.spinner("Asking the vision model to identify the product...");
        let query = vision::identify(identifier, &request).await;
        spinner.finish_and_clear();

        let Some(query) = query else {
            self.output.error("Could not identify the product.");
            return Ok(String::new());
        };

        self.output.highlight("Search Query", &query);

        let search_cmd = SearchCommand::new(self.config.clone(), self.output.clone());
        let offers = search_cmd.fetch_offers(search, &query).await;
        if !offers.is_empty() {
            self.output.success(&format!("Found {} offers", offers.len()));
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_offers(&offers))
    }
}

/// Cleans a path typed or dragged into the terminal: surrounding whitespace and
/// quote characters are removed.
pub fn clean_path(input: &str) -> PathBuf {
    let trimmed = input.trim().trim_matches('"').trim_matches('\'');
    PathBuf::from(trimmed)
}

/// Prompts for an image path. Returns `None` when the user interrupts with Ctrl-C.
pub fn prompt_image_path() -> Result<Option<PathBuf>> {
    let input = dialoguer::Input::<String>::new()
        .with_prompt("📸 Drag & drop an image file here")
        .interact_text();

    match input {
        Ok(path) => Ok(Some(clean_path(&path))),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e).context("Failed to read image path"),
    }
}
