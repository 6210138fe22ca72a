//! Output formatting for offers (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::shopping::NormalizedOffer;

const NAME_WIDTH: usize = 50;
const STORE_WIDTH: usize = 20;
const PRICE_WIDTH: usize = 14;

/// Formats offers for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a ranked list of offers.
    pub fn format_offers(&self, offers: &[NormalizedOffer]) -> String {
        if offers.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No results found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_offers(offers),
            OutputFormat::Table => self.table_offers(offers),
            OutputFormat::Markdown => self.markdown_offers(offers),
            OutputFormat::Csv => self.csv_offers(offers),
        }
    }

    // JSON formatting

    fn json_offers(&self, offers: &[NormalizedOffer]) -> String {
        serde_json::to_string_pretty(offers).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_offers(&self, offers: &[NormalizedOffer]) -> String {
        let mut lines = Vec::new();

        lines.push("Shopping Results (Cheapest to Expensive)".to_string());
        lines.push(String::new());
        lines.push(format!(
            "{:>PRICE_WIDTH$}  {:<STORE_WIDTH$}  {:<name_width$}  {}",
            "Price",
            "Store",
            "Product Name",
            "Link",
            name_width = NAME_WIDTH + 3
        ));
        lines.push(format!(
            "{:-<PRICE_WIDTH$}  {:-<STORE_WIDTH$}  {:-<name_width$}  {:-<4}",
            "",
            "",
            "",
            "",
            name_width = NAME_WIDTH + 3
        ));

        for offer in offers {
            lines.push(format!(
                "{:>PRICE_WIDTH$}  {:<STORE_WIDTH$}  {:<name_width$}  {}",
                offer.display_price(),
                truncate(&offer.store, STORE_WIDTH),
                truncate(&offer.name, NAME_WIDTH),
                offer.link.as_deref().unwrap_or("N/A"),
                name_width = NAME_WIDTH + 3
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} offers", offers.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_offers(&self, offers: &[NormalizedOffer]) -> String {
        let mut lines = Vec::new();

        lines.push("| Price | Store | Product Name | Link |".to_string());
        lines.push("|------:|-------|--------------|------|".to_string());

        for offer in offers {
            let link = match &offer.link {
                Some(url) => format!("[Open Link]({})", url),
                None => "N/A".to_string(),
            };

            lines.push(format!(
                "| {} | {} | {} | {} |",
                offer.display_price(),
                offer.store.replace('|', "\\|"),
                truncate(&offer.name, NAME_WIDTH).replace('|', "\\|"),
                link
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} offers found*", offers.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "name,price,currency,store,link,image".to_string()
    }

    fn csv_offers(&self, offers: &[NormalizedOffer]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for offer in offers {
            lines.push(format!(
                "{},{:.2},{},{},{},{}",
                Self::csv_escape(&offer.name),
                offer.price,
                offer.currency,
                Self::csv_escape(&offer.store),
                offer.link.as_deref().map(Self::csv_escape).unwrap_or_default(),
                Self::csv_escape(&offer.image)
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Cuts `s` to `max` characters, appending "..." when something was removed.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
