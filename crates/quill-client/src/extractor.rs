use std::sync::Arc;

use quill_core::error::AppError;
use quill_core::models::{ExtractedPage, QuoteDraft};
use quill_core::traits::Extractor;
use scraper::{ElementRef, Html, Selector};

/// Quotation marks trimmed from both ends of a quote's text.
const DECORATIVE_QUOTES: [char; 6] = ['"', '“', '”', '«', '»', '„'];

struct Selectors {
    quote: Selector,
    text: Selector,
    author: Selector,
    tag: Selector,
    next: Selector,
}

/// Extracts quote blocks from a quotes.toscrape.com listing page.
///
/// Selectors are compiled once and shared between clones.
#[derive(Clone)]
pub struct QuotesExtractor {
    selectors: Arc<Selectors>,
}

impl QuotesExtractor {
    pub fn new() -> Result<Self, AppError> {
        let selectors = Selectors {
            quote: parse_selector("div.quote")?,
            text: parse_selector("span.text")?,
            author: parse_selector("small.author")?,
            tag: parse_selector("a.tag")?,
            next: parse_selector("li.next a")?,
        };

        Ok(Self {
            selectors: Arc::new(selectors),
        })
    }

    fn extract_block(&self, block: ElementRef<'_>) -> Option<QuoteDraft> {
        let text = first_text(block, &self.selectors.text)?;
        let text = strip_decoration(&text).to_string();
        let author = first_text(block, &self.selectors.author)?;
        if text.is_empty() {
            return None;
        }

        let tags = block
            .select(&self.selectors.tag)
            .map(element_text)
            .filter(|tag| !tag.is_empty())
            .collect();

        Some(QuoteDraft { text, author, tags })
    }
}

impl Extractor for QuotesExtractor {
    fn extract(&self, html: &str) -> ExtractedPage {
        let document = Html::parse_document(html);

        let mut blocks = 0usize;
        let mut quotes = Vec::new();
        for block in document.select(&self.selectors.quote) {
            blocks += 1;
            match self.extract_block(block) {
                Some(draft) => quotes.push(draft),
                None => {
                    tracing::debug!(block = blocks, "Skipping quote block without text or author");
                }
            }
        }

        let has_next = document.select(&self.selectors.next).next().is_some();

        ExtractedPage {
            quotes,
            blocks,
            has_more: blocks > 0 && has_next,
        }
    }
}

fn parse_selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css)
        .map_err(|e| AppError::ParseError(format!("Invalid selector '{css}': {e:?}")))
}

/// Trimmed text of the first matching descendant, if it is non-empty.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Drop one enclosing pair of quotation marks, keeping quotes nested inside.
fn strip_decoration(text: &str) -> &str {
    let text = text.strip_prefix(DECORATIVE_QUOTES).unwrap_or(text);
    let text = text.strip_suffix(DECORATIVE_QUOTES).unwrap_or(text);
    text.trim()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
