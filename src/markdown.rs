// src/markdown.rs
// =============================================================================
// Pulls a human-friendly title out of a markdown document.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is fast and memory-efficient (it's a streaming parser)
//
// Rules:
// - the first level-1 heading wins
// - otherwise the first heading of any level
// - otherwise None (the caller falls back to the file name)
//
// MDX front matter and JSX lines are just paragraphs to the parser, so they
// never produce a heading by accident.
// =============================================================================

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

// Returns the document's title, if it has a heading
//
// Example input:
//   "Intro text\n\n## Setup\n\n# Getting Started"
//
// Example output:
//   Some("Getting Started")
pub fn extract_title(markdown: &str) -> Option<String> {
    let mut first_any: Option<String> = None;

    // Level of the heading we're inside, plus the text collected so far
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => {
                current = Some((level, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(Tag::Heading(..)) => {
                if let Some((level, buf)) = current.take() {
                    let title = buf.trim().to_string();
                    if title.is_empty() {
                        continue;
                    }
                    if level == HeadingLevel::H1 {
                        return Some(title);
                    }
                    if first_any.is_none() {
                        first_any = Some(title);
                    }
                }
            }
            _ => {}
        }
    }

    first_any
}
