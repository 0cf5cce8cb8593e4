//! Turns free-form generated text into `Summary`/`Rewrite` records, and
//! builds the offline substitutes used when generation fails.
//!
//! Nothing in here returns an error: malformed text degrades to empty
//! fields.

use chrono::Utc;
use hn_core::{Rewrite, Summary};

const TLDR_MARKER: &str = "TLDR:";
const TAKEAWAYS_MARKER: &str = "TAKEAWAYS:";
const REWRITE_MARKER: &str = "REWRITE:";
const ELLIPSIS: &str = "...";

pub const MAX_TAKEAWAYS: usize = 3;

/// Trim, then collapse a run of two or more trailing periods into one.
/// An explicit `...` ending is kept.
pub fn normalize_trailing_dots(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.ends_with(ELLIPSIS) {
        return trimmed.to_string();
    }
    let stem = trimmed.trim_end_matches('.');
    if trimmed.len() - stem.len() >= 2 {
        format!("{}.", stem)
    } else {
        trimmed.to_string()
    }
}

fn is_bullet(c: char) -> bool {
    matches!(c, '-' | '–' | '*' | '•') || c.is_whitespace()
}

/// Normalize a bullet line and drop its leading marker.
pub fn sanitize_list_item(text: &str) -> String {
    normalize_trailing_dots(text)
        .trim_start_matches(is_bullet)
        .trim()
        .to_string()
}

pub fn parse_summary(raw: &str) -> Summary {
    let (head, tail) = raw.split_once(TAKEAWAYS_MARKER).unwrap_or((raw, ""));

    let head = head.trim();
    let tldr = normalize_trailing_dots(head.strip_prefix(TLDR_MARKER).unwrap_or(head));

    let takeaways = tail
        .lines()
        .map(sanitize_list_item)
        .filter(|line| !line.is_empty())
        .take(MAX_TAKEAWAYS)
        .collect();

    Summary {
        tldr,
        takeaways,
        generated_at: Utc::now(),
    }
}

pub fn parse_rewrite(raw: &str) -> Rewrite {
    let trimmed = raw.trim();
    let text = trimmed.strip_prefix(REWRITE_MARKER).unwrap_or(trimmed).trim();
    Rewrite {
        text: text.to_string(),
        generated_at: Utc::now(),
    }
}

/// Naive period split. "U.S." and "3.5" are cut apart too.
fn sentences(content: &str) -> Vec<&str> {
    content
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// First two sentences as the TL;DR, the next three as takeaways.
pub fn fallback_summary(content: &str) -> Summary {
    let sentences = sentences(content);

    let mut tldr = sentences[..sentences.len().min(2)].join(". ");
    if sentences.len() > 2 {
        tldr.push_str(ELLIPSIS);
    }

    let takeaways = sentences
        .iter()
        .skip(2)
        .take(MAX_TAKEAWAYS)
        .map(|s| sanitize_list_item(s))
        .filter(|s| !s.is_empty())
        .collect();

    Summary {
        tldr: normalize_trailing_dots(&tldr),
        takeaways,
        generated_at: Utc::now(),
    }
}

/// The first 80% of `content`, counted in characters.
pub fn fallback_rewrite(content: &str) -> Rewrite {
    let keep = content.chars().count() * 4 / 5;
    Rewrite {
        text: content.chars().take(keep).collect(),
        generated_at: Utc::now(),
    }
}
