//! Fixed-width text layout: greedy word wrap and page breaking.
//!
//! Widths are measured in `char`s. Every page reserves two lines for its footer
//! (a blank separator and `Page N of M`).

use serde::{Deserialize, Serialize};

pub const DEFAULT_LINE_WIDTH: usize = 90;
pub const DEFAULT_LINES_PER_PAGE: usize = 56;

const FOOTER_LINES: usize = 2;
const MIN_LINE_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    pub line_width: usize,
    /// Including the footer.
    pub lines_per_page: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
        }
    }
}

impl PageConfig {
    /// Clamps nonsensical values so layout always makes progress.
    pub fn new(line_width: usize, lines_per_page: usize) -> Self {
        Self {
            line_width: line_width.max(MIN_LINE_WIDTH),
            lines_per_page: lines_per_page.max(FOOTER_LINES + 1),
        }
    }

    pub fn body_lines(&self) -> usize {
        self.lines_per_page.saturating_sub(FOOTER_LINES).max(1)
    }
}

/// Greedy word wrap. Words longer than `width` are split across lines.
/// Blank or whitespace-only input yields no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let space = usize::from(current_len > 0);
        if current_len + space + word.len() > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Wraps `text` and prefixes every line with `indent` spaces, keeping the total within `width`.
pub fn wrap_indented(text: &str, width: usize, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    wrap_text(text, width.saturating_sub(indent))
        .into_iter()
        .map(|line| format!("{pad}{line}"))
        .collect()
}

/// Splits body lines into pages of `config.body_lines()` each. Always returns at least one page.
pub fn paginate(lines: Vec<String>, config: &PageConfig) -> Vec<Vec<String>> {
    let per_page = config.body_lines();
    if lines.is_empty() {
        return vec![Vec::new()];
    }
    let mut pages = Vec::with_capacity(lines.len().div_ceil(per_page));
    let mut iter = lines.into_iter().peekable();
    while iter.peek().is_some() {
        pages.push(iter.by_ref().take(per_page).collect());
    }
    pages
}

/// Joins pages into one document: each page padded to full height, footer appended, and
/// pages separated by form feeds.
pub fn compose_pages(pages: Vec<Vec<String>>, config: &PageConfig) -> String {
    let total = pages.len();
    let mut out = String::new();
    for (index, page) in pages.into_iter().enumerate() {
        if index > 0 {
            out.push('\u{0C}');
        }
        let used = page.len();
        for line in page {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        for _ in used..config.body_lines() {
            out.push('\n');
        }
        out.push('\n');
        let footer = format!("Page {} of {}", index + 1, total);
        let pad = config.line_width.saturating_sub(footer.len()) / 2;
        out.push_str(&" ".repeat(pad));
        out.push_str(&footer);
        out.push('\n');
    }
    out
}
