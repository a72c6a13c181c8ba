//! Markdown rendering shared by the public site and the editor preview.

use comrak::{Options, markdown_to_html};

/// Render Markdown to HTML with raw HTML disabled.
#[must_use]
pub fn render(markdown: &str) -> String {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    // Post bodies come from the admin form; raw HTML is escaped.
    options.render.r#unsafe = false;

    markdown_to_html(markdown, &options)
}

/// Estimated reading time in minutes (200 words per minute, at least 1).
#[must_use]
pub fn reading_time_minutes(markdown: &str) -> u32 {
    let words = markdown.split_whitespace().count();
    u32::try_from(words.div_ceil(200)).unwrap_or(u32::MAX).max(1)
}

/// Plain-text teaser of at most `max_chars` characters, for listings that
/// have no explicit excerpt.
#[must_use]
pub fn teaser(markdown: &str, max_chars: usize) -> String {
    let plain: String = markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("!["))
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '>'))
        .collect();

    if plain.chars().count() <= max_chars {
        return plain;
    }
    let cut: String = plain.chars().take(max_chars).collect();
    let cut = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
    format!("{}…", cut.trim_end())
}
