//! Level-2 section extraction from Markdown.
//!
//! A section starts at the line whose trimmed text is exactly `## <title>`
//! and ends before the next line beginning with `## `, or at end of
//! document. Only level-2 headings delimit sections; `#` and `###` lines
//! are ordinary content.

/// Headings extracted when no section list is configured.
pub const DEFAULT_SECTIONS: &[&str] = &["Data Model & Persistence", "Primary Flows"];

const H2_PREFIX: &str = "## ";

/// Return the section titled `title`, or `""` if the heading is absent.
///
/// The result borrows from `markdown` and is the exact text of the section's
/// lines joined with `\n`: it excludes the newline before the next heading,
/// and keeps any trailing newline when the section runs to end of document.
pub fn extract_section<'a>(markdown: &'a str, title: &str) -> &'a str {
    let heading = format!("{H2_PREFIX}{title}");

    let mut start = None;
    let mut offset = 0;
    for line in markdown.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;

        match start {
            None if line.trim() == heading => start = Some(line_start),
            // The newline separating the section from the next heading is
            // not part of the section.
            Some(begin) if line.starts_with(H2_PREFIX) => {
                return &markdown[begin..line_start - 1];
            }
            _ => {}
        }
    }

    match start {
        Some(begin) => &markdown[begin..],
        None => "",
    }
}

/// Extract each title in order and join the ones found with a blank line.
///
/// Returns `None` when none of the titles matched.
pub fn collect_sections<S: AsRef<str>>(markdown: &str, titles: &[S]) -> Option<String> {
    let found: Vec<&str> = titles
        .iter()
        .map(|title| extract_section(markdown, title.as_ref()))
        .filter(|section| !section.is_empty())
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(found.join("\n\n"))
    }
}

/// Titles from `titles` whose heading appears in `markdown`.
pub fn found_titles<'t, S: AsRef<str>>(markdown: &str, titles: &'t [S]) -> Vec<&'t str> {
    titles
        .iter()
        .map(AsRef::as_ref)
        .filter(|title| !extract_section(markdown, title).is_empty())
        .collect()
}
