//! Plain-text table of the raw post collection

use std::io::{self, Write};
use termfreq_common::{single_line, truncate_string, Post};
use termfreq_i18n::TableHeadings;

/// Longest text shown per post before it is cut
pub const MAX_TEXT_CHARS: usize = 60;

fn cells(index: usize, post: &Post) -> [String; 6] {
    [
        index.to_string(),
        post.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        post.post_id.to_string(),
        truncate_string(&single_line(&post.text), MAX_TEXT_CHARS),
        post.author.clone(),
        post.hashtags
            .as_ref()
            .map(|tags| tags.join(", "))
            .unwrap_or_default(),
    ]
}

/// Write the posts as an aligned table, in the order given
pub fn write_post_table<W: Write>(
    out: &mut W,
    title: &str,
    headings: &TableHeadings,
    posts: &[Post],
) -> io::Result<()> {
    let header = [
        String::new(),
        headings.datetime.clone(),
        headings.post_id.clone(),
        headings.text.clone(),
        headings.username.clone(),
        headings.hashtags.clone(),
    ];
    let rows: Vec<[String; 6]> = posts
        .iter()
        .enumerate()
        .map(|(index, post)| cells(index, post))
        .collect();

    let mut widths = header.clone().map(|cell| cell.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    writeln!(out, "{title}")?;
    write_row(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, row: &[String; 6], widths: &[usize; 6]) -> io::Result<()> {
    let padded: Vec<String> = row
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, width))| {
            // Index column is right aligned
            if column == 0 {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}
