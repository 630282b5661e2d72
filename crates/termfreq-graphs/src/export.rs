//! CSV export of the raw (unshaped) post collection.
//!
//! The layout is the one data-frame tools produce: an unnamed leading index
//! column, then one column per post field.

use chrono::{DateTime, Utc};
use std::io::{Read, Write};
use std::path::Path;
use termfreq_common::{Post, PostId, Result, TermFreqError};
use tracing::{debug, info, instrument};

/// MIME type of the exported file
pub const CSV_MIME: &str = "text/csv";

/// Header row, index column first
pub const CSV_HEADER: [&str; 6] = ["", "Datetime", "Tweet Id", "Text", "Username", "Hashtags"];

// `%.f` writes nothing for whole seconds, else 3, 6 or 9 digits
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f+00:00";
const DATETIME_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

fn hashtags_cell(hashtags: Option<&Vec<String>>) -> Result<String> {
    match hashtags {
        Some(tags) => Ok(serde_json::to_string(tags)?),
        None => Ok(String::new()),
    }
}

/// Write the posts, in the order given, to any writer
pub fn write_csv<W: Write>(posts: &[Post], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for (index, post) in posts.iter().enumerate() {
        csv_writer.write_record([
            index.to_string(),
            post.timestamp.format(DATETIME_FORMAT).to_string(),
            post.post_id.to_string(),
            post.text.clone(),
            post.author.clone(),
            hashtags_cell(post.hashtags.as_ref())?,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// The export as a string
pub fn to_csv_string(posts: &[Post]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(posts, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| TermFreqError::with_source("CSV output is not UTF-8", e))
}

/// Write the export to `path`, creating missing parent directories
#[instrument(skip(posts), fields(rows = posts.len()))]
pub fn export_csv(posts: &[Post], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    write_csv(posts, std::io::BufWriter::new(file))?;

    info!(mime = CSV_MIME, "Exported {} post(s) to {}", posts.len(), path.display());
    Ok(())
}

fn field<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str> {
    record
        .get(index)
        .ok_or_else(|| TermFreqError::validation_field(format!("missing column '{name}'"), name))
}

/// Parse an export back into posts
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Post>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let header = csv_reader.headers()?;
    if header.iter().ne(CSV_HEADER) {
        return Err(TermFreqError::validation(format!(
            "unexpected CSV header: {:?}",
            header.iter().collect::<Vec<_>>()
        )));
    }

    let mut posts = Vec::new();
    for record in csv_reader.records() {
        let record = record?;

        let datetime = field(&record, 1, "Datetime")?;
        let timestamp = DateTime::parse_from_str(datetime, DATETIME_PARSE_FORMAT)
            .map_err(|e| {
                TermFreqError::validation_field(format!("invalid datetime '{datetime}': {e}"), "Datetime")
            })?
            .with_timezone(&Utc);

        let hashtags = match field(&record, 5, "Hashtags")? {
            "" => None,
            cell => Some(serde_json::from_str(cell)?),
        };

        posts.push(Post {
            timestamp,
            post_id: PostId::from(field(&record, 2, "Tweet Id")?),
            text: field(&record, 3, "Text")?.to_string(),
            author: field(&record, 4, "Username")?.to_string(),
            hashtags,
        });
    }

    debug!(rows = posts.len(), "Parsed CSV export");
    Ok(posts)
}
