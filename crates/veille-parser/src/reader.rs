use csv::{ReaderBuilder, StringRecord};

use crate::errors::ParserError;
use crate::model::MentionRecord;
use crate::schema::{AUTHOR_COLUMN, CREATED_DATE_COLUMN, SENTIMENT_COLUMN};
use crate::timestamp::parse_timestamp;

const BOM: char = '\u{feff}';

struct MentionColumns {
    created_at: usize,
    author: usize,
    sentiment: usize,
}

impl MentionColumns {
    fn locate(headers: &StringRecord) -> Result<Self, ParserError> {
        if headers.iter().all(|header| header.trim().is_empty()) {
            return Err(ParserError::EmptyInput);
        }

        let position = |column: &'static str| {
            headers
                .iter()
                .position(|header| header.trim_start_matches(BOM) == column)
                .ok_or(ParserError::MissingColumn { column })
        };

        Ok(Self {
            created_at: position(CREATED_DATE_COLUMN)?,
            author: position(AUTHOR_COLUMN)?,
            sentiment: position(SENTIMENT_COLUMN)?,
        })
    }

    fn record_from(&self, row: &StringRecord) -> MentionRecord {
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let author = match cell(self.author) {
            "" => None,
            name => Some(name.to_string()),
        };

        MentionRecord::new(
            parse_timestamp(cell(self.created_at)),
            author,
            cell(self.sentiment),
        )
    }
}

/// Reads a mention export. Required columns are validated before any row is read;
/// individual cells never fail the parse.
pub fn parse_mentions(content: &[u8]) -> Result<Vec<MentionRecord>, ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers = reader.headers().map_err(ParserError::csv)?.clone();
    let columns = MentionColumns::locate(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(ParserError::csv)?;
        records.push(columns.record_from(&row));
    }

    Ok(records)
}
