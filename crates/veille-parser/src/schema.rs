pub const CREATED_DATE_COLUMN: &str = "articleCreatedDate";
pub const AUTHOR_COLUMN: &str = "authorName";
pub const SENTIMENT_COLUMN: &str = "sentimentHumanReadable";

pub const REQUIRED_COLUMNS: [&str; 3] = [CREATED_DATE_COLUMN, AUTHOR_COLUMN, SENTIMENT_COLUMN];
