pub mod errors;
pub mod model;
mod reader;
pub mod schema;
mod timestamp;

pub use errors::ParserError;
pub use model::{normalize_sentiment, MentionRecord, Sentiment};
pub use reader::parse_mentions;
pub use timestamp::parse_timestamp;
