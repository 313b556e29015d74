use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("input did not contain a header row")]
    EmptyInput,

    #[error("required column '{column}' is missing")]
    MissingColumn { column: &'static str },

    #[error("CSV error at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

impl ParserError {
    pub(crate) fn csv(source: csv::Error) -> Self {
        let line = source.position().map(|pos| pos.line()).unwrap_or(0);
        ParserError::Csv { line, source }
    }
}
