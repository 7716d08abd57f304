use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("malformed record for {ticker}: {field} {detail}")]
    MalformedRecord {
        ticker: String,
        field: &'static str,
        detail: String,
    },

    #[error("invalid scoring config: {0}")]
    InvalidConfig(String),
}
