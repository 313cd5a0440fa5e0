use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}
