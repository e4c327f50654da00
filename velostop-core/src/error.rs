use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No scored network dataset provided")]
    MissingNetwork,
    #[error("Sampling error: {0}")]
    Sampling(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Cache error: {0}")]
    CacheError(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
