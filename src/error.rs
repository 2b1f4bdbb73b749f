use thiserror::Error;

/// Failures raised by the remote payment service boundary.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PaymentSheetError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Payment intent not found for client secret")]
    PaymentIntentNotFound,
    #[error("Invalid client secret: {0}")]
    InvalidClientSecret(String),
    #[error("No payment method selected")]
    NoPaymentSelection,
    #[error("Unsupported payment selection: {0}")]
    UnsupportedSelection(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PaymentSheetError>;

pub type TransportResult<T> = std::result::Result<T, TransportError>;
