use crate::runtime::contract::CounterIncrement;

/// Port to the durable store that owns the counter record.
///
/// Implementations apply the increment atomically and return the value the
/// attribute holds afterwards.
pub trait CounterStore {
    fn increment(&self, increment: &CounterIncrement) -> Result<u64, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Request(String),
    #[error("store response did not include attribute `{0}`")]
    MissingAttribute(String),
    #[error("attribute `{attribute}` is not a non-negative integer: {value}")]
    MalformedAttribute { attribute: String, value: String },
}
