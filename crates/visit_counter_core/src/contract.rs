use serde::{Deserialize, Serialize};

/// Partition key attribute of the counter table.
pub const COUNTER_PARTITION_KEY: &str = "id";
/// Fixed key of the single record this service maintains.
pub const SITE_VISITS_RECORD_ID: &str = "site_visits";
pub const COUNT_ATTRIBUTE: &str = "count";

pub const COUNT_NAME_PLACEHOLDER: &str = "#c";
pub const START_VALUE_PLACEHOLDER: &str = ":start";
pub const STEP_VALUE_PLACEHOLDER: &str = ":inc";

pub const INITIAL_COUNT: u64 = 0;
pub const INCREMENT_STEP: u64 = 1;

/// One atomic "initialize if absent, then add" operation against a numeric
/// attribute of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterIncrement {
    pub record_id: String,
    pub attribute: String,
    pub start: u64,
    pub step: u64,
}

impl CounterIncrement {
    pub fn site_visits() -> Self {
        Self {
            record_id: SITE_VISITS_RECORD_ID.to_string(),
            attribute: COUNT_ATTRIBUTE.to_string(),
            start: INITIAL_COUNT,
            step: INCREMENT_STEP,
        }
    }

    /// Update expression understood by the store. The attribute name and both
    /// operands are bound through the placeholder constants.
    pub fn update_expression(&self) -> String {
        format!(
            "SET {COUNT_NAME_PLACEHOLDER} = if_not_exists({COUNT_NAME_PLACEHOLDER}, {START_VALUE_PLACEHOLDER}) + {STEP_VALUE_PLACEHOLDER}"
        )
    }

    /// Value the attribute holds after the increment, given its current value.
    /// Returns `None` when the result does not fit in a `u64`.
    pub fn apply(&self, current: Option<u64>) -> Option<u64> {
        current.unwrap_or(self.start).checked_add(self.step)
    }
}

impl Default for CounterIncrement {
    fn default() -> Self {
        Self::site_visits()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitsBody {
    pub visits: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
