pub const TABLE_NAME_ENV: &str = "TABLE_NAME";
pub const DEFAULT_TABLE_NAME: &str = "VisitorCount";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterConfig {
    pub table_name: String,
}

impl CounterConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`. A blank value counts as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let table_name = lookup(TABLE_NAME_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

        Self { table_name }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}
