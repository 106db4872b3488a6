//! Runtime configuration for table loading

/// Settings shared by every table operation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TableConfig {
    /// Report `... loading "name" from "file"` before each read
    pub verbose: bool,
    /// Initial capacity of the text line buffer in bytes
    pub line_buffer_capacity: usize,
    /// Variable names longer than `name_display_limit - 1` are shortened in
    /// "not found" diagnostics
    pub name_display_limit: usize,
}

impl TableConfig {
    /// Enable or disable progress reporting
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the initial line buffer capacity (at least one byte)
    pub fn with_line_buffer_capacity(mut self, capacity: usize) -> Self {
        self.line_buffer_capacity = capacity.max(1);
        self
    }

    pub fn with_name_display_limit(mut self, limit: usize) -> Self {
        self.name_display_limit = limit.max(1);
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            line_buffer_capacity: 64,
            name_display_limit: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = TableConfig::default()
            .with_verbose(true)
            .with_line_buffer_capacity(0)
            .with_name_display_limit(16);
        assert!(config.verbose);
        assert_eq!(config.line_buffer_capacity, 1);
        assert_eq!(config.name_display_limit, 16);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json() {
        let config: TableConfig = serde_json::from_str(r#"{"verbose": true}"#).unwrap();
        assert_eq!(config, TableConfig::default().with_verbose(true));
    }
}
