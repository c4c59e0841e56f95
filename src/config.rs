//! Configuration handling for datarecon

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Html,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Immutable configuration for a reconciliation engine
#[derive(Debug, Clone, Default)]
pub struct ReconConfig {
    /// Ordered column names forming the composite match key
    pub key: Vec<String>,
    /// Columns excluded from value diffing, still used for row matching
    pub ignore_cols: Vec<String>,
}

impl ReconConfig {
    /// Create a configuration with the given match key
    pub fn new(key: Vec<String>) -> Self {
        Self {
            key,
            ..Default::default()
        }
    }

    /// Set columns to exclude from value comparison
    pub fn with_ignore_cols(mut self, cols: Vec<String>) -> Self {
        self.ignore_cols = cols;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("terminal".parse::<ReportFormat>(), Ok(ReportFormat::Terminal));
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
