//! Dataset names

use std::fmt;

/// Extension every dataset name ends with
pub const DATASET_EXTENSION: &str = ".csv";

/// Dataset used when the caller does not name one
pub const DEFAULT_DATASET: &str = "leads.csv";

/// Store key for a dataset, always ending in `.csv`.
///
/// No other sanitization happens here; callers exposing names to untrusted
/// input must constrain them (see `is_single_component`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetName(String);

impl DatasetName {
    pub fn new(raw: impl Into<String>) -> Self {
        let mut name = raw.into();
        if !name.ends_with(DATASET_EXTENSION) {
            name.push_str(DATASET_EXTENSION);
        }
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Suggested download name: the last path component
    pub fn attachment_name(&self) -> &str {
        self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0)
    }

    /// True when the name is a plain, visible file name: no separators, no
    /// NUL, no leading `.`, and something before the extension.
    ///
    /// Dot-prefixed names are reserved for the store's temporary files.
    pub fn is_single_component(&self) -> bool {
        let stem = &self.0[..self.0.len() - DATASET_EXTENSION.len()];
        !stem.trim().is_empty()
            && !self.0.starts_with('.')
            && !self.0.contains(['/', '\\', '\0'])
    }
}

impl Default for DatasetName {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET)
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_extension_once() {
        assert_eq!(DatasetName::new("leads").as_str(), "leads.csv");
        assert_eq!(DatasetName::new("leads.csv").as_str(), "leads.csv");
        assert_eq!(DatasetName::new("leads.CSV").as_str(), "leads.CSV.csv");
    }

    #[test]
    fn default_is_leads() {
        assert_eq!(DatasetName::default().as_str(), "leads.csv");
    }

    #[test]
    fn attachment_name_is_last_component() {
        assert_eq!(DatasetName::new("city/leads").attachment_name(), "leads.csv");
        assert_eq!(DatasetName::new("leads").attachment_name(), "leads.csv");
    }

    #[test]
    fn single_component_check() {
        assert!(DatasetName::new("leads").is_single_component());
        assert!(DatasetName::new("austin lawyers.csv").is_single_component());
        assert!(!DatasetName::new("../etc/passwd").is_single_component());
        assert!(!DatasetName::new("a/b").is_single_component());
        assert!(!DatasetName::new("a\\b").is_single_component());
        assert!(!DatasetName::new("..").is_single_component());
        assert!(!DatasetName::new("").is_single_component());
        assert!(!DatasetName::new(".csv").is_single_component());
    }

    #[test]
    fn dot_prefixed_names_are_rejected() {
        assert!(!DatasetName::new(".hidden").is_single_component());
        assert!(!DatasetName::new(".leads.csv").is_single_component());
        assert!(DatasetName::new("leads.v2").is_single_component());
    }
}
