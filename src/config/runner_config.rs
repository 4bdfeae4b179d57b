use crate::error::ContractError;
use std::path::{Path, PathBuf};

/// Configuration for ApiTestRunner
#[derive(Debug, Clone, PartialEq)]
pub struct ApiTestRunnerConfig {
    /// Write one contract document per group on export (Default: false)
    pub generate_contract_files: bool,

    /// Directory exported documents are written under (Default: none)
    pub file_output_root: Option<PathBuf>,

    /// Status code prefixes whose requests are validated before dispatch (Default: ["2"])
    pub success_status_prefixes: Vec<String>,

    /// File name of each exported document (Default: openapi.json)
    pub document_file_name: String,
}

impl Default for ApiTestRunnerConfig {
    fn default() -> Self {
        Self {
            generate_contract_files: false,
            file_output_root: None,
            success_status_prefixes: vec!["2".to_string()],
            document_file_name: "openapi.json".to_string(),
        }
    }
}

impl ApiTestRunnerConfig {
    /// Create a new configuration with all default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate traffic and export every document under `output_root` on teardown
    pub fn publishing(output_root: &Path) -> Self {
        Self {
            generate_contract_files: true,
            file_output_root: Some(output_root.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn with_generate_contract_files(mut self, enabled: bool) -> Self {
        self.generate_contract_files = enabled;
        self
    }

    pub fn with_file_output_root(mut self, output_root: &Path) -> Self {
        self.file_output_root = Some(output_root.to_path_buf());
        self
    }

    pub fn with_success_status_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.success_status_prefixes = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_document_file_name(mut self, file_name: &str) -> Self {
        self.document_file_name = file_name.to_string();
        self
    }

    /// Whether requests expecting this status are validated before dispatch
    pub fn is_success_status(&self, status_code: &str) -> bool {
        self.success_status_prefixes
            .iter()
            .any(|prefix| status_code.starts_with(prefix.as_str()))
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.success_status_prefixes.is_empty() {
            return Err(ContractError::InvalidConfig(
                "success_status_prefixes must not be empty".to_string(),
            ));
        }

        if let Some(prefix) = self
            .success_status_prefixes
            .iter()
            .find(|prefix| prefix.is_empty() || prefix.len() > 3 || !prefix.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(ContractError::InvalidConfig(format!(
                "success status prefix '{}' must be 1 to 3 digits",
                prefix
            )));
        }

        if self.document_file_name.is_empty() || self.document_file_name.contains(['/', '\\']) {
            return Err(ContractError::InvalidConfig(format!(
                "document_file_name '{}' must be a plain file name",
                self.document_file_name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiTestRunnerConfig::default();

        assert!(!config.generate_contract_files);
        assert!(config.file_output_root.is_none());
        assert_eq!(config.document_file_name, "openapi.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_success_status_prefixes() {
        let config = ApiTestRunnerConfig::default();
        assert!(config.is_success_status("200"));
        assert!(config.is_success_status("204"));
        assert!(!config.is_success_status("400"));
        assert!(!config.is_success_status("302"));

        let config = config.with_success_status_prefixes(&["2", "304"]);
        assert!(config.is_success_status("304"));
        assert!(!config.is_success_status("301"));
    }

    #[test]
    fn test_publishing_preset() {
        let config = ApiTestRunnerConfig::publishing(Path::new("/tmp/contracts"));

        assert!(config.generate_contract_files);
        assert_eq!(config.file_output_root, Some(PathBuf::from("/tmp/contracts")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ApiTestRunnerConfig::new().with_success_status_prefixes(&[]).validate().is_err());
        assert!(ApiTestRunnerConfig::new().with_success_status_prefixes(&["2x"]).validate().is_err());
        assert!(ApiTestRunnerConfig::new().with_document_file_name("a/b.json").validate().is_err());
        assert!(ApiTestRunnerConfig::new().with_document_file_name("").validate().is_err());
    }
}
