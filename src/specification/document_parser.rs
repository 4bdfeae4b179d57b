use crate::error::ContractError;
use crate::specification::document_registry::DocumentRegistry;
use crate::specification::model_registry::{ContractDocument, PathItem};
use crate::specification::route_resolver::PathTemplate;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Loads, checks and persists contract documents in their canonical JSON form
pub struct DocumentParser;

impl DocumentParser {
    /// Parse a document from JSON
    pub fn from_json(json_str: &str) -> Result<ContractDocument, ContractError> {
        Self::from_json_with_context(json_str, None)
    }

    /// Parse a document from JSON with file context for diagnostics
    pub fn from_json_with_context(
        json_str: &str,
        file_path: Option<&Path>,
    ) -> Result<ContractDocument, ContractError> {
        let context = file_path
            .map(|p| format!(" (file: {})", p.display()))
            .unwrap_or_default();
        debug!(
            "Attempting to parse contract document from JSON{} ({} bytes)",
            context,
            json_str.len()
        );

        if json_str.trim().is_empty() {
            error!("Contract document JSON is empty{}", context);
            return Err(ContractError::InvalidDocument(format!(
                "JSON parsing error{}: input string is empty",
                context
            )));
        }

        match serde_json::from_str::<ContractDocument>(json_str) {
            Ok(document) => {
                info!("Successfully parsed contract document from JSON{}", context);
                debug!(
                    "Parsed document '{}' version {} with {} paths",
                    document.info.title,
                    document.info.version,
                    document.paths.len()
                );
                Ok(document)
            }
            Err(e) => {
                error!("Failed to parse contract document from JSON{}: {}", context, e);

                let detailed_error = match e.classify() {
                    serde_json::error::Category::Syntax => format!(
                        "JSON parsing error{} - Syntax error at line {}, column {}: {}",
                        context,
                        e.line(),
                        e.column(),
                        e
                    ),
                    serde_json::error::Category::Data => {
                        format!("JSON parsing error{} - Invalid document structure: {}", context, e)
                    }
                    serde_json::error::Category::Eof => {
                        format!("JSON parsing error{} - Unexpected end of input: {}", context, e)
                    }
                    serde_json::error::Category::Io => {
                        format!("JSON parsing error{} - I/O issue: {}", context, e)
                    }
                };

                Err(ContractError::InvalidDocument(detailed_error))
            }
        }
    }

    /// Parse a document from YAML
    #[cfg(feature = "yaml-support")]
    pub fn from_yaml(yaml_str: &str) -> Result<ContractDocument, ContractError> {
        serde_yaml::from_str::<ContractDocument>(yaml_str).map_err(|e| {
            error!("Failed to parse contract document from YAML: {}", e);
            let detail = match e.location() {
                Some(location) => format!(
                    "YAML parsing error - Syntax error at line {}, column {}: {}",
                    location.line(),
                    location.column(),
                    e
                ),
                None => format!("YAML parsing error: {}", e),
            };
            ContractError::InvalidDocument(detail)
        })
    }

    /// Load a document from disk, picking the format from the extension
    pub async fn from_file(path: &Path) -> Result<ContractDocument, ContractError> {
        info!("Loading contract document from file: {}", path.display());

        let content = fs::read_to_string(path).await.map_err(|source| {
            error!("Cannot read contract document '{}': {}", path.display(), source);
            ContractError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if content.len() > 10_000_000 {
            warn!(
                "Contract document is very large ({} bytes): {}",
                content.len(),
                path.display()
            );
        }

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );

        let document = if is_yaml {
            #[cfg(feature = "yaml-support")]
            {
                Self::from_yaml(&content)?
            }
            #[cfg(not(feature = "yaml-support"))]
            {
                return Err(ContractError::InvalidConfig(format!(
                    "YAML support not enabled (file: {}). Enable 'yaml-support' feature.",
                    path.display()
                )));
            }
        } else {
            Self::from_json_with_context(&content, Some(path))?
        };

        Self::validate(&document)?;
        Ok(document)
    }

    /// Serialize a document to pretty-printed JSON
    pub fn to_json(document: &ContractDocument) -> Result<String, ContractError> {
        debug!("Serializing contract document '{}' to JSON", document.info.title);
        serde_json::to_string_pretty(document).map_err(|e| {
            error!("Failed to serialize contract document to JSON: {}", e);
            ContractError::Serialization(e)
        })
    }

    /// Serialize a document to YAML
    #[cfg(feature = "yaml-support")]
    pub fn to_yaml(document: &ContractDocument) -> Result<String, ContractError> {
        serde_yaml::to_string(document).map_err(|e| {
            error!("Failed to serialize contract document to YAML: {}", e);
            ContractError::InvalidDocument(format!("YAML serialization error: {}", e))
        })
    }

    /// Write a document to disk as JSON
    pub async fn to_file(document: &ContractDocument, path: &Path) -> Result<(), ContractError> {
        let content = Self::to_json(document)?;
        fs::write(path, content).await.map_err(|source| ContractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote contract document '{}' to {}", document.info.title, path.display());
        Ok(())
    }

    /// Write one `<output_root>/<group>/<file_name>` file per registered group
    pub async fn write_documents(
        registry: &DocumentRegistry,
        output_root: &Path,
        file_name: &str,
    ) -> Result<Vec<PathBuf>, ContractError> {
        let mut written = Vec::with_capacity(registry.len());

        for (group_name, document) in registry.groups() {
            let output_dir = output_root.join(group_name);
            fs::create_dir_all(&output_dir)
                .await
                .map_err(|source| ContractError::Io {
                    path: output_dir.clone(),
                    source,
                })?;

            let output_path = output_dir.join(file_name);
            Self::to_file(document, &output_path).await?;
            written.push(output_path);
        }

        info!(
            "Exported {} contract document(s) under {}",
            written.len(),
            output_root.display()
        );
        Ok(written)
    }

    /// Structural checks run at registration: path template syntax and 3-digit
    /// response keys. References are not followed here.
    pub fn validate(document: &ContractDocument) -> Result<(), ContractError> {
        debug!(
            "Validating contract document '{}' with {} paths",
            document.info.title,
            document.paths.len()
        );

        for (path_template, path_item) in document.paths.iter() {
            Self::validate_path_item(path_template, path_item)?;
        }

        Ok(())
    }

    pub fn validate_path_item(path_template: &str, path_item: &PathItem) -> Result<(), ContractError> {
        PathTemplate::parse(path_template)?;

        for (method, operation) in &path_item.operations {
            if let Some(status_code) = operation
                .responses
                .keys()
                .find(|status_code| !Self::is_valid_status_code(status_code))
            {
                return Err(ContractError::InvalidDocument(format!(
                    "Response key '{}' of {} {} is not a 3-digit status code",
                    status_code, method, path_template
                )));
            }
        }

        Ok(())
    }

    fn is_valid_status_code(status_code: &str) -> bool {
        status_code.len() == 3 && status_code.bytes().all(|b| b.is_ascii_digit())
    }
}
