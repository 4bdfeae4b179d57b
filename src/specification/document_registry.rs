use crate::error::ContractError;
use crate::specification::document_parser::DocumentParser;
use crate::specification::model_registry::{ContractDocument, PathItem};
use log::{debug, info};

/// Named collection of contract documents, one per API group.
///
/// Populate it during single-threaded setup (`register`, `upsert_path`), then share it
/// read-only while validating. Mutating while validations run is not supported; the
/// `&mut self` receivers make the borrow checker enforce this for callers holding the
/// registry through the runner. Groups keep their registration order.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: Vec<(String, ContractDocument)>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

/// Register (or replace in place) the document for a group
    pub fn register(&mut self, group_name: &str, document: ContractDocument) -> Result<(), ContractError> {
        DocumentParser::validate(&document)?;
        info!(
            "Registering contract document '{}' (version {}) for group '{}'",
            document.info.title, document.info.version, group_name
        );
        match self.documents.iter_mut().find(|(name, _)| name == group_name) {
            Some((_, existing)) => *existing = document,
            None => self.documents.push((group_name.to_string(), document)),
        }
        Ok(())
    }

    pub fn with_document(mut self, group_name: &str, document: ContractDocument) -> Result<Self, ContractError> {
        self.register(group_name, document)?;
        Ok(self)
    }

    pub fn get(&self, group_name: &str) -> Result<&ContractDocument, ContractError> {
        self.documents
            .iter()
            .find(|(name, _)| name == group_name)
            .map(|(_, document)| document)
            .ok_or_else(|| ContractError::UnknownGroup(group_name.to_string()))
    }

    /// Unchecked access; path changes from outside go through `upsert_path`
    pub(crate) fn get_mut(&mut self, group_name: &str) -> Result<&mut ContractDocument, ContractError> {
        self.documents
            .iter_mut()
            .find(|(name, _)| name == group_name)
            .map(|(_, document)| document)
            .ok_or_else(|| ContractError::UnknownGroup(group_name.to_string()))
    }

    /// Insert or replace the path item for a template; last write wins
    pub fn upsert_path(
        &mut self,
        group_name: &str,
        path_template: &str,
        path_item: PathItem,
    ) -> Result<Option<PathItem>, ContractError> {
        DocumentParser::validate_path_item(path_template, &path_item)?;
        let document = self.get_mut(group_name)?;
        let previous = document.add_path(path_template, path_item);
        debug!(
            "{} path '{}' in group '{}'",
            if previous.is_some() { "Replaced" } else { "Added" },
            path_template,
            group_name
        );
        Ok(previous)
    }

    pub fn contains(&self, group_name: &str) -> bool {
        self.documents.iter().any(|(name, _)| name == group_name)
    }

    /// Groups and their documents, in registration order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &ContractDocument)> {
        self.documents.iter().map(|(name, document)| (name.as_str(), document))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
