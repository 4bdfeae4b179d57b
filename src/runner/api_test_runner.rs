use crate::config::ApiTestRunnerConfig;
use crate::error::ContractError;
use crate::protocol::{HttpClient, HttpRequest, HttpResponse};
use crate::specification::document_parser::DocumentParser;
use crate::specification::document_registry::DocumentRegistry;
use crate::specification::model_registry::PathItem;
use crate::specification::route_resolver::RouteResolver;
use crate::validation::content_validator::{default_content_validators, ContentValidator};
use crate::validation::request_validator::RequestValidator;
use crate::validation::response_validator::ResponseValidator;
use log::{debug, info, warn};
use std::path::PathBuf;
use uuid::Uuid;

/// Validates live HTTP interactions against the registered contract documents.
///
/// Describe endpoints with [`ApiTestRunner::describe`] during setup, then call
/// [`ApiTestRunner::test`] from any number of concurrent tests. `test` takes `&self`,
/// so a runner shared through an `Arc` cannot be mutated while validations run.
pub struct ApiTestRunner {
    registry: DocumentRegistry,
    config: ApiTestRunnerConfig,
    content_validators: Vec<Box<dyn ContentValidator>>,
}

impl ApiTestRunner {
    pub fn new(registry: DocumentRegistry, config: ApiTestRunnerConfig) -> Result<Self, ContractError> {
        config.validate()?;
        info!(
            "Creating API test runner for {} contract group(s)",
            registry.len()
        );

        Ok(Self {
            registry,
            config,
            content_validators: default_content_validators(),
        })
    }

    /// Append a content validator; every validator claiming a media type runs
    pub fn add_content_validator(&mut self, validator: Box<dyn ContentValidator>) {
        self.content_validators.push(validator);
    }

    pub fn with_content_validator(mut self, validator: Box<dyn ContentValidator>) -> Self {
        self.add_content_validator(validator);
        self
    }

    /// Insert or replace the contract of one path template; last write wins
    pub fn describe(
        &mut self,
        group_name: &str,
        path_template: &str,
        path_item: PathItem,
    ) -> Result<(), ContractError> {
        self.registry.upsert_path(group_name, path_template, path_item)?;
        Ok(())
    }

    /// Validate `request`, dispatch it through `client`, then validate the response.
    ///
    /// Requests expecting a success status are checked before dispatch and never sent
    /// when they violate the contract. Returns the response once it matches.
    pub async fn test<C>(
        &self,
        group_name: &str,
        expected_status: &str,
        request: HttpRequest,
        client: &C,
    ) -> Result<HttpResponse, ContractError>
    where
        C: HttpClient + ?Sized,
    {
        let invocation_id = Uuid::new_v4();
        let document = self.registry.get(group_name)?;

        let resolved = RouteResolver::resolve(document, &request.uri, request.method, expected_status)
            .map_err(|e| {
                warn!("[{}] {}", invocation_id, e);
                e
            })?;
        info!(
            "[{}] Testing {} {} as '{}' in group '{}', expecting {}",
            invocation_id, request.method, request.uri, resolved.path_template, group_name, expected_status
        );

        if self.config.is_success_status(expected_status) {
            RequestValidator::new(document)
                .validate(&resolved, &request, &self.content_validators)
                .map_err(|e| {
                    warn!("[{}] Request not sent: {}", invocation_id, e);
                    e
                })?;
        } else {
            debug!(
                "[{}] Expected status {} is not a success, request validation skipped",
                invocation_id, expected_status
            );
        }

        let path_template = resolved.path_template;
        let method = resolved.method;

        let response = client.send(request).await.map_err(|e| {
            warn!("[{}] Dispatch failed: {}", invocation_id, e);
            ContractError::Transport(e)
        })?;
        debug!("[{}] Received status {}", invocation_id, response.status);

        let (_, operation) = RouteResolver::operation(document, path_template, method)?;
        ResponseValidator::new(document)
            .validate(
                path_template,
                method,
                operation,
                expected_status,
                &response,
                &self.content_validators,
            )
            .map_err(|e| {
                warn!("[{}] {}", invocation_id, e);
                e
            })?;

        info!("[{}] {} {} matches contract", invocation_id, method, path_template);
        Ok(response)
    }

    /// Write every registered document to `<file_output_root>/<group>/<document_file_name>`
    /// when contract file generation is enabled
    pub async fn export_documents(&self) -> Result<Vec<PathBuf>, ContractError> {
        if !self.config.generate_contract_files {
            debug!("Contract file generation disabled, nothing exported");
            return Ok(Vec::new());
        }

        let output_root = self
            .config
            .file_output_root
            .as_deref()
            .ok_or(ContractError::MissingOutputRoot)?;

        DocumentParser::write_documents(&self.registry, output_root, &self.config.document_file_name).await
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn configuration(&self) -> &ApiTestRunnerConfig {
        &self.config
    }

    /// Hand the documents back, typically after export at teardown
    pub fn into_registry(self) -> DocumentRegistry {
        self.registry
    }
}
