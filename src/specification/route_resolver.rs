use crate::error::ContractError;
use crate::protocol::HttpMethod;
use crate::specification::model_registry::{ContractDocument, Operation, PathItem};
use crate::utils::UriUtils;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    Literal(String),
    /// `{name}` placeholder matching exactly one non-empty segment
    Variable(String),
}

/// Parsed REST path template such as `/api/products/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    segments: Vec<TemplateSegment>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self, ContractError> {
        if !template.starts_with('/') {
            return Err(ContractError::InvalidDocument(format!(
                "Path template '{}' must start with '/'",
                template
            )));
        }

        let mut segments = Vec::new();
        for segment in split_segments(template) {
            let parsed = match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) if !name.is_empty() && !name.contains(['{', '}']) => {
                    TemplateSegment::Variable(name.to_string())
                }
                _ if segment.contains(['{', '}']) => {
                    return Err(ContractError::InvalidDocument(format!(
                        "Path template '{}' has malformed placeholder segment '{}'",
                        template, segment
                    )));
                }
                _ => TemplateSegment::Literal(segment.to_string()),
            };
            segments.push(parsed);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            TemplateSegment::Variable(name) => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
    }

    /// Match an absolute path, returning the decoded placeholder values.
    /// Literals compare ASCII-case-insensitively; a trailing slash is ignored.
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let path_segments = split_segments(path);
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut values = HashMap::new();
        for (template_segment, path_segment) in self.segments.iter().zip(path_segments) {
            match template_segment {
                TemplateSegment::Literal(literal) => {
                    if !literal.eq_ignore_ascii_case(path_segment) {
                        return None;
                    }
                }
                TemplateSegment::Variable(name) => {
                    if path_segment.is_empty() {
                        return None;
                    }
                    values.insert(name.clone(), UriUtils::decode_path_segment(path_segment));
                }
            }
        }

        Some(values)
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim_start_matches('/');
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Operation a concrete request resolved to
#[derive(Debug, Clone)]
pub struct ResolvedOperation<'a> {
    pub path_template: &'a str,
    pub method: HttpMethod,
    pub path_item: &'a PathItem,
    pub operation: &'a Operation,
    /// Placeholder values extracted from the request path
    pub path_values: HashMap<String, String>,
}

/// Maps requests onto documented operations
pub struct RouteResolver;

impl RouteResolver {
    /// First template (declaration order) matching the path; not best-match
    pub fn match_path<'a>(
        document: &'a ContractDocument,
        path: &str,
    ) -> Result<Option<(&'a str, &'a PathItem, HashMap<String, String>)>, ContractError> {
        for (template, item) in document.paths.iter() {
            if let Some(values) = PathTemplate::parse(template)?.match_path(path) {
                return Ok(Some((template, item, values)));
            }
        }
        Ok(None)
    }

    /// Resolve a concrete request to the operation documenting it for `status_code`
    pub fn resolve<'a>(
        document: &'a ContractDocument,
        uri: &str,
        method: HttpMethod,
        status_code: &str,
    ) -> Result<ResolvedOperation<'a>, ContractError> {
        let spec_not_found = || ContractError::SpecNotFound {
            uri: UriUtils::strip_query(uri).to_string(),
            method: method.to_string(),
            status_code: status_code.to_string(),
        };

        let path = UriUtils::path(uri);
        let (path_template, path_item, path_values) = match Self::match_path(document, path)? {
            Some(found) => found,
            None => {
                debug!("No path template matches '{}'", path);
                return Err(spec_not_found());
            }
        };

        let operation = match path_item.operation(method) {
            Some(operation) if operation.responses.contains_key(status_code) => operation,
            Some(_) => {
                debug!(
                    "Operation {} {} declares no response for status {}",
                    method, path_template, status_code
                );
                return Err(spec_not_found());
            }
            None => {
                debug!("Path template '{}' has no {} operation", path_template, method);
                return Err(spec_not_found());
            }
        };

        debug!("Resolved {} {} to template '{}'", method, path, path_template);
        Ok(ResolvedOperation {
            path_template,
            method,
            path_item,
            operation,
            path_values,
        })
    }

    /// Strict lookup by template and method, used once the operation is known
    pub fn operation<'a>(
        document: &'a ContractDocument,
        path_template: &str,
        method: HttpMethod,
    ) -> Result<(&'a PathItem, &'a Operation), ContractError> {
        document
            .paths
            .get(path_template)
            .and_then(|item| item.operation(method).map(|operation| (item, operation)))
            .ok_or_else(|| ContractError::OperationNotFound {
                path_template: path_template.to_string(),
                method: method.to_string(),
            })
    }
}
