use crate::error::ContractError;
use crate::specification::model_registry::{
    ContractDocument, Parameter, Referable, Reference, ReferenceKind, RequestBody,
};
use crate::specification::schema::Schema;
use log::debug;

/// Longest chain of component-to-component references followed before giving up
pub const MAX_REFERENCE_DEPTH: usize = 32;

/// Resolves `$ref` pointers against the components of one document.
///
/// Resolution is a pure lookup returning borrowed views into the document; nothing is
/// flattened or cached, so unused dangling references never surface.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    document: &'a ContractDocument,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(document: &'a ContractDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &'a ContractDocument {
        self.document
    }

    /// Resolve a schema node, following chained references; non-reference nodes
    /// are returned unchanged
    pub fn resolve_schema(&self, schema: &'a Schema) -> Result<&'a Schema, ContractError> {
        let mut current = schema;
        let mut depth = 0;

        while let Schema::Reference(reference) = current {
            if depth == MAX_REFERENCE_DEPTH {
                return Err(ContractError::CircularReference(reference.pointer()));
            }
            current = self.lookup_schema(reference)?;
            depth += 1;
        }

        Ok(current)
    }

    pub fn resolve_parameter(
        &self,
        parameter: &'a Referable<Parameter>,
    ) -> Result<&'a Parameter, ContractError> {
        match parameter {
            Referable::Item(parameter) => Ok(parameter),
            Referable::Reference(reference) => {
                Self::expect_kind(reference, ReferenceKind::Parameter)?;
                debug!("Resolving parameter reference {}", reference);
                self.document
                    .components
                    .parameters
                    .get(&reference.id)
                    .ok_or_else(|| ContractError::DanglingReference(reference.pointer()))
            }
        }
    }

    pub fn resolve_request_body(
        &self,
        request_body: &'a Referable<RequestBody>,
    ) -> Result<&'a RequestBody, ContractError> {
        match request_body {
            Referable::Item(request_body) => Ok(request_body),
            Referable::Reference(reference) => {
                Self::expect_kind(reference, ReferenceKind::RequestBody)?;
                debug!("Resolving request body reference {}", reference);
                self.document
                    .components
                    .request_bodies
                    .get(&reference.id)
                    .ok_or_else(|| ContractError::DanglingReference(reference.pointer()))
            }
        }
    }

    fn lookup_schema(&self, reference: &Reference) -> Result<&'a Schema, ContractError> {
        Self::expect_kind(reference, ReferenceKind::Schema)?;
        debug!("Resolving schema reference {}", reference);
        self.document
            .components
            .schemas
            .get(&reference.id)
            .ok_or_else(|| ContractError::DanglingReference(reference.pointer()))
    }

    fn expect_kind(reference: &Reference, expected: ReferenceKind) -> Result<(), ContractError> {
        if reference.kind == expected {
            Ok(())
        } else {
            Err(ContractError::InvalidDocument(format!(
                "Reference '{}' points into '{}' where '{}' was expected",
                reference,
                reference.kind.component_section(),
                expected.component_section()
            )))
        }
    }
}
