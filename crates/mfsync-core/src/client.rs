//! Remote schema client
//!
//! This module defines the seam between the sync engine and a store:
//! - `SchemaClient`, the async trait the engine talks to
//! - `MutationOutcome`, the uniform result envelope of every mutation
//! - `ClientError`, raised only for transport-level failures
//!
//! `GraphqlClient` is the Admin GraphQL implementation used by the CLI.

mod graphql;
mod queries;

use async_trait::async_trait;
use thiserror::Error;

pub use graphql::GraphqlClient;

use crate::model::{
    MetafieldDefinition, Metaobject, MetaobjectDefinition, MetaobjectInput, OwnerType, Page,
};

/// Result type for remote calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Transport-level failures talking to a store
///
/// Business-level rejections never use this type; they arrive as
/// `MutationOutcome::Err`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// The store does not grant access to the requested resource
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Top-level GraphQL errors (syntax, throttling, internal errors)
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A business-level error reported by a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// Input path the error refers to
    pub field: Vec<String>,
    /// Human-readable message
    pub message: String,
    /// Structured error code, when the API provides one
    pub code: Option<String>,
}

impl UserError {
    /// Create an error without field path or code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: Vec::new(),
            message: message.into(),
            code: None,
        }
    }

    /// Attach a structured error code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Join the messages of several errors for reporting
    #[must_use]
    pub fn join(errors: &[Self]) -> String {
        if errors.is_empty() {
            return "unknown error".to_string();
        }
        errors
            .iter()
            .map(|error| {
                if error.field.is_empty() {
                    error.message.clone()
                } else {
                    format!("{} ({})", error.message, error.field.join("."))
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Uniform result envelope of a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    /// The mutation was applied
    Ok(T),
    /// The store rejected the mutation
    Err(Vec<UserError>),
}

impl<T> MutationOutcome<T> {
    /// Whether the mutation was applied
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Operations the sync engine needs from one store
#[async_trait]
pub trait SchemaClient: Send + Sync {
    /// Domain of the store this client talks to
    fn store_domain(&self) -> &str;

    /// All metafield definitions attached to `owner_type`
    async fn fetch_metafield_definitions(
        &self,
        owner_type: OwnerType,
    ) -> ClientResult<Vec<MetafieldDefinition>>;

    /// All metaobject definitions
    async fn fetch_metaobject_definitions(&self) -> ClientResult<Vec<MetaobjectDefinition>>;

    /// Create a metafield definition, returning its new id
    async fn create_metafield_definition(
        &self,
        definition: &MetafieldDefinition,
    ) -> ClientResult<MutationOutcome<String>>;

    /// Create a metaobject definition, returning its new id
    async fn create_metaobject_definition(
        &self,
        definition: &MetaobjectDefinition,
    ) -> ClientResult<MutationOutcome<String>>;

    /// Delete a metafield definition and its values, returning the deleted id
    async fn delete_metafield_definition(&self, id: &str) -> ClientResult<MutationOutcome<String>>;

    /// Delete a metaobject definition, returning the deleted id
    async fn delete_metaobject_definition(&self, id: &str)
    -> ClientResult<MutationOutcome<String>>;

    /// One page of metaobjects of `type_name`
    async fn fetch_metaobjects(
        &self,
        type_name: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> ClientResult<Page<Metaobject>>;

    /// Look up a metaobject by `(type, handle)`
    async fn fetch_metaobject_by_handle(
        &self,
        type_name: &str,
        handle: &str,
    ) -> ClientResult<Option<Metaobject>>;

    /// Create a metaobject, returning its new id
    async fn create_metaobject(
        &self,
        type_name: &str,
        handle: &str,
        input: &MetaobjectInput,
    ) -> ClientResult<MutationOutcome<String>>;

    /// Create or update the metaobject identified by `(type, handle)`
    async fn upsert_metaobject(
        &self,
        type_name: &str,
        handle: &str,
        input: &MetaobjectInput,
    ) -> ClientResult<MutationOutcome<String>>;

    /// Delete a metaobject, returning the deleted id
    async fn delete_metaobject(&self, id: &str) -> ClientResult<MutationOutcome<String>>;
}
