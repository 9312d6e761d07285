//! Admin GraphQL implementation of `SchemaClient`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::queries;
use super::{ClientError, ClientResult, MutationOutcome, SchemaClient, UserError};
use crate::config::{Config, StoreConfig};
use crate::model::{
    Access, Capabilities, FieldDefinition, MetafieldDefinition, Metaobject, MetaobjectDefinition,
    MetaobjectField, MetaobjectInput, OwnerType, Page, Validation,
};

/// Page size used when listing definitions
const DEFINITION_PAGE_SIZE: usize = 250;

/// Longest response body kept in an `HttpStatus` error
const MAX_ERROR_BODY: usize = 500;

/// GraphQL client bound to one store
pub struct GraphqlClient {
    domain: String,
    endpoint: String,
    access_token: String,
    http: Client,
}

impl GraphqlClient {
    /// Create a client for `domain` using the given API version
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        domain: impl Into<String>,
        access_token: impl Into<String>,
        api_version: &str,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let domain = domain.into();
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mfsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: format!("https://{domain}/admin/api/{api_version}/graphql.json"),
            domain,
            access_token: access_token.into(),
            http,
        })
    }

    /// Create a client for a configured store
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn for_store(store: &StoreConfig, config: &Config) -> ClientResult<Self> {
        Self::new(
            store.domain.clone(),
            store.access_token.clone(),
            config.api_version(),
            config.request_timeout(),
        )
    }

    /// Send requests to `endpoint` instead of the store's Admin API URL
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> ClientResult<T> {
        debug!(store = %self.domain, "Sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: GraphqlResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        if !parsed.errors.is_empty() {
            return Err(classify_errors(parsed.errors));
        }

        let data = parsed
            .data
            .ok_or_else(|| ClientError::Decode("response has no data".to_string()))?;
        serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn mutate(
        &self,
        query: &str,
        variables: Value,
        root: &str,
        id_pointer: &str,
    ) -> ClientResult<MutationOutcome<String>> {
        let data: Value = self.execute(query, variables).await?;
        mutation_outcome(&data, root, id_pointer)
    }
}

#[async_trait]
impl SchemaClient for GraphqlClient {
    fn store_domain(&self) -> &str {
        &self.domain
    }

    async fn fetch_metafield_definitions(
        &self,
        owner_type: OwnerType,
    ) -> ClientResult<Vec<MetafieldDefinition>> {
        let mut definitions = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: MetafieldDefinitionsData = self
                .execute(
                    queries::METAFIELD_DEFINITIONS,
                    json!({
                        "ownerType": owner_type.as_str(),
                        "first": DEFINITION_PAGE_SIZE,
                        "after": cursor,
                    }),
                )
                .await?;

            let connection = data.metafield_definitions;
            for node in connection.nodes {
                definitions.push(node.try_into()?);
            }

            match next_cursor(connection.page_info) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(definitions)
    }

    async fn fetch_metaobject_definitions(&self) -> ClientResult<Vec<MetaobjectDefinition>> {
        let mut definitions = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: MetaobjectDefinitionsData = self
                .execute(
                    queries::METAOBJECT_DEFINITIONS,
                    json!({ "first": DEFINITION_PAGE_SIZE, "after": cursor }),
                )
                .await?;

            let connection = data.metaobject_definitions;
            definitions.extend(connection.nodes.into_iter().map(MetaobjectDefinition::from));

            match next_cursor(connection.page_info) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(definitions)
    }

    async fn create_metafield_definition(
        &self,
        definition: &MetafieldDefinition,
    ) -> ClientResult<MutationOutcome<String>> {
        self.mutate(
            queries::CREATE_METAFIELD_DEFINITION,
            json!({ "definition": metafield_definition_input(definition) }),
            "metafieldDefinitionCreate",
            "/createdDefinition/id",
        )
        .await
    }

    async fn create_metaobject_definition(
        &self,
        definition: &MetaobjectDefinition,
    ) -> ClientResult<MutationOutcome<String>> {
        self.mutate(
            queries::CREATE_METAOBJECT_DEFINITION,
            json!({ "definition": metaobject_definition_input(definition) }),
            "metaobjectDefinitionCreate",
            "/metaobjectDefinition/id",
        )
        .await
    }

    async fn delete_metafield_definition(&self, id: &str) -> ClientResult<MutationOutcome<String>> {
        self.mutate(
            queries::DELETE_METAFIELD_DEFINITION,
            json!({ "id": id }),
            "metafieldDefinitionDelete",
            "/deletedDefinitionId",
        )
        .await
    }

    async fn delete_metaobject_definition(
        &self,
        id: &str,
    ) -> ClientResult<MutationOutcome<String>> {
        self.mutate(
            queries::DELETE_METAOBJECT_DEFINITION,
            json!({ "id": id }),
            "metaobjectDefinitionDelete",
            "/deletedId",
        )
        .await
    }

    async fn fetch_metaobjects(
        &self,
        type_name: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> ClientResult<Page<Metaobject>> {
        let data: MetaobjectsData = self
            .execute(
                queries::METAOBJECTS,
                json!({ "type": type_name, "first": page_size, "after": cursor }),
            )
            .await?;

        let connection = data.metaobjects;
        Ok(Page {
            items: connection.nodes.into_iter().map(Metaobject::from).collect(),
            has_next_page: connection.page_info.has_next_page,
            next_cursor: connection.page_info.end_cursor,
        })
    }

    async fn fetch_metaobject_by_handle(
        &self,
        type_name: &str,
        handle: &str,
    ) -> ClientResult<Option<Metaobject>> {
        let data: MetaobjectByHandleData = self
            .execute(
                queries::METAOBJECT_BY_HANDLE,
                json!({ "handle": { "type": type_name, "handle": handle } }),
            )
            .await?;
        Ok(data.metaobject_by_handle.map(Metaobject::from))
    }

    async fn create_metaobject(
        &self,
        type_name: &str,
        handle: &str,
        input: &MetaobjectInput,
    ) -> ClientResult<MutationOutcome<String>> {
        let mut metaobject = metaobject_input(input);
        metaobject.insert("type".to_string(), json!(type_name));
        metaobject.insert("handle".to_string(), json!(handle));

        self.mutate(
            queries::CREATE_METAOBJECT,
            json!({ "metaobject": metaobject }),
            "metaobjectCreate",
            "/metaobject/id",
        )
        .await
    }

    async fn upsert_metaobject(
        &self,
        type_name: &str,
        handle: &str,
        input: &MetaobjectInput,
    ) -> ClientResult<MutationOutcome<String>> {
        self.mutate(
            queries::UPSERT_METAOBJECT,
            json!({
                "handle": { "type": type_name, "handle": handle },
                "metaobject": metaobject_input(input),
            }),
            "metaobjectUpsert",
            "/metaobject/id",
        )
        .await
    }

    async fn delete_metaobject(&self, id: &str) -> ClientResult<MutationOutcome<String>> {
        self.mutate(
            queries::DELETE_METAOBJECT,
            json!({ "id": id }),
            "metaobjectDelete",
            "/deletedId",
        )
        .await
    }
}

fn classify_errors(errors: Vec<GraphqlError>) -> ClientError {
    let denied = errors.iter().any(|error| {
        error
            .extensions
            .as_ref()
            .and_then(|ext| ext.code.as_deref())
            .is_some_and(|code| code == "ACCESS_DENIED")
            || error.message.to_lowercase().contains("access denied")
    });

    let message = errors
        .into_iter()
        .map(|error| error.message)
        .collect::<Vec<_>>()
        .join("; ");

    if denied {
        ClientError::AccessDenied(message)
    } else {
        ClientError::Graphql(message)
    }
}

fn mutation_outcome(data: &Value, root: &str, id_pointer: &str) -> ClientResult<MutationOutcome<String>> {
    let payload = data
        .get(root)
        .filter(|payload| !payload.is_null())
        .ok_or_else(|| ClientError::Decode(format!("missing {root} payload")))?;

    let errors: Vec<UserErrorNode> = match payload.get("userErrors") {
        Some(errors) => serde_json::from_value(errors.clone())
            .map_err(|e| ClientError::Decode(e.to_string()))?,
        None => Vec::new(),
    };

    if !errors.is_empty() {
        return Ok(MutationOutcome::Err(
            errors.into_iter().map(UserError::from).collect(),
        ));
    }

    payload
        .pointer(id_pointer)
        .and_then(Value::as_str)
        .map(|id| MutationOutcome::Ok(id.to_string()))
        .ok_or_else(|| ClientError::Decode(format!("{root} returned no id")))
}

fn next_cursor(page_info: PageInfo) -> Option<String> {
    if page_info.has_next_page {
        page_info.end_cursor
    } else {
        None
    }
}

fn validations_input(validations: &[Validation]) -> Value {
    Value::Array(
        validations
            .iter()
            .map(|v| json!({ "name": v.name, "value": v.value }))
            .collect(),
    )
}

fn access_input(access: &Access) -> Option<Value> {
    let mut map = Map::new();
    if let Some(admin) = &access.admin {
        map.insert("admin".to_string(), json!(admin));
    }
    if let Some(storefront) = &access.storefront {
        map.insert("storefront".to_string(), json!(storefront));
    }
    (!map.is_empty()).then_some(Value::Object(map))
}

fn metafield_definition_input(definition: &MetafieldDefinition) -> Value {
    let mut input = json!({
        "name": definition.name,
        "namespace": definition.namespace,
        "key": definition.key,
        "description": definition.description,
        "type": definition.type_name,
        "ownerType": definition.owner_type.as_str(),
        "validations": validations_input(&definition.validations),
        "pin": definition.pinned,
    });
    if let (Some(access), Some(map)) = (access_input(&definition.access), input.as_object_mut()) {
        map.insert("access".to_string(), access);
    }
    input
}

fn metaobject_definition_input(definition: &MetaobjectDefinition) -> Value {
    let fields: Vec<Value> = definition
        .field_definitions
        .iter()
        .map(|field| {
            json!({
                "key": field.key,
                "name": field.name,
                "description": field.description,
                "type": field.type_name,
                "required": field.required,
                "validations": validations_input(&field.validations),
            })
        })
        .collect();

    let mut input = json!({
        "type": definition.type_name,
        "name": definition.name,
        "description": definition.description,
        "displayNameKey": definition.display_name_key,
        "fieldDefinitions": fields,
        "capabilities": {
            "publishable": { "enabled": definition.capabilities.publishable },
            "translatable": { "enabled": definition.capabilities.translatable },
        },
    });
    if let (Some(access), Some(map)) = (access_input(&definition.access), input.as_object_mut()) {
        map.insert("access".to_string(), access);
    }
    input
}

fn metaobject_input(input: &MetaobjectInput) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        "fields".to_string(),
        Value::Array(
            input
                .fields
                .iter()
                .map(|field| json!({ "key": field.key, "value": field.value }))
                .collect(),
        ),
    );
    if let Some(status) = &input.publish_status {
        map.insert(
            "capabilities".to_string(),
            json!({ "publishable": { "status": status } }),
        );
    }
    map
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserErrorNode {
    field: Option<Vec<String>>,
    message: String,
    code: Option<String>,
}

impl From<UserErrorNode> for UserError {
    fn from(node: UserErrorNode) -> Self {
        Self {
            field: node.field.unwrap_or_default(),
            message: node.message,
            code: node.code,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    nodes: Vec<T>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct TypeRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ValidationNode {
    name: String,
    value: Option<String>,
}

impl From<ValidationNode> for Validation {
    fn from(node: ValidationNode) -> Self {
        Self::new(node.name, node.value.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct AccessNode {
    admin: Option<String>,
    storefront: Option<String>,
}

impl From<Option<AccessNode>> for Access {
    fn from(node: Option<AccessNode>) -> Self {
        node.map_or_else(Self::default, |node| Self {
            admin: node.admin,
            storefront: node.storefront,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetafieldDefinitionsData {
    metafield_definitions: Connection<MetafieldDefinitionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetafieldDefinitionNode {
    id: String,
    name: String,
    namespace: String,
    key: String,
    description: Option<String>,
    owner_type: String,
    #[serde(rename = "type")]
    type_ref: TypeRef,
    #[serde(default)]
    validations: Vec<ValidationNode>,
    access: Option<AccessNode>,
    pinned_position: Option<i64>,
}

impl TryFrom<MetafieldDefinitionNode> for MetafieldDefinition {
    type Error = ClientError;

    fn try_from(node: MetafieldDefinitionNode) -> Result<Self, Self::Error> {
        let owner_type = node
            .owner_type
            .parse::<OwnerType>()
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(Self {
            id: node.id,
            name: node.name,
            namespace: node.namespace,
            key: node.key,
            description: node.description,
            type_name: node.type_ref.name,
            owner_type,
            validations: node.validations.into_iter().map(Validation::from).collect(),
            access: node.access.into(),
            pinned: node.pinned_position.is_some(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaobjectDefinitionsData {
    metaobject_definitions: Connection<MetaobjectDefinitionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaobjectDefinitionNode {
    id: String,
    #[serde(rename = "type")]
    type_name: String,
    name: String,
    description: Option<String>,
    display_name_key: Option<String>,
    #[serde(default)]
    field_definitions: Vec<FieldDefinitionNode>,
    capabilities: Option<DefinitionCapabilitiesNode>,
    access: Option<AccessNode>,
}

#[derive(Debug, Deserialize)]
struct FieldDefinitionNode {
    key: String,
    name: String,
    description: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(rename = "type")]
    type_ref: TypeRef,
    #[serde(default)]
    validations: Vec<ValidationNode>,
}

#[derive(Debug, Deserialize)]
struct DefinitionCapabilitiesNode {
    publishable: Option<EnabledNode>,
    translatable: Option<EnabledNode>,
}

#[derive(Debug, Deserialize)]
struct EnabledNode {
    enabled: bool,
}

impl From<MetaobjectDefinitionNode> for MetaobjectDefinition {
    fn from(node: MetaobjectDefinitionNode) -> Self {
        let capabilities = node.capabilities.map_or_else(Capabilities::default, |caps| {
            Capabilities {
                publishable: caps.publishable.is_some_and(|c| c.enabled),
                translatable: caps.translatable.is_some_and(|c| c.enabled),
            }
        });

        Self {
            id: node.id,
            type_name: node.type_name,
            name: node.name,
            description: node.description,
            display_name_key: node.display_name_key,
            field_definitions: node
                .field_definitions
                .into_iter()
                .map(|field| FieldDefinition {
                    key: field.key,
                    name: field.name,
                    description: field.description,
                    type_name: field.type_ref.name,
                    required: field.required,
                    validations: field.validations.into_iter().map(Validation::from).collect(),
                })
                .collect(),
            capabilities,
            access: node.access.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetaobjectsData {
    metaobjects: Connection<MetaobjectNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaobjectByHandleData {
    metaobject_by_handle: Option<MetaobjectNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaobjectNode {
    id: String,
    #[serde(rename = "type")]
    type_name: String,
    handle: String,
    display_name: Option<String>,
    updated_at: Option<String>,
    #[serde(default)]
    fields: Vec<MetaobjectFieldNode>,
    capabilities: Option<MetaobjectCapabilitiesNode>,
}

#[derive(Debug, Deserialize)]
struct MetaobjectFieldNode {
    key: String,
    value: Option<String>,
    #[serde(rename = "type")]
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct MetaobjectCapabilitiesNode {
    publishable: Option<PublishableStatusNode>,
}

#[derive(Debug, Deserialize)]
struct PublishableStatusNode {
    status: String,
}

impl From<MetaobjectNode> for Metaobject {
    fn from(node: MetaobjectNode) -> Self {
        Self {
            id: node.id,
            type_name: node.type_name,
            display_name: node.display_name.unwrap_or_else(|| node.handle.clone()),
            handle: node.handle,
            updated_at: node.updated_at,
            fields: node
                .fields
                .into_iter()
                .map(|field| MetaobjectField {
                    key: field.key,
                    value: field.value,
                    type_name: field.type_name,
                })
                .collect(),
            publish_status: node
                .capabilities
                .and_then(|caps| caps.publishable)
                .map(|publishable| publishable.status),
        }
    }
}
