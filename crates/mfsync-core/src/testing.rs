//! In-memory store used by the engine tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{ClientError, ClientResult, MutationOutcome, SchemaClient, UserError};
use crate::model::{
    Access, Capabilities, FieldDefinition, MetafieldDefinition, Metaobject, MetaobjectDefinition,
    MetaobjectField, MetaobjectInput, OwnerType, Page, REFERENCE_VALIDATION, Validation,
};

#[derive(Default)]
struct State {
    field_definitions: Vec<MetafieldDefinition>,
    object_definitions: Vec<MetaobjectDefinition>,
    metaobjects: Vec<Metaobject>,
    denied_owner_types: Vec<OwnerType>,
    forced_errors: HashMap<String, UserError>,
    transport_failures: Vec<String>,
    calls: Vec<String>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, domain: &str, kind: &str) -> String {
        self.next_id += 1;
        format!("gid://{domain}/{kind}/{}", self.next_id)
    }

    /// Record `call` and fail it at the transport level when `key` is marked
    fn begin(&mut self, call: String, key: &str) -> ClientResult<()> {
        self.calls.push(call);
        if self.transport_failures.iter().any(|failing| failing == key) {
            return Err(ClientError::Network(format!("connection reset while handling {key}")));
        }
        Ok(())
    }

    fn missing_references(&self, validations: &[Validation]) -> bool {
        validations
            .iter()
            .flat_map(Validation::referenced_ids)
            .any(|id| !self.object_definitions.iter().any(|def| def.id == id))
    }
}

/// A store kept entirely in memory, recording every mutation it receives
pub struct MemoryStore {
    domain: String,
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_object_definition(self, definition: MetaobjectDefinition) -> Self {
        self.state.lock().unwrap().object_definitions.push(definition);
        self
    }

    pub fn with_field_definition(self, definition: MetafieldDefinition) -> Self {
        self.state.lock().unwrap().field_definitions.push(definition);
        self
    }

    pub fn with_metaobject(self, metaobject: Metaobject) -> Self {
        self.state.lock().unwrap().metaobjects.push(metaobject);
        self
    }

    pub fn deny_owner_type(self, owner_type: OwnerType) -> Self {
        self.state.lock().unwrap().denied_owner_types.push(owner_type);
        self
    }

    /// Make every creation of `identifier` fail with `error`
    pub fn fail_creation(self, identifier: &str, error: UserError) -> Self {
        self.state
            .lock()
            .unwrap()
            .forced_errors
            .insert(identifier.to_string(), error);
        self
    }

    /// Make every mutation keyed by `key` fail with a network error
    ///
    /// Creations are keyed by identifier, deletions by id.
    pub fn fail_transport(self, key: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .transport_failures
            .push(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn object_definitions(&self) -> Vec<MetaobjectDefinition> {
        self.state.lock().unwrap().object_definitions.clone()
    }

    pub fn field_definitions(&self) -> Vec<MetafieldDefinition> {
        self.state.lock().unwrap().field_definitions.clone()
    }

    pub fn metaobjects(&self) -> Vec<Metaobject> {
        self.state.lock().unwrap().metaobjects.clone()
    }

    pub fn object_definition(&self, type_name: &str) -> Option<MetaobjectDefinition> {
        self.object_definitions()
            .into_iter()
            .find(|def| def.type_name == type_name)
    }
}

#[async_trait]
impl SchemaClient for MemoryStore {
    fn store_domain(&self) -> &str {
        &self.domain
    }

    async fn fetch_metafield_definitions(
        &self,
        owner_type: OwnerType,
    ) -> ClientResult<Vec<MetafieldDefinition>> {
        let state = self.state.lock().unwrap();
        if state.denied_owner_types.contains(&owner_type) {
            return Err(ClientError::AccessDenied(format!(
                "Access denied for {owner_type} metafield definitions"
            )));
        }
        Ok(state
            .field_definitions
            .iter()
            .filter(|def| def.owner_type == owner_type)
            .cloned()
            .collect())
    }

    async fn fetch_metaobject_definitions(&self) -> ClientResult<Vec<MetaobjectDefinition>> {
        Ok(self.object_definitions())
    }

    async fn create_metafield_definition(
        &self,
        definition: &MetafieldDefinition,
    ) -> ClientResult<MutationOutcome<String>> {
        let mut state = self.state.lock().unwrap();
        let identifier = definition.identifier();
        state.begin(format!("create_metafield_definition:{identifier}"), &identifier)?;

        if let Some(error) = state.forced_errors.get(&definition.identifier()) {
            return Ok(MutationOutcome::Err(vec![error.clone()]));
        }
        if state.field_definitions.iter().any(|def| {
            def.namespace == definition.namespace
                && def.key == definition.key
                && def.owner_type == definition.owner_type
        }) {
            return Ok(MutationOutcome::Err(vec![
                UserError::new("Key is in use for Product metafields on the 'namespace' namespace.")
                    .with_code("TAKEN"),
            ]));
        }
        if state.missing_references(&definition.validations) {
            return Ok(MutationOutcome::Err(vec![UserError::new(
                "Validations metaobject definition does not exist",
            )]));
        }

        let id = state.next_id(&self.domain, "MetafieldDefinition");
        state.field_definitions.push(MetafieldDefinition {
            id: id.clone(),
            ..definition.clone()
        });
        Ok(MutationOutcome::Ok(id))
    }

    async fn create_metaobject_definition(
        &self,
        definition: &MetaobjectDefinition,
    ) -> ClientResult<MutationOutcome<String>> {
        let mut state = self.state.lock().unwrap();
        state.begin(
            format!("create_metaobject_definition:{}", definition.type_name),
            &definition.type_name,
        )?;

        if let Some(error) = state.forced_errors.get(&definition.type_name) {
            return Ok(MutationOutcome::Err(vec![error.clone()]));
        }
        if state
            .object_definitions
            .iter()
            .any(|def| def.type_name == definition.type_name)
        {
            return Ok(MutationOutcome::Err(vec![
                UserError::new("Type has already been taken").with_code("TAKEN"),
            ]));
        }
        let validations: Vec<Validation> = definition
            .field_definitions
            .iter()
            .flat_map(|field| field.validations.clone())
            .collect();
        if state.missing_references(&validations) {
            return Ok(MutationOutcome::Err(vec![UserError::new(
                "Validations must be a valid metaobject definition.",
            )]));
        }

        let id = state.next_id(&self.domain, "MetaobjectDefinition");
        state.object_definitions.push(MetaobjectDefinition {
            id: id.clone(),
            ..definition.clone()
        });
        Ok(MutationOutcome::Ok(id))
    }

    async fn delete_metafield_definition(&self, id: &str) -> ClientResult<MutationOutcome<String>> {
        let mut state = self.state.lock().unwrap();
        state.begin(format!("delete_metafield_definition:{id}"), id)?;

        let before = state.field_definitions.len();
        state.field_definitions.retain(|def| def.id != id);
        if state.field_definitions.len() == before {
            return Ok(MutationOutcome::Err(vec![
                UserError::new("Definition not found").with_code("NOT_FOUND"),
            ]));
        }
        Ok(MutationOutcome::Ok(id.to_string()))
    }

    async fn delete_metaobject_definition(
        &self,
        id: &str,
    ) -> ClientResult<MutationOutcome<String>> {
        let mut state = self.state.lock().unwrap();
        state.begin(format!("delete_metaobject_definition:{id}"), id)?;

        let Some(position) = state.object_definitions.iter().position(|def| def.id == id) else {
            return Ok(MutationOutcome::Err(vec![
                UserError::new("Record not found").with_code("RECORD_NOT_FOUND"),
            ]));
        };
        let type_name = state.object_definitions[position].type_name.clone();
        if state.metaobjects.iter().any(|entry| entry.type_name == type_name) {
            return Ok(MutationOutcome::Err(vec![UserError::new(
                "Definition still has metaobjects",
            )]));
        }
        state.object_definitions.remove(position);
        Ok(MutationOutcome::Ok(id.to_string()))
    }

    async fn fetch_metaobjects(
        &self,
        type_name: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> ClientResult<Page<Metaobject>> {
        let state = self.state.lock().unwrap();
        let all: Vec<Metaobject> = state
            .metaobjects
            .iter()
            .filter(|entry| entry.type_name == type_name)
            .cloned()
            .collect();

        let start = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| ClientError::Graphql(format!("invalid cursor {cursor}")))?,
            None => 0,
        };
        let end = (start + page_size).min(all.len());
        let has_next_page = end < all.len();

        Ok(Page {
            items: all[start.min(end)..end].to_vec(),
            has_next_page,
            next_cursor: has_next_page.then(|| end.to_string()),
        })
    }

    async fn fetch_metaobject_by_handle(
        &self,
        type_name: &str,
        handle: &str,
    ) -> ClientResult<Option<Metaobject>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .metaobjects
            .iter()
            .find(|entry| entry.type_name == type_name && entry.handle == handle)
            .cloned())
    }

    async fn create_metaobject(
        &self,
        type_name: &str,
        handle: &str,
        input: &MetaobjectInput,
    ) -> ClientResult<MutationOutcome<String>> {
        let mut state = self.state.lock().unwrap();
        state.begin(
            format!("create_metaobject:{type_name}/{handle}"),
            &format!("{type_name}/{handle}"),
        )?;

        if !state
            .object_definitions
            .iter()
            .any(|def| def.type_name == type_name)
        {
            return Ok(MutationOutcome::Err(vec![UserError::new(format!(
                "No metaobject definition exists for type \"{type_name}\""
            ))]));
        }
        if state
            .metaobjects
            .iter()
            .any(|entry| entry.type_name == type_name && entry.handle == handle)
        {
            return Ok(MutationOutcome::Err(vec![
                UserError::new("Handle has already been taken").with_code("TAKEN"),
            ]));
        }

        let id = state.next_id(&self.domain, "Metaobject");
        state
            .metaobjects
            .push(stored_metaobject(&id, type_name, handle, input));
        Ok(MutationOutcome::Ok(id))
    }

    async fn upsert_metaobject(
        &self,
        type_name: &str,
        handle: &str,
        input: &MetaobjectInput,
    ) -> ClientResult<MutationOutcome<String>> {
        let mut state = self.state.lock().unwrap();
        state.begin(
            format!("upsert_metaobject:{type_name}/{handle}"),
            &format!("{type_name}/{handle}"),
        )?;

        if let Some(existing) = state
            .metaobjects
            .iter_mut()
            .find(|entry| entry.type_name == type_name && entry.handle == handle)
        {
            let id = existing.id.clone();
            *existing = stored_metaobject(&id, type_name, handle, input);
            return Ok(MutationOutcome::Ok(id));
        }

        let id = state.next_id(&self.domain, "Metaobject");
        state
            .metaobjects
            .push(stored_metaobject(&id, type_name, handle, input));
        Ok(MutationOutcome::Ok(id))
    }

    async fn delete_metaobject(&self, id: &str) -> ClientResult<MutationOutcome<String>> {
        let mut state = self.state.lock().unwrap();
        state.begin(format!("delete_metaobject:{id}"), id)?;

        let before = state.metaobjects.len();
        state.metaobjects.retain(|entry| entry.id != id);
        if state.metaobjects.len() == before {
            return Ok(MutationOutcome::Err(vec![
                UserError::new("Record not found").with_code("RECORD_NOT_FOUND"),
            ]));
        }
        Ok(MutationOutcome::Ok(id.to_string()))
    }
}

fn stored_metaobject(id: &str, type_name: &str, handle: &str, input: &MetaobjectInput) -> Metaobject {
    Metaobject {
        id: id.to_string(),
        type_name: type_name.to_string(),
        handle: handle.to_string(),
        display_name: handle.to_string(),
        updated_at: None,
        fields: input
            .fields
            .iter()
            .map(|field| MetaobjectField {
                key: field.key.clone(),
                value: Some(field.value.clone()),
                type_name: "single_line_text_field".to_string(),
            })
            .collect(),
        publish_status: input.publish_status.clone(),
    }
}

/// Metaobject definition whose fields reference each id in `references`
pub fn object_definition(id: &str, type_name: &str, references: &[&str]) -> MetaobjectDefinition {
    let mut fields = vec![FieldDefinition {
        key: "name".to_string(),
        name: "Name".to_string(),
        description: None,
        type_name: "single_line_text_field".to_string(),
        required: true,
        validations: Vec::new(),
    }];
    fields.extend(references.iter().enumerate().map(|(index, reference)| FieldDefinition {
        key: format!("ref_{index}"),
        name: format!("Reference {index}"),
        description: None,
        type_name: "metaobject_reference".to_string(),
        required: false,
        validations: vec![Validation::new(REFERENCE_VALIDATION, *reference)],
    }));

    MetaobjectDefinition {
        id: id.to_string(),
        type_name: type_name.to_string(),
        name: type_name.to_string(),
        description: None,
        display_name_key: Some("name".to_string()),
        field_definitions: fields,
        capabilities: Capabilities::default(),
        access: Access::default(),
    }
}

/// Metafield definition on products without validations
pub fn field_definition(id: &str, namespace: &str, key: &str) -> MetafieldDefinition {
    MetafieldDefinition {
        id: id.to_string(),
        name: key.to_string(),
        namespace: namespace.to_string(),
        key: key.to_string(),
        description: None,
        type_name: "single_line_text_field".to_string(),
        owner_type: OwnerType::Product,
        validations: Vec::new(),
        access: Access::default(),
        pinned: false,
    }
}

/// Metaobject with the given `(key, value)` fields
pub fn metaobject(id: &str, type_name: &str, handle: &str, fields: &[(&str, &str)]) -> Metaobject {
    Metaobject {
        id: id.to_string(),
        type_name: type_name.to_string(),
        handle: handle.to_string(),
        display_name: handle.to_string(),
        updated_at: None,
        fields: fields
            .iter()
            .map(|(key, value)| MetaobjectField {
                key: (*key).to_string(),
                value: Some((*value).to_string()),
                type_name: "single_line_text_field".to_string(),
            })
            .collect(),
        publish_status: None,
    }
}
