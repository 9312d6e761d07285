//! GraphQL documents sent to the Admin API

macro_rules! metaobject_selection {
    () => {
        "id type handle displayName updatedAt fields { key value type } capabilities { publishable { status } }"
    };
}

macro_rules! user_errors {
    () => {
        "userErrors { field message code }"
    };
}

pub const METAFIELD_DEFINITIONS: &str = "\
query MetafieldDefinitions($ownerType: MetafieldOwnerType!, $first: Int!, $after: String) {
  metafieldDefinitions(ownerType: $ownerType, first: $first, after: $after) {
    nodes {
      id name namespace key description ownerType
      type { name }
      validations { name value }
      access { admin storefront }
      pinnedPosition
    }
    pageInfo { hasNextPage endCursor }
  }
}";

pub const METAOBJECT_DEFINITIONS: &str = "\
query MetaobjectDefinitions($first: Int!, $after: String) {
  metaobjectDefinitions(first: $first, after: $after) {
    nodes {
      id type name description displayNameKey
      fieldDefinitions { key name description required type { name } validations { name value } }
      capabilities { publishable { enabled } translatable { enabled } }
      access { admin storefront }
    }
    pageInfo { hasNextPage endCursor }
  }
}";

pub const CREATE_METAFIELD_DEFINITION: &str = concat!(
    "mutation CreateMetafieldDefinition($definition: MetafieldDefinitionInput!) {\n",
    "  metafieldDefinitionCreate(definition: $definition) { createdDefinition { id } ",
    user_errors!(),
    " }\n}"
);

pub const CREATE_METAOBJECT_DEFINITION: &str = concat!(
    "mutation CreateMetaobjectDefinition($definition: MetaobjectDefinitionCreateInput!) {\n",
    "  metaobjectDefinitionCreate(definition: $definition) { metaobjectDefinition { id type } ",
    user_errors!(),
    " }\n}"
);

pub const DELETE_METAFIELD_DEFINITION: &str = concat!(
    "mutation DeleteMetafieldDefinition($id: ID!) {\n",
    "  metafieldDefinitionDelete(id: $id, deleteAllAssociatedMetafields: true) { deletedDefinitionId ",
    user_errors!(),
    " }\n}"
);

pub const DELETE_METAOBJECT_DEFINITION: &str = concat!(
    "mutation DeleteMetaobjectDefinition($id: ID!) {\n",
    "  metaobjectDefinitionDelete(id: $id) { deletedId ",
    user_errors!(),
    " }\n}"
);

pub const METAOBJECTS: &str = concat!(
    "query Metaobjects($type: String!, $first: Int!, $after: String) {\n",
    "  metaobjects(type: $type, first: $first, after: $after) {\n",
    "    nodes { ",
    metaobject_selection!(),
    " }\n    pageInfo { hasNextPage endCursor }\n  }\n}"
);

pub const METAOBJECT_BY_HANDLE: &str = concat!(
    "query MetaobjectByHandle($handle: MetaobjectHandleInput!) {\n",
    "  metaobjectByHandle(handle: $handle) { ",
    metaobject_selection!(),
    " }\n}"
);

pub const CREATE_METAOBJECT: &str = concat!(
    "mutation CreateMetaobject($metaobject: MetaobjectCreateInput!) {\n",
    "  metaobjectCreate(metaobject: $metaobject) { metaobject { id handle } ",
    user_errors!(),
    " }\n}"
);

pub const UPSERT_METAOBJECT: &str = concat!(
    "mutation UpsertMetaobject($handle: MetaobjectHandleInput!, $metaobject: MetaobjectUpsertInput!) {\n",
    "  metaobjectUpsert(handle: $handle, metaobject: $metaobject) { metaobject { id handle } ",
    user_errors!(),
    " }\n}"
);

pub const DELETE_METAOBJECT: &str = concat!(
    "mutation DeleteMetaobject($id: ID!) {\n",
    "  metaobjectDelete(id: $id) { deletedId ",
    user_errors!(),
    " }\n}"
);
