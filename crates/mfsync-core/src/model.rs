//! Schema definitions and entries as seen by the sync engine
//!
//! Two kinds of definitions exist on a store:
//! - metafield definitions, identified by `(namespace, key)` per owner type
//! - metaobject definitions, identified by their type string
//!
//! Metaobjects (entries) are data instances of a metaobject definition.

use std::fmt;
use std::str::FromStr;

/// Validation name holding a single referenced metaobject definition id
pub const REFERENCE_VALIDATION: &str = "metaobject_definition_id";

/// Validation name holding a JSON array of referenced metaobject definition ids
pub const REFERENCE_LIST_VALIDATION: &str = "metaobject_definition_ids";

/// Resource category a metafield definition attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OwnerType {
    /// Blog articles
    Article,
    /// Blogs
    Blog,
    /// Collections
    Collection,
    /// B2B companies
    Company,
    /// B2B company locations
    CompanyLocation,
    /// Customers
    Customer,
    /// Draft orders
    DraftOrder,
    /// Inventory locations
    Location,
    /// Markets
    Market,
    /// Orders
    Order,
    /// Online store pages
    Page,
    /// Products
    Product,
    /// Product variants
    ProductVariant,
    /// The shop itself
    Shop,
}

impl OwnerType {
    /// Every owner type the engine queries during a full fetch
    pub const ALL: [Self; 14] = [
        Self::Article,
        Self::Blog,
        Self::Collection,
        Self::Company,
        Self::CompanyLocation,
        Self::Customer,
        Self::DraftOrder,
        Self::Location,
        Self::Market,
        Self::Order,
        Self::Page,
        Self::Product,
        Self::ProductVariant,
        Self::Shop,
    ];

    /// GraphQL enum value for this owner type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "ARTICLE",
            Self::Blog => "BLOG",
            Self::Collection => "COLLECTION",
            Self::Company => "COMPANY",
            Self::CompanyLocation => "COMPANY_LOCATION",
            Self::Customer => "CUSTOMER",
            Self::DraftOrder => "DRAFTORDER",
            Self::Location => "LOCATION",
            Self::Market => "MARKET",
            Self::Order => "ORDER",
            Self::Page => "PAGE",
            Self::Product => "PRODUCT",
            Self::ProductVariant => "PRODUCTVARIANT",
            Self::Shop => "SHOP",
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|owner| owner.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown owner type: {s}"))
    }
}

/// A name/value constraint attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Validation {
    /// Validation name (e.g. `min`, `regex`, `metaobject_definition_id`)
    pub name: String,
    /// Validation value, always carried as a string
    pub value: String,
}

impl Validation {
    /// Create a validation
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether this validation points at another metaobject definition
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.name == REFERENCE_VALIDATION || self.name == REFERENCE_LIST_VALIDATION
    }

    /// Definition ids referenced by this validation
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<String> {
        if self.name == REFERENCE_VALIDATION {
            vec![self.value.clone()]
        } else if self.name == REFERENCE_LIST_VALIDATION {
            serde_json::from_str::<Vec<String>>(&self.value).unwrap_or_default()
        } else {
            Vec::new()
        }
    }
}

/// Admin and storefront visibility of a definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Access {
    /// Admin API access level (e.g. `PUBLIC_READ_WRITE`)
    pub admin: Option<String>,
    /// Storefront API access level (e.g. `PUBLIC_READ`, `NONE`)
    pub storefront: Option<String>,
}

/// A metafield definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetafieldDefinition {
    /// Store-assigned identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Namespace part of the identity
    pub namespace: String,
    /// Key part of the identity
    pub key: String,
    /// Optional description
    pub description: Option<String>,
    /// Type name (e.g. `single_line_text_field`)
    pub type_name: String,
    /// Resource category this definition attaches to
    pub owner_type: OwnerType,
    /// Value constraints
    pub validations: Vec<Validation>,
    /// Visibility settings
    pub access: Access,
    /// Whether the definition is pinned in the admin
    pub pinned: bool,
}

impl MetafieldDefinition {
    /// `namespace.key` identifier used in manifests and reports
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }

    /// Build a copy of this definition with different validations
    #[must_use]
    pub fn with_validations(&self, validations: Vec<Validation>) -> Self {
        Self {
            validations,
            ..self.clone()
        }
    }
}

/// One sub-field of a metaobject definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field key
    pub key: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Type name
    pub type_name: String,
    /// Whether a value is required
    pub required: bool,
    /// Value constraints
    pub validations: Vec<Validation>,
}

impl FieldDefinition {
    /// Build a copy of this field with different validations
    #[must_use]
    pub fn with_validations(&self, validations: Vec<Validation>) -> Self {
        Self {
            validations,
            ..self.clone()
        }
    }
}

/// Optional behaviours enabled on a metaobject definition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Entries have a draft/active publish status
    pub publishable: bool,
    /// Entries can be translated
    pub translatable: bool,
}

/// A metaobject definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaobjectDefinition {
    /// Store-assigned identifier
    pub id: String,
    /// Type string, the identity of the definition
    pub type_name: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Key of the field used as the entry display name
    pub display_name_key: Option<String>,
    /// Ordered sub-field specs
    pub field_definitions: Vec<FieldDefinition>,
    /// Enabled capabilities
    pub capabilities: Capabilities,
    /// Visibility settings
    pub access: Access,
}

impl MetaobjectDefinition {
    /// Type identifier used in manifests and reports
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.type_name
    }

    /// Build a copy of this definition with different field definitions
    #[must_use]
    pub fn with_field_definitions(&self, field_definitions: Vec<FieldDefinition>) -> Self {
        Self {
            field_definitions,
            ..self.clone()
        }
    }

    /// All definition ids referenced from sub-field validations
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<String> {
        self.field_definitions
            .iter()
            .flat_map(|field| field.validations.iter())
            .flat_map(Validation::referenced_ids)
            .collect()
    }
}

/// Which definition collections an operation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceFilter {
    /// Metafield definitions only
    Fields,
    /// Metaobject definitions only
    Objects,
    /// Both collections
    #[default]
    All,
}

impl ResourceFilter {
    /// Whether metafield definitions are included
    #[must_use]
    pub const fn includes_fields(self) -> bool {
        matches!(self, Self::Fields | Self::All)
    }

    /// Whether metaobject definitions are included
    #[must_use]
    pub const fn includes_objects(self) -> bool {
        matches!(self, Self::Objects | Self::All)
    }
}

/// Both definition collections of one store (or a selection of them)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionSet {
    /// Metafield definitions
    pub field_definitions: Vec<MetafieldDefinition>,
    /// Metaobject definitions
    pub object_definitions: Vec<MetaobjectDefinition>,
}

impl DefinitionSet {
    /// Create a set from both collections
    #[must_use]
    pub const fn new(
        field_definitions: Vec<MetafieldDefinition>,
        object_definitions: Vec<MetaobjectDefinition>,
    ) -> Self {
        Self {
            field_definitions,
            object_definitions,
        }
    }

    /// Total number of definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.field_definitions.len() + self.object_definitions.len()
    }

    /// Whether the set holds no definitions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_definitions.is_empty() && self.object_definitions.is_empty()
    }

    /// Drop the collections excluded by `filter`
    #[must_use]
    pub fn retain_kinds(mut self, filter: ResourceFilter) -> Self {
        if !filter.includes_fields() {
            self.field_definitions.clear();
        }
        if !filter.includes_objects() {
            self.object_definitions.clear();
        }
        self
    }
}

/// One field value of a metaobject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaobjectField {
    /// Field key
    pub key: String,
    /// Serialized value, `None` when unset
    pub value: Option<String>,
    /// Type name inferred from the definition
    pub type_name: String,
}

/// A metaobject (entry) of some metaobject definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metaobject {
    /// Store-assigned identifier
    pub id: String,
    /// Type of the owning definition
    pub type_name: String,
    /// Handle, unique per type
    pub handle: String,
    /// Display name
    pub display_name: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: Option<String>,
    /// Field values
    pub fields: Vec<MetaobjectField>,
    /// Publish status (`ACTIVE`/`DRAFT`) when publishable
    pub publish_status: Option<String>,
}

impl Metaobject {
    /// `type/handle` identifier for logs and reports
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}/{}", self.type_name, self.handle)
    }

    /// Field values in a form accepted by create/upsert mutations
    #[must_use]
    pub fn to_input(&self) -> MetaobjectInput {
        MetaobjectInput {
            fields: self
                .fields
                .iter()
                .filter_map(|field| {
                    field.value.as_ref().map(|value| FieldValue {
                        key: field.key.clone(),
                        value: value.clone(),
                    })
                })
                .collect(),
            publish_status: self.publish_status.clone(),
        }
    }

    /// Whether both entries carry the same set field values
    #[must_use]
    pub fn same_values(&self, other: &Self) -> bool {
        let mut ours = self.to_input().fields;
        let mut theirs = other.to_input().fields;
        ours.sort_by(|a, b| a.key.cmp(&b.key));
        theirs.sort_by(|a, b| a.key.cmp(&b.key));
        ours == theirs
    }
}

/// A key/value pair sent when writing a metaobject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// Field key
    pub key: String,
    /// Serialized value
    pub value: String,
}

/// Content written when creating or upserting a metaobject
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaobjectInput {
    /// Field values
    pub fields: Vec<FieldValue>,
    /// Publish status to apply, when the definition is publishable
    pub publish_status: Option<String>,
}

/// One page of a cursor-paginated connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Whether another page follows
    pub has_next_page: bool,
    /// Cursor to request the next page with
    pub next_cursor: Option<String>,
}
