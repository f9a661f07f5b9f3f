//! Attribute declarations for the provider block, the `beverage` resource
//! and the beverage data sources.
//!
//! The host reads these to learn which fields a user must write (`name`,
//! `type`), which the API fills in (`id`), and how list results are shaped.
//! Values are never checked against them inside this crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value type of a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// Free text, e.g. a beverage name.
    String,
    /// Beverage ids and timeouts.
    Int64,
    /// Homogeneous list, e.g. the `beverages` list returned by the data source.
    List(Box<AttributeType>),
    /// Nested record with named fields.
    Object(HashMap<String, AttributeType>),
}

impl AttributeType {
    /// List of `element_type` values.
    pub fn list(element_type: AttributeType) -> Self {
        Self::List(Box::new(element_type))
    }

    /// Build a nested record from `(field, type)` pairs.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeType)>,
        K: Into<String>,
    {
        Self::Object(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }
}

/// Who supplies a field's value: the user (`required`/`optional`) or the
/// Beverage API (`computed`). Exactly one flag is set by the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttributeFlags {
    /// Must appear in the user's block.
    pub required: bool,
    /// May be left out of the user's block.
    pub optional: bool,
    /// Set from what the API returns.
    pub computed: bool,
}

impl AttributeFlags {
    /// User must supply the value.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// User may supply the value.
    pub fn optional() -> Self {
        Self {
            optional: true,
            ..Self::default()
        }
    }

    /// Filled in from API responses; users cannot set it.
    pub fn computed() -> Self {
        Self {
            computed: true,
            ..Self::default()
        }
    }
}

/// One declared field, such as a beverage's `name` or `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Value type, serialized as `type`.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Who supplies the value.
    #[serde(flatten)]
    pub flags: AttributeFlags,
    /// Shown to users in generated docs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    /// Field of `attr_type` with no description.
    pub fn new(attr_type: AttributeType, flags: AttributeFlags) -> Self {
        Self {
            attr_type,
            flags,
            description: None,
        }
    }

    /// A text field the user must set, like `name` or `type`.
    pub fn required_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::required())
    }

    /// A text field the user may set, like the provider's `base_url`.
    pub fn optional_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::optional())
    }

    /// A text field read back from the API.
    pub fn computed_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::computed())
    }

    /// An integer the user must set, like the `id` a data source looks up.
    pub fn required_int64() -> Self {
        Self::new(AttributeType::Int64, AttributeFlags::required())
    }

    /// An integer the user may set, like `timeout_secs`.
    pub fn optional_int64() -> Self {
        Self::new(AttributeType::Int64, AttributeFlags::optional())
    }

    /// An integer assigned by the API, like a beverage `id`.
    pub fn computed_int64() -> Self {
        Self::new(AttributeType::Int64, AttributeFlags::computed())
    }

    /// Attach the user-facing description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declared fields of one block: the provider config, the `beverage`
/// resource, or a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Schema {
    /// Bumped when stored beverage state changes shape.
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    /// Fields keyed by name.
    pub attributes: HashMap<String, Attribute>,
    /// Summary of what the block manages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema {
    /// Empty schema at version 0, the only state layout so far.
    pub fn v0() -> Self {
        Self::default()
    }

    /// Declare field `name`, replacing any earlier declaration.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    /// Describe the block as a whole.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declared field `name`, if any.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

/// Everything the provider declares, keyed by type name (`beverage`,
/// `beverages`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderSchema {
    /// The provider block.
    #[serde(default)]
    pub provider: Schema,
    /// Managed resources, currently just `beverage`.
    #[serde(default)]
    pub resources: HashMap<String, Schema>,
    /// Read-only lookups: `beverage` and `beverages`.
    #[serde(default)]
    pub data_sources: HashMap<String, Schema>,
}

impl ProviderSchema {
    /// Nothing declared yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the provider block (`base_url`, `timeout_secs`).
    pub fn with_provider_config(mut self, schema: Schema) -> Self {
        self.provider = schema;
        self
    }

    /// Declare a managed resource type.
    pub fn with_resource(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.resources.insert(name.into(), schema);
        self
    }

    /// Declare a data source type.
    pub fn with_data_source(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.data_sources.insert(name.into(), schema);
        self
    }
}

/// How seriously the host should take a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Configuration was rejected; the provider stays unconfigured.
    Error,
    /// Reported, but configuration goes ahead.
    Warning,
}

/// A problem reported back to the host, optionally pinned to a field such
/// as `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: DiagnosticSeverity,
    /// Short headline, e.g. "Missing Configuration".
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Longer explanation, e.g. why a `base_url` was rejected.
    pub detail: Option<String>,
    /// Name of the offending field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    fn with_severity(severity: DiagnosticSeverity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// An error that blocks configuration.
    pub fn error(summary: impl Into<String>) -> Self {
        Self::with_severity(DiagnosticSeverity::Error, summary)
    }

    /// A non-blocking warning.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self::with_severity(DiagnosticSeverity::Warning, summary)
    }

    /// Attach a longer explanation.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Pin the diagnostic to a field.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// True for [`DiagnosticSeverity::Error`].
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Renders as `[Error] summary: detail (at attribute)`.
impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.severity, self.summary)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        if let Some(attr) = &self.attribute {
            write!(f, " (at {})", attr)?;
        }
        Ok(())
    }
}
