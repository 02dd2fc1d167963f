//! Common types used throughout Slugroute

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Primary key of a content entity
pub type EntityId = i64;

/// A row returned by the data store, keyed by column name
pub type Row = serde_json::Map<String, Value>;

/// Rule tags (e.g. `lang => "en"`), used to pick among variants of one controller
pub type Tags = BTreeMap<String, String>;

/// Caller-supplied field values for reverse building
pub type FieldValues = BTreeMap<String, Value>;

/// Default name of the identifier field
pub const DEFAULT_ID_FIELD: &str = "id";

/// Default name of the precomputed length column on length-indexed tables
pub const DEFAULT_LENGTH_COLUMN: &str = "zk_char_length";

/// One level of a category chain
///
/// `link_field` is the column on the child row (the next level down, or the
/// element itself for the innermost level) that holds the parent's
/// `id_field` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Identifier column of the parent table
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Parent table
    pub table: String,

    /// Column on the child row pointing to the parent
    pub link_field: String,
}

impl ParentLink {
    /// Create a link using the default identifier column
    pub fn new(table: impl Into<String>, link_field: impl Into<String>) -> Self {
        Self {
            id_field: default_id_field(),
            table: table.into(),
            link_field: link_field.into(),
        }
    }
}

/// Options of a single rule
///
/// Every recognized option is listed here; defaults are applied when the
/// struct is built or deserialized, never at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOptions {
    /// Logical id field referenced by identifier placeholders
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Backing table
    #[serde(default)]
    pub table: Option<String>,

    /// Backing content-entity key
    #[serde(default)]
    pub element: Option<String>,

    /// Category chain, root first
    #[serde(default)]
    pub parent_chain: Vec<ParentLink>,

    /// Tags used to select among variants of the same controller
    #[serde(default)]
    pub tags: Tags,

    /// Case-fold generated URL words
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,

    /// Literal path token meaning "no value"
    #[serde(default)]
    pub null_token: String,

    /// Substitute field values as-is, skipping the word encoder
    #[serde(default)]
    pub dont_encode: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            table: None,
            element: None,
            parent_chain: Vec::new(),
            tags: Tags::new(),
            lowercase: default_lowercase(),
            null_token: String::new(),
            dont_encode: false,
        }
    }
}

impl RuleOptions {
    /// Set the id field
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Set the backing table
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the backing element key
    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Append a category level (root first)
    pub fn parent(mut self, link: ParentLink) -> Self {
        self.parent_chain.push(link);
        self
    }

    /// Add a tag
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Set case folding of generated words
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Set the null token
    pub fn null_token(mut self, token: impl Into<String>) -> Self {
        self.null_token = token.into();
        self
    }

    /// Disable word encoding of substituted values
    pub fn dont_encode(mut self, dont_encode: bool) -> Self {
        self.dont_encode = dont_encode;
        self
    }
}

/// Router-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Tables carrying a precomputed character-length column
    #[serde(default)]
    pub char_length_indexed: Vec<String>,

    /// Name of the precomputed length column
    #[serde(default = "default_length_column")]
    pub length_column: String,

    /// Language tag applied to reverse builds that do not carry one
    #[serde(default)]
    pub default_lang: Option<String>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            char_length_indexed: Vec::new(),
            length_column: default_length_column(),
            default_lang: None,
        }
    }
}

impl RouterSettings {
    /// Does this table carry the precomputed length column?
    pub fn is_length_indexed(&self, table: &str) -> bool {
        self.char_length_indexed.iter().any(|t| t == table)
    }
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

fn default_lowercase() -> bool {
    true
}

fn default_length_column() -> String {
    DEFAULT_LENGTH_COLUMN.to_string()
}

/// Interpret a stored value as an entity id
///
/// Numbers and numeric strings are accepted; anything else (including
/// `null`) yields `None`.
pub fn value_to_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text form of a stored value, as substituted into a URL
///
/// Only strings and numbers have a text form.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
