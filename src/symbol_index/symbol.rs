//! Symbol records and index entries
//!
//! `SymbolRecord` is what the documentation generator hands us; `IndexEntry`
//! is what ends up stored under a normalized key.

use serde::{Deserialize, Serialize};

/// Kinds of documented entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    EnumValue,
    Function,
    Variable,
    Typedef,
    Define,
    Concept,
    File,
    Page,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Union => "union",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumValue => "enum_value",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Typedef => "typedef",
            SymbolKind::Define => "define",
            SymbolKind::Concept => "concept",
            SymbolKind::File => "file",
            SymbolKind::Page => "page",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SymbolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "namespace" => Ok(SymbolKind::Namespace),
            "class" => Ok(SymbolKind::Class),
            "struct" => Ok(SymbolKind::Struct),
            "union" => Ok(SymbolKind::Union),
            "enum" => Ok(SymbolKind::Enum),
            "enum_value" => Ok(SymbolKind::EnumValue),
            "function" => Ok(SymbolKind::Function),
            "variable" => Ok(SymbolKind::Variable),
            "typedef" => Ok(SymbolKind::Typedef),
            "define" => Ok(SymbolKind::Define),
            "concept" => Ok(SymbolKind::Concept),
            "file" => Ok(SymbolKind::File),
            "page" => Ok(SymbolKind::Page),
            _ => Err(format!("Unknown symbol kind: {}", s)),
        }
    }
}

/// A symbol as extracted by the documentation generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Name as written in the source (may carry scope, template args or parameters)
    pub raw_name: String,
    pub kind: SymbolKind,
    /// Enclosing namespaces/classes, outermost first
    #[serde(default)]
    pub scope_path: Vec<String>,
    /// Anchor or URL of the symbol's documentation; never interpreted
    pub locator: String,
    /// Parameter list, used to tell overloads apart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl SymbolRecord {
    pub fn new(raw_name: &str, kind: SymbolKind, scope_path: &[&str], locator: &str) -> Self {
        Self {
            raw_name: raw_name.to_string(),
            kind,
            scope_path: scope_path.iter().map(|s| s.to_string()).collect(),
            locator: locator.to_string(),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }
}

/// One occurrence stored under an index key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub display_name: String,
    pub scope_path: Vec<String>,
    pub kind: SymbolKind,
    pub locator: String,
    /// Template arguments of a specialization, e.g. `<nlohmann::basic_json>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Set only when the key holds more than one entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguator: Option<String>,
}

impl IndexEntry {
    /// Identity used for duplicate detection within a key
    pub(crate) fn identity(&self) -> (&[String], SymbolKind, &str) {
        (&self.scope_path, self.kind, &self.locator)
    }

    /// Scope path joined the way it is shown to users
    pub fn qualified_scope(&self) -> String {
        if self.scope_path.is_empty() {
            "(global)".to_string()
        } else {
            self.scope_path.join("::")
        }
    }
}
