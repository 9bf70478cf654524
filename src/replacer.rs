//! Token substitution for template files.
//! Replacement is literal find-and-replace of `{{TOKEN}}` placeholders;
//! there is deliberately no conditional or loop syntax.

use chrono::{Datelike, Local};
use cruet::Inflector;
use indexmap::IndexMap;

use crate::config::CreateConfig;

/// An insertion-ordered map of token names to replacement strings.
///
/// Token names are fixed identifiers (uppercase-hyphenated or camelCase),
/// never user-supplied free text, so they cannot collide with ordinary
/// template content by accident. Iteration order is the insertion order,
/// which keeps substitution deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    tokens: IndexMap<String, String>,
}

impl Replacements {
    pub fn new() -> Self {
        Self { tokens: IndexMap::new() }
    }

    /// Adds or overwrites a token.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, token: K, value: V) {
        self.tokens.insert(token.into(), value.into());
    }

    /// Builds the replacement map for one scaffolding run.
    ///
    /// The token set is fixed: organization identity, the current calendar
    /// year, the project name, and its camelCase form.
    pub fn from_config(config: &CreateConfig) -> Self {
        let mut replacements = Self::new();
        replacements.set("GIT-ORGANISATION", &config.git_organization);
        replacements.set("ORGANISATION-NAME", &config.organization_name);
        replacements.set("ORGANISATION-EMAIL", &config.organization_email);
        replacements.set("CURRENT-YEAR", Local::now().year().to_string());
        replacements.set("PROJECT-NAME", &config.main_name);
        replacements.set("projectName", config.main_name.to_camel_case());
        replacements
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Replaces every `{{TOKEN}}` occurrence of every mapped token in `text`.
///
/// Pure and total: text without any occurrence is returned unchanged, and
/// placeholder syntax that matches no token is left verbatim rather than
/// treated as an error.
pub fn substitute(text: &str, replacements: &Replacements) -> String {
    replacements.iter().fold(text.to_string(), |out, (token, value)| {
        let needle = ["{{", token, "}}"].concat();
        out.replace(&needle, value)
    })
}

/// Applies [`substitute`] to every string nested inside a JSON value.
///
/// # Note
/// Handles three kinds of values:
/// - Strings: substituted directly
/// - Arrays: each element processed recursively
/// - Objects: each field value processed recursively
///
/// Non-string leaves are returned as-is.
pub fn substitute_value(
    value: &serde_json::Value,
    replacements: &Replacements,
) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(substitute(s, replacements)),
        serde_json::Value::Array(arr) => serde_json::Value::Array(
            arr.iter().map(|item| substitute_value(item, replacements)).collect(),
        ),
        serde_json::Value::Object(obj) => serde_json::Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), substitute_value(v, replacements))).collect(),
        ),
        _ => value.clone(),
    }
}
