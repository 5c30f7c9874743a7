//! `@key(fields: ...)` metadata attached to entity types.

use std::fmt;

/// A key field selection such as `"id"` or `"id organization { id }"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyFields {
    selection: String,
}

impl KeyFields {
    /// Creates a key from a selection set string, collapsing whitespace.
    pub fn new(selection: impl AsRef<str>) -> Self {
        let selection = selection.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        Self { selection }
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Field names at the outermost level of the selection.
    ///
    /// For `"id organization { id slug }"` this yields `["id", "organization"]`.
    pub fn top_level_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        let mut depth = 0usize;
        let mut start: Option<usize> = None;

        for (index, ch) in self.selection.char_indices() {
            if ch.is_alphanumeric() || ch == '_' {
                start.get_or_insert(index);
                continue;
            }
            if let Some(begin) = start.take()
                && depth == 0
            {
                fields.push(&self.selection[begin..index]);
            }
            match ch {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if let Some(begin) = start
            && depth == 0
        {
            fields.push(&self.selection[begin..]);
        }
        fields
    }

    /// Renders the federation directive, e.g. `@key(fields: "id")`.
    pub fn directive(&self) -> String {
        format!("@key(fields: \"{}\")", self.selection)
    }
}

impl From<&str> for KeyFields {
    fn from(selection: &str) -> Self {
        Self::new(selection)
    }
}

impl fmt::Display for KeyFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_fields_skip_nested_selections() {
        let key = KeyFields::new("id organization { id slug } region");
        assert_eq!(key.top_level_fields(), vec!["id", "organization", "region"]);
    }

    #[test]
    fn top_level_fields_handle_tight_braces() {
        let key = KeyFields::new("owner{id}sku");
        assert_eq!(key.top_level_fields(), vec!["owner", "sku"]);
    }

    #[test]
    fn directive_collapses_whitespace() {
        let key = KeyFields::new("  id\n   upc ");
        assert_eq!(key.directive(), "@key(fields: \"id upc\")");
    }
}
