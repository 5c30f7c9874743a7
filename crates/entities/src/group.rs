//! Partitioning of a representation batch by typename.

use indexmap::IndexMap;
use keyway_types::Representation;

/// Representations sharing one typename, with their positions in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionGroup {
    typename: String,
    references: Vec<Representation>,
    indices: Vec<usize>,
}

impl ResolutionGroup {
    fn new(typename: String) -> Self {
        Self {
            typename,
            references: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn typename(&self) -> &str {
        &self.typename
    }

    pub fn references(&self) -> &[Representation] {
        &self.references
    }

    /// Original input positions, parallel to [`references`](Self::references).
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_parts(self) -> (String, Vec<Representation>, Vec<usize>) {
        (self.typename, self.references, self.indices)
    }
}

/// Groups representations by typename.
///
/// Groups come out in the order their typename was first seen, and members
/// keep their input order inside each group.
pub fn group_representations(representations: Vec<Representation>) -> Vec<ResolutionGroup> {
    let mut groups: IndexMap<String, ResolutionGroup> = IndexMap::new();
    for (index, representation) in representations.into_iter().enumerate() {
        let group = groups
            .entry(representation.typename().to_string())
            .or_insert_with_key(|typename| ResolutionGroup::new(typename.clone()));
        group.references.push(representation);
        group.indices.push(index);
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_typename_in_first_seen_order() {
        let groups = group_representations(vec![
            Representation::new("Review").with_field("id", "r1"),
            Representation::new("Product").with_field("upc", "1"),
            Representation::new("Review").with_field("id", "r2"),
            Representation::new("Product").with_field("upc", "2"),
            Representation::new("User").with_field("id", "u1"),
        ]);

        let typenames: Vec<_> = groups.iter().map(ResolutionGroup::typename).collect();
        assert_eq!(typenames, vec!["Review", "Product", "User"]);
        assert_eq!(groups[0].indices(), &[0, 2]);
        assert_eq!(groups[1].indices(), &[1, 3]);
        assert_eq!(groups[2].indices(), &[4]);
        assert_eq!(groups[0].references()[1].get("id"), Some(&serde_json::json!("r2")));
    }

    #[test]
    fn empty_batch_has_no_groups() {
        assert!(group_representations(Vec::new()).is_empty());
    }
}
