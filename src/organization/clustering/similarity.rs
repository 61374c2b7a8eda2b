//! Entity sets and the member distance matrix

use super::MemberId;
use crate::core::{Error, Result};
use rayon::prelude::*;
use std::collections::HashSet;

/// The entities a member is related to, itself included.
///
/// For a method: the method, the fields it accesses and the class methods
/// it invokes. For a field: the field and the class methods accessing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySet {
    member: MemberId,
    entities: HashSet<String>,
}

impl EntitySet {
    pub fn new(member: MemberId) -> Self {
        let entities = HashSet::from([member.key().to_string()]);
        Self { member, entities }
    }

    pub fn insert(&mut self, entity: impl Into<String>) -> bool {
        self.entities.insert(entity.into())
    }

    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entity in entities {
            self.insert(entity);
        }
        self
    }

    pub fn member(&self) -> &MemberId {
        &self.member
    }

    pub fn entities(&self) -> &HashSet<String> {
        &self.entities
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn distance_to(&self, other: &EntitySet) -> f64 {
        jaccard_distance(&self.entities, &other.entities)
    }
}

/// `1 - |a ∩ b| / |a ∪ b|`; two empty sets are treated as unrelated
pub fn jaccard_distance(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 1.0;
    }
    1.0 - intersection as f64 / union as f64
}

/// Symmetric member-to-member distances, zero on the diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Rows are computed in parallel; the result does not depend on
    /// scheduling.
    pub fn from_entity_sets(sets: &[EntitySet]) -> Self {
        let size = sets.len();
        let values: Vec<f64> = sets
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, row)| {
                sets.iter().enumerate().map(move |(j, column)| {
                    if i == j {
                        0.0
                    } else {
                        row.distance_to(column)
                    }
                })
            })
            .collect();
        Self { size, values }
    }

    /// Build from a full row-major table.
    ///
    /// Fails unless every row has one entry per row of the table.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(Error::Validation(format!(
                "distance table is not square: row {index} has {} entries, expected {size}",
                row.len()
            )));
        }
        let values = rows.into_iter().flatten().collect();
        Ok(Self { size, values })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Mean pairwise distance among `members`; 0 for fewer than two
    pub fn mean_distance(&self, members: &[usize]) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for (n, &i) in members.iter().enumerate() {
            for &j in &members[n + 1..] {
                total += self.get(i, j);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn method(key: &str, related: &[&str]) -> EntitySet {
        EntitySet::new(MemberId::Method(key.to_string())).with_entities(related.iter().copied())
    }

    #[test]
    fn test_entity_set_contains_itself() {
        let set = EntitySet::new(MemberId::Field("app.A.x".into()));
        assert!(set.contains("app.A.x"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_jaccard_values() {
        let fun1 = method("fun1", &["a", "b", "c", "outer"]);
        let fun2 = method("fun2", &["d", "e", "outer"]);
        assert!((fun1.distance_to(&fun2) - 0.875).abs() < 1e-12);
        assert_eq!(fun1.distance_to(&fun1), 0.0);

        let empty = HashSet::new();
        assert_eq!(jaccard_distance(&empty, &empty), 1.0);
    }

    #[test]
    fn test_mean_distance() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 0.2, 0.4],
            vec![0.2, 0.0, 0.6],
            vec![0.4, 0.6, 0.0],
        ])
        .unwrap();
        assert!((matrix.mean_distance(&[0, 1, 2]) - 0.4).abs() < 1e-12);
        assert_eq!(matrix.mean_distance(&[1]), 0.0);
    }

    #[test]
    fn test_ragged_table_rejected() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.5]]).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 entries, expected 2"));

        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 0.1, 0.2]]).is_err());
        assert!(DistanceMatrix::from_rows(vec![]).unwrap().is_empty());
    }

    fn entity_sets() -> impl Strategy<Value = Vec<EntitySet>> {
        prop::collection::vec(prop::collection::hash_set("[a-f]", 0..5), 1..8).prop_map(|sets| {
            sets.into_iter()
                .enumerate()
                .map(|(i, related)| {
                    EntitySet::new(MemberId::Method(format!("m{i}"))).with_entities(related)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_matrix_symmetric_and_bounded(sets in entity_sets()) {
            let matrix = DistanceMatrix::from_entity_sets(&sets);
            for i in 0..matrix.len() {
                prop_assert_eq!(matrix.get(i, i), 0.0);
                for j in 0..matrix.len() {
                    let d = matrix.get(i, j);
                    prop_assert!((0.0..=1.0).contains(&d));
                    prop_assert_eq!(d, matrix.get(j, i));
                }
            }
        }

        #[test]
        fn prop_matrix_deterministic(sets in entity_sets()) {
            let first = DistanceMatrix::from_entity_sets(&sets);
            let second = DistanceMatrix::from_entity_sets(&sets);
            prop_assert_eq!(first, second);
        }
    }
}
