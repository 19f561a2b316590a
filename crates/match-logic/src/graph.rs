//! Relationship graph snapshot
//!
//! Lookup table from object id to object. Changes are applied one whole
//! object at a time, so an object's `beats`/`loses_to` pair is never torn.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::object::{GameObject, ObjectId};

/// Errors raised while maintaining a graph snapshot
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("no object with id '{0}' in graph")]
    UnknownObject(ObjectId),

    #[error("invalid graph snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How the graph relates two objects, seen from the first one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// First object wins, recorded from either side
    AWins,
    /// Second object wins, recorded from either side
    BWins,
    /// Both objects are recorded as winning
    Contradictory,
    /// Nothing recorded in either direction
    Unknown,
}

impl Relation {
    /// The same relation seen from the second object
    pub fn swapped(self) -> Self {
        match self {
            Relation::AWins => Relation::BWins,
            Relation::BWins => Relation::AWins,
            other => other,
        }
    }
}

/// A change delivered by a realtime listener
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "object", rename_all = "camelCase")]
pub enum GraphChange {
    Added(GameObject),
    Modified(GameObject),
    Removed(GameObject),
}

/// A pair of objects that both claim victory over the other
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub first: ObjectId,
    pub second: ObjectId,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipGraph {
    objects: HashMap<ObjectId, GameObject>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self { objects: HashMap::new() }
    }

    /// Decode a snapshot given as a JSON array of objects
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let objects: Vec<GameObject> = serde_json::from_str(json)?;
        Ok(objects.into_iter().collect())
    }

    /// Insert or replace an object, returning the previous version
    pub fn insert(&mut self, object: GameObject) -> Option<GameObject> {
        self.objects.insert(object.id.clone(), object)
    }

    pub fn remove(&mut self, id: &ObjectId) -> Option<GameObject> {
        self.objects.remove(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    /// Apply one listener change
    ///
    /// Modifications and removals of objects the snapshot never saw are
    /// rejected so the caller can refetch a full snapshot.
    pub fn apply(&mut self, change: GraphChange) -> Result<(), GraphError> {
        match change {
            GraphChange::Added(object) => {
                self.insert(object);
            }
            GraphChange::Modified(object) => {
                let existing = self
                    .objects
                    .get_mut(&object.id)
                    .ok_or_else(|| GraphError::UnknownObject(object.id.clone()))?;
                existing.update(object);
            }
            GraphChange::Removed(object) => {
                self.remove(&object.id)
                    .ok_or(GraphError::UnknownObject(object.id))?;
            }
        }
        Ok(())
    }

    /// Classify the pairing of two objects present in the graph
    ///
    /// A claim counts from either side: `a.beats ∋ b` or `b.loses_to ∋ a`.
    /// Returns `None` if either id is missing.
    pub fn relation(&self, a: &ObjectId, b: &ObjectId) -> Option<Relation> {
        let obj_a = self.get(a)?;
        let obj_b = self.get(b)?;
        Some(relate(obj_a, obj_b))
    }

    /// Every unordered pair whose records claim mutual victory
    ///
    /// Sorted by id so curation reports are stable.
    pub fn contradictions(&self) -> Vec<Contradiction> {
        let mut found = Vec::new();
        for a in self.objects.values() {
            for b_id in a.beats.iter().chain(a.loses_to.iter()) {
                if b_id == &a.id {
                    continue;
                }
                let Some(b) = self.get(b_id) else { continue };
                if relate(a, b) == Relation::Contradictory {
                    let (first, second) = if a.id < b.id { (a, b) } else { (b, a) };
                    found.push(Contradiction { first: first.id.clone(), second: second.id.clone() });
                }
            }
        }
        found.sort_by(|x, y| (&x.first, &x.second).cmp(&(&y.first, &y.second)));
        found.dedup();
        found
    }
}

impl FromIterator<GameObject> for RelationshipGraph {
    fn from_iter<I: IntoIterator<Item = GameObject>>(iter: I) -> Self {
        let mut graph = Self::new();
        for object in iter {
            graph.insert(object);
        }
        graph
    }
}

fn relate(a: &GameObject, b: &GameObject) -> Relation {
    let a_wins = a.claims_win_over(&b.id) || b.concedes_to(&a.id);
    let b_wins = b.claims_win_over(&a.id) || a.concedes_to(&b.id);
    match (a_wins, b_wins) {
        (true, true) => Relation::Contradictory,
        (true, false) => Relation::AWins,
        (false, true) => Relation::BWins,
        (false, false) => Relation::Unknown,
    }
}
