//! Match resolution engine

use serde::{Deserialize, Serialize};

use crate::graph::{Relation, RelationshipGraph};
use crate::object::ObjectId;

/// Verdict for a pair of selections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Selection A wins
    A,
    /// Selection B wins
    B,
    /// Undecided: same object, nothing recorded, or contradictory records
    Tie,
}

impl Outcome {
    /// The same verdict with the two selection slots exchanged
    pub fn swapped(self) -> Self {
        match self {
            Outcome::A => Outcome::B,
            Outcome::B => Outcome::A,
            Outcome::Tie => Outcome::Tie,
        }
    }

    pub fn is_tie(self) -> bool {
        self == Outcome::Tie
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("selection '{0}' is not in the relationship graph")]
    InvalidSelection(ObjectId),
}

/// Decide a match from two selections and a graph snapshot
///
/// Order of checks:
/// 1. both ids must be present in `graph`
/// 2. the same object on both sides is a tie
/// 3. a claim recorded from either side decides the match
/// 4. claims in both directions are a tie, never adjudicated
/// 5. nothing recorded is a tie for the tiebreak oracle
///
/// Pure: no logging, no mutation, same inputs always give the same outcome.
pub fn resolve(
    selection_a: &ObjectId,
    selection_b: &ObjectId,
    graph: &RelationshipGraph,
) -> Result<Outcome, ResolveError> {
    if !graph.contains(selection_a) {
        return Err(ResolveError::InvalidSelection(selection_a.clone()));
    }
    if !graph.contains(selection_b) {
        return Err(ResolveError::InvalidSelection(selection_b.clone()));
    }

    if selection_a == selection_b {
        return Ok(Outcome::Tie);
    }

    let relation = graph
        .relation(selection_a, selection_b)
        .ok_or_else(|| ResolveError::InvalidSelection(selection_a.clone()))?;

    Ok(match relation {
        Relation::AWins => Outcome::A,
        Relation::BWins => Outcome::B,
        Relation::Contradictory | Relation::Unknown => Outcome::Tie,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::GameObject;
    use proptest::prelude::*;

    fn id(s: &str) -> ObjectId {
        ObjectId::from(s)
    }

    fn classic() -> RelationshipGraph {
        [
            GameObject::new("rock", "Rock").beating("scissors"),
            GameObject::new("scissors", "Scissors").beating("paper"),
            GameObject::new("paper", "Paper").beating("rock"),
            GameObject::new("lava", "Lava"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_rock_paper_scissors_cycle() {
        let graph = classic();

        assert_eq!(resolve(&id("rock"), &id("scissors"), &graph), Ok(Outcome::A));
        assert_eq!(resolve(&id("scissors"), &id("rock"), &graph), Ok(Outcome::B));
        assert_eq!(resolve(&id("rock"), &id("paper"), &graph), Ok(Outcome::B));
        assert_eq!(resolve(&id("paper"), &id("scissors"), &graph), Ok(Outcome::B));
    }

    #[test]
    fn test_unknown_pairing_is_tie() {
        let graph = classic();
        assert_eq!(resolve(&id("rock"), &id("lava"), &graph), Ok(Outcome::Tie));
        assert_eq!(resolve(&id("lava"), &id("rock"), &graph), Ok(Outcome::Tie));
    }

    #[test]
    fn test_self_selection_is_tie() {
        let mut graph = classic();
        // even an object recorded as beating itself cannot win against itself
        graph.insert(GameObject::new("ouroboros", "Ouroboros").beating("ouroboros"));

        assert_eq!(resolve(&id("rock"), &id("rock"), &graph), Ok(Outcome::Tie));
        assert_eq!(resolve(&id("ouroboros"), &id("ouroboros"), &graph), Ok(Outcome::Tie));
    }

    #[test]
    fn test_loses_to_side_decides() {
        let graph: RelationshipGraph = [
            GameObject::new("rock", "Rock"),
            GameObject::new("sponge", "Sponge").losing_to("rock"),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolve(&id("rock"), &id("sponge"), &graph), Ok(Outcome::A));
        assert_eq!(resolve(&id("sponge"), &id("rock"), &graph), Ok(Outcome::B));
    }

    #[test]
    fn test_redundant_curation_still_wins() {
        let graph: RelationshipGraph = [
            GameObject::new("rock", "Rock").beating("scissors"),
            GameObject::new("scissors", "Scissors").losing_to("rock"),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolve(&id("rock"), &id("scissors"), &graph), Ok(Outcome::A));
    }

    #[test]
    fn test_contradiction_is_tie() {
        let graph: RelationshipGraph = [
            GameObject::new("rock", "Rock").beating("lava"),
            GameObject::new("lava", "Lava").beating("rock"),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolve(&id("rock"), &id("lava"), &graph), Ok(Outcome::Tie));
        assert_eq!(resolve(&id("lava"), &id("rock"), &graph), Ok(Outcome::Tie));
    }

    #[test]
    fn test_invalid_selection() {
        let graph = classic();

        assert_eq!(
            resolve(&id("unknown-id"), &id("rock"), &graph),
            Err(ResolveError::InvalidSelection(id("unknown-id")))
        );
        assert_eq!(
            resolve(&id("rock"), &id("unknown-id"), &graph),
            Err(ResolveError::InvalidSelection(id("unknown-id")))
        );
        // checked before the self-selection rule
        assert_eq!(
            resolve(&id("ghost"), &id("ghost"), &graph),
            Err(ResolveError::InvalidSelection(id("ghost")))
        );
    }

    #[test]
    fn test_outcome_swapped() {
        assert_eq!(Outcome::A.swapped(), Outcome::B);
        assert_eq!(Outcome::B.swapped(), Outcome::A);
        assert_eq!(Outcome::Tie.swapped(), Outcome::Tie);
        assert!(Outcome::Tie.is_tie());
    }

    const POOL: usize = 6;

    /// Random graphs over a fixed pool of ids, edges chosen independently
    fn graph_strategy() -> impl Strategy<Value = RelationshipGraph> {
        let edges = proptest::collection::vec(any::<bool>(), POOL * POOL * 2);
        edges.prop_map(|bits| {
            (0..POOL)
                .map(|i| {
                    let mut object = GameObject::new(format!("obj-{i}"), format!("Object {i}"));
                    for j in 0..POOL {
                        if bits[(i * POOL + j) * 2] {
                            object.beats.insert(ObjectId::new(format!("obj-{j}")));
                        }
                        if bits[(i * POOL + j) * 2 + 1] {
                            object.loses_to.insert(ObjectId::new(format!("obj-{j}")));
                        }
                    }
                    object
                })
                .collect()
        })
    }

    fn pick() -> impl Strategy<Value = ObjectId> {
        (0..POOL).prop_map(|i| ObjectId::new(format!("obj-{i}")))
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn prop_self_selection_always_ties(graph in graph_strategy(), x in pick()) {
            prop_assert_eq!(resolve(&x, &x, &graph), Ok(Outcome::Tie));
        }

        #[test]
        fn prop_symmetric_winner(graph in graph_strategy(), a in pick(), b in pick()) {
            let forward = resolve(&a, &b, &graph).unwrap();
            let backward = resolve(&b, &a, &graph).unwrap();
            prop_assert_eq!(forward.swapped(), backward);
        }

        #[test]
        fn prop_deterministic(graph in graph_strategy(), a in pick(), b in pick()) {
            prop_assert_eq!(resolve(&a, &b, &graph), resolve(&a, &b, &graph));
        }

        #[test]
        fn prop_mutual_beats_ties(graph in graph_strategy(), a in pick(), b in pick()) {
            let mut graph = graph;
            graph.get_mut(&a).unwrap().beats.insert(b.clone());
            graph.get_mut(&b).unwrap().beats.insert(a.clone());
            prop_assert_eq!(resolve(&a, &b, &graph), Ok(Outcome::Tie));
        }

        #[test]
        fn prop_uncontested_beat_wins(
            graph in graph_strategy(),
            a in pick(),
            b in pick(),
            redundant in any::<bool>(),
        ) {
            prop_assume!(a != b);
            let mut graph = graph;
            {
                let obj_a = graph.get_mut(&a).unwrap();
                obj_a.beats.insert(b.clone());
                obj_a.loses_to.remove(&b);
            }
            {
                let obj_b = graph.get_mut(&b).unwrap();
                obj_b.beats.remove(&a);
                if redundant {
                    obj_b.loses_to.insert(a.clone());
                } else {
                    obj_b.loses_to.remove(&a);
                }
            }
            prop_assert_eq!(resolve(&a, &b, &graph), Ok(Outcome::A));
            prop_assert_eq!(resolve(&b, &a, &graph), Ok(Outcome::B));
        }

        #[test]
        fn prop_no_records_ties(graph in graph_strategy(), a in pick(), b in pick()) {
            let mut graph = graph;
            {
                let obj_a = graph.get_mut(&a).unwrap();
                obj_a.beats.remove(&b);
                obj_a.loses_to.remove(&b);
            }
            {
                let obj_b = graph.get_mut(&b).unwrap();
                obj_b.beats.remove(&a);
                obj_b.loses_to.remove(&a);
            }
            prop_assert_eq!(resolve(&a, &b, &graph), Ok(Outcome::Tie));
        }
    }
}
