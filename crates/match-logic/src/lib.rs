//! Match Logic for Rock, Paper, Anything
//!
//! Core rules for deciding a match between two user-created objects.
//! This crate is compiled to:
//! - Native (for the match session service)
//! - WASM (for resolving matches in a web client)

mod object;
mod graph;
mod resolve;
mod oracle;

#[cfg(feature = "wasm")]
mod wasm;

pub use object::{GameObject, ObjectId};
pub use graph::{Contradiction, GraphChange, GraphError, Relation, RelationshipGraph};
pub use resolve::{resolve, Outcome, ResolveError};
pub use oracle::{
    parse_verdict, ChatCompletionChunk, CompletionParams, CompletionStream, OracleError,
    OracleEvent, TiebreakOracle, TiebreakRequest, TiebreakVerdict, TiebreakWinner,
    DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, DONE_SENTINEL, VERDICT_SEPARATOR,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_escalates_to_oracle() {
        let graph: RelationshipGraph = [
            GameObject::new("rock", "Rock"),
            GameObject::new("lava", "Lava"),
        ]
        .into_iter()
        .collect();

        let rock = ObjectId::from("rock");
        let lava = ObjectId::from("lava");
        assert_eq!(resolve(&rock, &lava, &graph), Ok(Outcome::Tie));

        let request = TiebreakRequest::new(
            &graph.get(&rock).unwrap().name,
            &graph.get(&lava).unwrap().name,
        );
        assert_eq!(request.prompt(), "Rock vs Lava");
    }
}
