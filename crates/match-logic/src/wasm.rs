//! WASM bindings for resolving matches in a web client

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{parse_verdict, resolve, ObjectId, Outcome, Relation, RelationshipGraph};

fn parse_graph(graph_json: &str) -> Result<RelationshipGraph, JsError> {
    RelationshipGraph::from_json(graph_json)
        .map_err(|e| JsError::new(&format!("Invalid graph: {}", e)))
}

#[derive(serde::Serialize)]
struct Resolution {
    outcome: Outcome,
    relation: Option<Relation>,
    /// True when the caller should ask the tiebreak oracle
    escalate: bool,
}

/// Resolve a match from two selected object ids
///
/// # Arguments
/// * `graph_json` - JSON array of objects (the relationship graph snapshot)
/// * `selection_a` - Object id picked by the match creator
/// * `selection_b` - Object id picked by the opponent
///
/// # Returns
/// `{outcome, relation, escalate}`; throws if either id is not in the graph
#[wasm_bindgen]
pub fn resolve_selections(
    graph_json: &str,
    selection_a: &str,
    selection_b: &str,
) -> Result<JsValue, JsError> {
    let graph = parse_graph(graph_json)?;
    let a = ObjectId::from(selection_a);
    let b = ObjectId::from(selection_b);

    let outcome = resolve(&a, &b, &graph)
        .map_err(|e| JsError::new(&e.to_string()))?;
    let relation = if a == b { None } else { graph.relation(&a, &b) };

    let result = Resolution { outcome, relation, escalate: outcome.is_tie() && a != b };
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Parse a finished tiebreak completion
///
/// Returns the verdict, or `null` if the text does not name a winner.
/// Never throws.
#[wasm_bindgen]
pub fn parse_tiebreak(text: &str, name_a: &str, name_b: &str) -> JsValue {
    match parse_verdict(text, name_a, name_b) {
        Some(verdict) => serde_wasm_bindgen::to_value(&verdict).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

/// List every pair of objects whose records claim mutual victory
#[wasm_bindgen]
pub fn audit_graph(graph_json: &str) -> Result<JsValue, JsError> {
    let graph = parse_graph(graph_json)?;

    serde_wasm_bindgen::to_value(&graph.contradictions())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
