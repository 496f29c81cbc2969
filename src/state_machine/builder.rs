//! Graph construction from the correlation feed
//!
//! Consumes the ordered change records of a storage report together with the
//! function list reconstructed from the trace, producing one state graph per
//! contract address. Feed order is semantically significant: it is the only
//! chronology shared across contracts, and re-visit edges depend on it.

use crate::ingest::ChangeRecord;
use crate::state_machine::{Palette, State, StateGraph};
use crate::trace_source::Function;
use crate::{Error, Result};
use std::collections::HashMap;

/// Builds per-contract state graphs from an ordered correlation feed
pub struct GraphBuilder<'a> {
    palette: &'a Palette,
    functions: &'a [Function],
}

impl<'a> GraphBuilder<'a> {
    pub fn new(palette: &'a Palette, functions: &'a [Function]) -> Self {
        Self { palette, functions }
    }

    /// Process the whole feed, in order
    ///
    /// The first bad record fails the pass: a missing `address`, `key`,
    /// `node_idx` or `step_idx` is a [`Error::MalformedRecord`], a
    /// `node_idx` outside the function list an [`Error::UnresolvedReference`].
    /// Nothing is committed on failure — the caller receives either the
    /// complete graph map or the error, so a failed pass cannot leave
    /// partial graphs behind.
    pub fn build(&self, records: &[ChangeRecord]) -> Result<HashMap<String, StateGraph>> {
        let mut graphs: HashMap<String, StateGraph> = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            self.apply_record(&mut graphs, position, record)?;
        }

        tracing::debug!("Built {} state graphs from {} records", graphs.len(), records.len());
        Ok(graphs)
    }

    fn apply_record(
        &self,
        graphs: &mut HashMap<String, StateGraph>,
        position: usize,
        record: &ChangeRecord,
    ) -> Result<()> {
        let address = record
            .address()
            .ok_or_else(|| Error::malformed_record(position, "missing field \"address\""))?;
        let key = record
            .key()
            .ok_or_else(|| Error::malformed_record(position, "missing field \"key\""))?;
        let node_idx = record
            .node_idx()
            .ok_or_else(|| Error::malformed_record(position, "missing field \"node_idx\""))?;
        let step_idx = record
            .step_idx()
            .ok_or_else(|| Error::malformed_record(position, "missing field \"step_idx\""))?;

        let function = self
            .functions
            .get(node_idx)
            .ok_or(Error::UnresolvedReference {
                record: position,
                index: node_idx,
                available: self.functions.len(),
            })?;

        let graph_name = shorten(&address);
        let graph = graphs
            .entry(graph_name.clone())
            .or_insert_with(|| StateGraph::new(graph_name));

        let tooltip: String = record
            .fields()
            .map(|(k, v)| format!("{}\t{}\n", k, v))
            .collect();

        let candidate = State::new(
            shorten(&key),
            self.palette.color_for(step_idx),
            function.start,
            function.end,
        )
        .with_tooltip(tooltip);

        // A state sharing its name with an earlier one is a re-visit; the
        // edge runs from the most recent namesake to the new node. The new
        // node is appended either way.
        let revisited = graph.last_index_of(&candidate.name);
        let node = graph.add_state(candidate);
        if let Some(earlier) = revisited {
            graph.add_transition(earlier, node, record.label());
        }

        Ok(())
    }
}

/// Shortens a string for display, keeping the first 4 and last 3 characters.
///
/// Operates on characters, not bytes; feed data is arbitrary text.
pub fn shorten(s: &str) -> String {
    let count = s.chars().count();
    if count <= 7 {
        return s.to_string();
    }
    let start: String = s.chars().take(4).collect();
    let end: String = s.chars().skip(count - 3).collect();
    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::feed::parse_feed;
    use crate::state_machine::palette::PALETTE;

    fn functions() -> Vec<Function> {
        vec![
            Function {
                index: 0,
                lane: 1,
                start: 0,
                end: Some(20),
            },
            Function {
                index: 1,
                lane: 1,
                start: 5,
                end: Some(10),
            },
            Function {
                index: 2,
                lane: 2,
                start: 8,
                end: Some(15),
            },
        ]
    }

    fn records(json: &str) -> Vec<ChangeRecord> {
        parse_feed(json).unwrap()
    }

    #[test]
    fn test_revisit_builds_transition_edge() {
        let palette = Palette::new();
        let functions = functions();
        let builder = GraphBuilder::new(&palette, &functions);

        let graphs = builder
            .build(&records(
                r#"{"sequential_changes": [
                    {"address": "0xABCDEFG", "key": "Locked", "node_idx": 0, "step_idx": 0},
                    {"address": "0xABCDEFG", "key": "Unlocked", "node_idx": 1, "step_idx": 1},
                    {"address": "0xABCDEFG", "key": "Locked", "node_idx": 2, "step_idx": 2}
                ]}"#,
            ))
            .unwrap();

        assert_eq!(graphs.len(), 1);
        let graph = &graphs["0xAB...EFG"];

        // Duplicates coexist as distinct nodes; one edge records the re-visit
        assert_eq!(graph.len(), 3);
        let stats = graph.stats();
        assert_eq!(stats.total_transitions, 1);

        let outgoing = graph.transitions("Locked");
        assert!(outgoing.is_empty(), "edge starts at the first Locked node");
        let first = graph.state_at(0).unwrap();
        assert_eq!(first.name, "Locked");

        // The edge runs from node 0 to node 2
        let states = graph.states();
        assert_eq!(states[2].name, "Locked");
        assert_eq!(states[2].start, 8);
        assert_eq!(states[2].end, Some(15));
    }

    #[test]
    fn test_state_takes_function_interval_and_step_color() {
        let palette = Palette::new();
        let functions = functions();
        let builder = GraphBuilder::new(&palette, &functions);

        let graphs = builder
            .build(&records(
                r#"{"sequential_changes": [
                    {"address": "0xA", "key": "Locked", "node_idx": 1, "step_idx": 4}
                ]}"#,
            ))
            .unwrap();

        let state = graphs["0xA"].state("Locked").unwrap();
        assert_eq!(state.start, 5);
        assert_eq!(state.end, Some(10));
        assert_eq!(state.color, PALETTE[0]);
        // Same step index keeps its color, a new one advances the cursor
        assert_eq!(palette.color_for(4), PALETTE[0]);
        assert_eq!(palette.color_for(5), PALETTE[1]);
    }

    #[test]
    fn test_tooltip_lists_fields_in_feed_order() {
        let palette = Palette::new();
        let functions = functions();
        let builder = GraphBuilder::new(&palette, &functions);

        let graphs = builder
            .build(&records(
                r#"{"sequential_changes": [
                    {"step_idx": 0, "address": "0xA", "key": "k", "node_idx": 0, "value_after": "12"}
                ]}"#,
            ))
            .unwrap();

        let state = graphs["0xA"].state("k").unwrap();
        assert_eq!(
            state.tooltip,
            "step_idx\t0\naddress\t0xA\nkey\tk\nnode_idx\t0\nvalue_after\t12\n"
        );
    }

    #[test]
    fn test_unresolved_function_reference() {
        let palette = Palette::new();
        let functions = functions();
        let builder = GraphBuilder::new(&palette, &functions);

        let err = builder
            .build(&records(
                r#"{"sequential_changes": [
                    {"address": "0xA", "key": "k", "node_idx": 99, "step_idx": 0}
                ]}"#,
            ))
            .unwrap_err();

        match err {
            Error::UnresolvedReference {
                record,
                index,
                available,
            } => {
                assert_eq!(record, 0);
                assert_eq!(index, 99);
                assert_eq!(available, 3);
            }
            other => panic!("expected UnresolvedReference, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let palette = Palette::new();
        let functions = functions();
        let builder = GraphBuilder::new(&palette, &functions);

        let err = builder
            .build(&records(
                r#"{"sequential_changes": [
                    {"address": "0xA", "node_idx": 0, "step_idx": 0}
                ]}"#,
            ))
            .unwrap_err();

        match err {
            Error::MalformedRecord { record, message } => {
                assert_eq!(record, 0);
                assert!(message.contains("key"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_graphs_scoped_per_address() {
        let palette = Palette::new();
        let functions = functions();
        let builder = GraphBuilder::new(&palette, &functions);

        // Same state name on two contracts must not link across graphs
        let graphs = builder
            .build(&records(
                r#"{"sequential_changes": [
                    {"address": "0xA", "key": "Locked", "node_idx": 0, "step_idx": 0},
                    {"address": "0xB", "key": "Locked", "node_idx": 1, "step_idx": 1}
                ]}"#,
            ))
            .unwrap();

        assert_eq!(graphs.len(), 2);
        assert_eq!(graphs["0xA"].stats().total_transitions, 0);
        assert_eq!(graphs["0xB"].stats().total_transitions, 0);
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("0xABCDEFG"), "0xAB...EFG");
        assert_eq!(shorten("short"), "short");
        assert_eq!(shorten("exact7c"), "exact7c");
        assert_eq!(shorten("0x123456789abcdef"), "0x12...def");
    }

    #[test]
    fn test_shorten_counts_characters_not_bytes() {
        // 5 chars but 15 bytes; must come back untouched
        assert_eq!(shorten("あいうえお"), "あいうえお");
        // 8 chars, all multi-byte
        assert_eq!(shorten("あいうえおかきく"), "あいうえ...かきく");
        // Mixed: a byte-based slice at len-3 would land inside 'ñ'
        assert_eq!(shorten("0xéêëìíîïñò"), "0xéê...ïñò");
    }

    #[test]
    fn test_multibyte_feed_names_build_cleanly() {
        let palette = Palette::new();
        let functions = functions();
        let builder = GraphBuilder::new(&palette, &functions);

        let graphs = builder
            .build(&records(
                r#"{"sequential_changes": [
                    {"address": "контракт-хранилище", "key": "заблокировано", "node_idx": 0, "step_idx": 0},
                    {"address": "контракт-хранилище", "key": "заблокировано", "node_idx": 1, "step_idx": 1}
                ]}"#,
            ))
            .unwrap();

        let graph = &graphs[&shorten("контракт-хранилище")];
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.stats().total_transitions, 1);
    }
}
