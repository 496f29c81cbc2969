use crate::state_machine::{State, Transition};
use petgraph::Direction;
use petgraph::prelude::EdgeRef;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};

/// A directed graph tracking the state evolution of one contract.
///
/// Nodes are the states the contract was observed in, in insertion order
/// (which doubles as display order and index assignment order); edges record
/// re-visits, linking an earlier state to a later state carrying the same
/// name. Duplicate names are allowed to coexist as distinct nodes — only the
/// edge reflects the re-visit.
pub struct StateGraph {
    /// The underlying graph structure. States are never removed, so node
    /// index order is insertion order.
    graph: StableGraph<State, Transition>,

    /// Display name of the graph (the shortened contract address)
    name: String,
}

impl StateGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            graph: StableGraph::new(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Adds a state, assigning it the next index in insertion order.
    pub fn add_state(&mut self, mut state: State) -> NodeIndex {
        state.index = self.graph.node_count();
        self.graph.add_node(state)
    }

    /// Adds a transition edge between two existing states.
    pub fn add_transition(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        label: Option<String>,
    ) -> Option<EdgeIndex> {
        let (from_state, to_state) = (self.graph.node_weight(from)?, self.graph.node_weight(to)?);
        let mut transition = Transition::new(from_state.index, to_state.index);
        if let Some(label) = label {
            transition = transition.with_label(label);
        }
        Some(self.graph.add_edge(from, to, transition))
    }

    /// Find the most recently inserted state carrying this name.
    pub fn last_index_of(&self, name: &str) -> Option<NodeIndex> {
        let mut found = None;
        for idx in self.graph.node_indices() {
            if self
                .graph
                .node_weight(idx)
                .is_some_and(|state| state.name == name)
            {
                found = Some(idx);
            }
        }
        found
    }

    /// Get all states in insertion order
    pub fn states(&self) -> Vec<&State> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Get the most recent state with this name
    pub fn state(&self, name: &str) -> Option<&State> {
        self.last_index_of(name)
            .and_then(|idx| self.graph.node_weight(idx))
    }

    /// Get the state at a given insertion index
    pub fn state_at(&self, index: usize) -> Option<&State> {
        self.graph
            .node_indices()
            .nth(index)
            .and_then(|idx| self.graph.node_weight(idx))
    }

    /// Get outgoing transitions of the most recent state with this name,
    /// paired with their target states
    pub fn transitions(&self, name: &str) -> Vec<(&Transition, &State)> {
        let Some(node_idx) = self.last_index_of(name) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(node_idx, Direction::Outgoing)
            .filter_map(|edge| {
                let target = self.graph.node_weight(edge.target())?;
                Some((edge.weight(), target))
            })
            .collect()
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let revisited = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .count()
                    > 0
            })
            .count();

        GraphStats {
            total_states: self.graph.node_count(),
            total_transitions: self.graph.edge_count(),
            revisited_states: revisited,
        }
    }

    /// Export to DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut dot = format!("digraph \"{}\" {{\n", self.name);
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=filled];\n\n");

        for state in self.states() {
            dot.push_str(&format!(
                "  \"n{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                state.index,
                state.display_short(),
                state.color.to_hex()
            ));
        }

        dot.push('\n');

        for edge_idx in self.graph.edge_indices() {
            if let Some(transition) = self.graph.edge_weight(edge_idx) {
                dot.push_str(&format!(
                    "  \"n{}\" -> \"n{}\" [label=\"{}\"];\n",
                    transition.from,
                    transition.to,
                    transition.display_label()
                ));
            }
        }

        dot.push_str("}\n");
        dot
    }
}

impl std::fmt::Debug for StateGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("StateGraph")
            .field("name", &self.name)
            .field("states", &self.graph.node_count())
            .field("transitions", &self.graph.edge_count())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GraphStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub revisited_states: usize,
}
