//! Clamp reference graph module.
//!
//! Min/max references let attributes form an arbitrary directed graph,
//! cycles included. `ClampGraph` is built on demand from an
//! `AttributeSet` to validate that graph or to order recalculation so
//! bounds are computed before the attributes they clamp.

use crate::attribute_id::AttributeId;
use crate::error::AttributeError;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// A directed graph of clamp references.
///
/// An edge `bound → attribute` means `attribute` reads `bound`'s final
/// value when it is calculated.
///
/// # Examples
///
/// ```rust
/// use attrkit::graph::ClampGraph;
/// use attrkit::AttributeId;
///
/// let mut graph = ClampGraph::new();
/// let hp = AttributeId::from_str("Health");
/// let max_hp = AttributeId::from_str("MaxHealth");
///
/// // Health is clamped by MaxHealth
/// graph.add_edge(hp.clone(), max_hp.clone());
///
/// let order = graph.topological_sort().unwrap();
/// let max_pos = order.iter().position(|a| a == &max_hp).unwrap();
/// let hp_pos = order.iter().position(|a| a == &hp).unwrap();
/// assert!(max_pos < hp_pos);
/// ```
pub struct ClampGraph {
    graph: DiGraph<AttributeId, ()>,
    node_map: HashMap<AttributeId, NodeIndex>,
}

impl ClampGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a node if it doesn't exist and return its index.
    pub fn add_node(&mut self, id: AttributeId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&id) {
            idx
        } else {
            let idx = self.graph.add_node(id.clone());
            self.node_map.insert(id, idx);
            idx
        }
    }

    /// Record that `attribute` is clamped by `bound`.
    ///
    /// Both nodes are added if missing.
    pub fn add_edge(&mut self, attribute: AttributeId, bound: AttributeId) {
        let attribute_idx = self.add_node(attribute);
        let bound_idx = self.add_node(bound);
        self.graph.add_edge(bound_idx, attribute_idx, ());
    }

    /// Detect cycles in the graph.
    ///
    /// Returns `Err(AttributeError::Cycle)` naming one cycle, closed by
    /// repeating its first attribute. When several strongly connected
    /// components are cyclic, the one holding the alphabetically smallest
    /// attribute is reported.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use attrkit::graph::ClampGraph;
    /// use attrkit::AttributeId;
    ///
    /// let mut graph = ClampGraph::new();
    /// let a = AttributeId::from_str("A");
    /// let b = AttributeId::from_str("B");
    ///
    /// graph.add_edge(a.clone(), b.clone());
    /// assert!(graph.detect_cycles().is_ok());
    ///
    /// // A clamps B and B clamps A
    /// graph.add_edge(b.clone(), a.clone());
    /// assert!(graph.detect_cycles().is_err());
    /// ```
    pub fn detect_cycles(&self) -> Result<(), AttributeError> {
        let cyclic = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .min_by(|a, b| {
                let a = self.first_by_name(a.iter().copied()).map(|idx| &self.graph[idx]);
                let b = self.first_by_name(b.iter().copied()).map(|idx| &self.graph[idx]);
                a.cmp(&b)
            });

        match cyclic {
            Some(component) => Err(AttributeError::Cycle {
                path: self.cycle_in(&component),
            }),
            None => Ok(()),
        }
    }

    /// Walk a strongly connected component until a node repeats.
    ///
    /// Every node of a cyclic component has a successor inside it, so the
    /// walk always closes.
    fn cycle_in(&self, component: &[NodeIndex]) -> Vec<AttributeId> {
        let members: HashSet<NodeIndex> = component.iter().copied().collect();
        let mut walk: Vec<NodeIndex> = Vec::new();
        let mut current = self.first_by_name(component.iter().copied());

        while let Some(node) = current {
            if let Some(start) = walk.iter().position(|&seen| seen == node) {
                walk.drain(..start);
                walk.push(node);
                break;
            }
            walk.push(node);
            current = self.first_by_name(
                self.graph
                    .neighbors(node)
                    .filter(|next| members.contains(next)),
            );
        }

        walk.into_iter().map(|idx| self.graph[idx].clone()).collect()
    }

    fn first_by_name(&self, nodes: impl Iterator<Item = NodeIndex>) -> Option<NodeIndex> {
        nodes.min_by(|a, b| self.graph[*a].cmp(&self.graph[*b]))
    }

    /// Order attributes so every bound comes before what it clamps.
    pub fn topological_sort(&self) -> Result<Vec<AttributeId>, AttributeError> {
        self.detect_cycles()?;

        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => Err(AttributeError::Cycle {
                path: vec![self.graph[cycle.node_id()].clone()],
            }),
        }
    }

    /// All attributes in the graph.
    pub fn nodes(&self) -> Vec<AttributeId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Whether `id` is a node of the graph.
    pub fn contains_node(&self, id: &AttributeId) -> bool {
        self.node_map.contains_key(id)
    }
}

impl Default for ClampGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AttributeId {
        AttributeId::from_str(s)
    }

    #[test]
    fn test_add_nodes_and_edges() {
        let mut graph = ClampGraph::new();
        graph.add_node(id("Speed"));
        graph.add_edge(id("Health"), id("MaxHealth"));

        assert!(graph.contains_node(&id("Speed")));
        assert!(graph.contains_node(&id("Health")));
        assert!(graph.contains_node(&id("MaxHealth")));
        assert_eq!(graph.nodes().len(), 3);
    }

    #[test]
    fn test_shared_bound_orders_first() {
        let mut graph = ClampGraph::new();
        graph.add_edge(id("Health"), id("Cap"));
        graph.add_edge(id("Mana"), id("Cap"));

        let order = graph.topological_sort().unwrap();
        let cap = order.iter().position(|a| a == &id("Cap")).unwrap();
        assert!(cap < order.iter().position(|a| a == &id("Health")).unwrap());
        assert!(cap < order.iter().position(|a| a == &id("Mana")).unwrap());
    }

    #[test]
    fn test_mutual_reference_cycle_path() {
        let mut graph = ClampGraph::new();
        graph.add_edge(id("A"), id("B"));
        graph.add_edge(id("B"), id("A"));

        match graph.detect_cycles() {
            Err(AttributeError::Cycle { path }) => {
                assert_eq!(path.len(), 3);
                assert_eq!(path.first(), path.last());
            }
            other => panic!("expected cycle, got {:?}", other),
        }
        assert!(graph.topological_sort().is_err());
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let mut graph = ClampGraph::new();
        graph.add_edge(id("Odd"), id("Odd"));
        assert_eq!(
            graph.detect_cycles().unwrap_err(),
            AttributeError::Cycle {
                path: vec![id("Odd"), id("Odd")]
            }
        );
    }

    #[test]
    fn test_three_way_cycle() {
        let mut graph = ClampGraph::new();
        graph.add_edge(id("A"), id("B"));
        graph.add_edge(id("B"), id("C"));
        graph.add_edge(id("C"), id("A"));
        graph.add_edge(id("D"), id("A"));

        let err = graph.detect_cycles().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("A"));
        assert!(text.contains("B"));
        assert!(text.contains("C"));
        assert!(!text.contains("D"));
    }

    #[test]
    fn test_reports_cycle_with_smallest_name() {
        let mut graph = ClampGraph::new();
        graph.add_edge(id("Y"), id("Z"));
        graph.add_edge(id("Z"), id("Y"));
        graph.add_edge(id("B"), id("A"));
        graph.add_edge(id("A"), id("B"));

        assert_eq!(
            graph.detect_cycles().unwrap_err(),
            AttributeError::Cycle {
                path: vec![id("A"), id("B"), id("A")]
            }
        );
    }
}
