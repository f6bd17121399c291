//! Minimum spanning forest by Kruskal's algorithm.
//!
//! Edges are taken cheapest first from a [`BinaryHeap`]; equal costs keep
//! the order in which [`Graph::edges`] lists them. Each edge is treated as
//! undirected.
//!
//! The input graph is borrowed shared and the output graph exclusively, so
//! a graph cannot be used as both:
//!
//! ```compile_fail
//! use data_structures::{Graph, Kruskal};
//!
//! let mut g: Graph<char, u32> = Graph::from_edges([('a', 'b', 1)]);
//! let mut kruskal = Kruskal::with_graph(&g);
//! kruskal.gen_kruskal(&mut g).ok();
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::debug;

use crate::binary_heap::BinaryHeap;
use crate::compare::Comparator;
use crate::error::GraphError;
use crate::graph::{Cost, Edge, Graph};

#[derive(Debug, Clone, Copy)]
struct IndexedEdge<W> {
    source: usize,
    dest: usize,
    cost: W,
}

#[derive(Debug, Clone, Copy, Default)]
struct ByCost;

impl<W: PartialOrd> Comparator<IndexedEdge<W>> for ByCost {
    fn compare(&self, a: &IndexedEdge<W>, b: &IndexedEdge<W>) -> Ordering {
        a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal)
    }
}

/// Edges chosen by [`Kruskal::gen_kruskal`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpanningForest<V, W> {
    /// Accepted edges in the order they were chosen.
    pub edges: Vec<Edge<V, W>>,
    /// Number of trees in the forest, one per connected component.
    pub components: usize,
}

impl<V, W: Cost> SpanningForest<V, W> {
    pub fn total_cost(&self) -> W {
        self.edges.iter().fold(W::zero(), |acc, e| acc + e.cost)
    }

    pub fn is_tree(&self) -> bool {
        self.components == 1
    }
}

#[derive(Debug)]
pub struct Kruskal<'g, V, W> {
    in_graph: Option<&'g Graph<V, W>>,
    edge_heap: BinaryHeap<IndexedEdge<W>, ByCost>,
}

impl<'g, V: Ord + Clone, W: Cost> Kruskal<'g, V, W> {
    pub fn new() -> Self {
        Kruskal {
            in_graph: None,
            edge_heap: BinaryHeap::default(),
        }
    }

    pub fn with_graph(graph: &'g Graph<V, W>) -> Self {
        let mut kruskal = Self::new();
        kruskal.set_in_graph(graph);
        kruskal
    }

    pub fn set_in_graph(&mut self, graph: &'g Graph<V, W>) {
        self.in_graph = Some(graph);
        self.edge_heap.clear();
    }

    pub fn clear(&mut self) {
        self.in_graph = None;
        self.edge_heap.clear();
    }

    /// Computes a minimum spanning forest of the input graph and stores its
    /// edges in `out`, replacing whatever `out` held.
    pub fn gen_kruskal(&mut self, out: &mut Graph<V, W>) -> Result<SpanningForest<V, W>, GraphError> {
        let graph = self.in_graph.ok_or(GraphError::NoInputGraph)?;

        let mut forest: Vec<BTreeSet<usize>> = graph.vertex_ids().map(|v| BTreeSet::from([v])).collect();
        self.build_edge_heap(graph);

        let mut accepted = Vec::new();
        while forest.len() > 1 {
            let Some(edge) = self.edge_heap.pop() else {
                break;
            };
            let source_set = forest.iter().position(|set| set.contains(&edge.source));
            let dest_set = forest.iter().position(|set| set.contains(&edge.dest));
            let (Some(a), Some(b)) = (source_set, dest_set) else {
                continue;
            };
            if a == b {
                debug!(source = edge.source, dest = edge.dest, "kruskal: rejected edge, would close a cycle");
                continue;
            }

            let absorbed = std::mem::take(&mut forest[b]);
            forest[a].extend(absorbed);
            forest.remove(b);
            debug!(source = edge.source, dest = edge.dest, trees = forest.len(), "kruskal: accepted edge");
            accepted.push(edge);
        }
        self.edge_heap.clear();

        let edges: Vec<Edge<V, W>> = accepted
            .into_iter()
            .map(|e| Edge::new(graph.vertex_data(e.source).clone(), graph.vertex_data(e.dest).clone(), e.cost))
            .collect();
        out.set_graph(edges.iter().cloned());

        Ok(SpanningForest {
            edges,
            components: forest.len(),
        })
    }

    fn build_edge_heap(&mut self, graph: &Graph<V, W>) {
        self.edge_heap.clear();
        for source in graph.vertex_ids() {
            for (dest, cost) in graph.out_edges(source) {
                self.edge_heap.push(IndexedEdge { source, dest, cost });
            }
        }
    }
}

impl<V: Ord + Clone, W: Cost> Default for Kruskal<'_, V, W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(graph: &Graph<char, u32>) -> (SpanningForest<char, u32>, Graph<char, u32>) {
        let mut out = Graph::new();
        let mut kruskal = Kruskal::with_graph(graph);
        match kruskal.gen_kruskal(&mut out) {
            Ok(forest) => (forest, out),
            Err(e) => panic!("kruskal failed: {e}"),
        }
    }

    #[test]
    fn triangle_drops_heaviest_edge() {
        let g = Graph::from_edges([('A', 'B', 1), ('B', 'C', 2), ('A', 'C', 5)]);
        let (forest, out) = run(&g);
        assert_eq!(forest.edges, vec![Edge::new('A', 'B', 1), Edge::new('B', 'C', 2)]);
        assert_eq!(forest.total_cost(), 3);
        assert!(forest.is_tree());
        assert_eq!(out.edge_count(), 2);
        assert_eq!(out.edge_cost(&'A', &'C'), None);
        assert_eq!(out.total_cost(), 3);
    }

    #[test]
    fn classic_graph() {
        let g = Graph::from_edges([
            ('a', 'b', 4),
            ('a', 'h', 8),
            ('b', 'c', 8),
            ('b', 'h', 11),
            ('c', 'd', 7),
            ('c', 'f', 4),
            ('c', 'i', 2),
            ('d', 'e', 9),
            ('d', 'f', 14),
            ('e', 'f', 10),
            ('f', 'g', 2),
            ('g', 'h', 1),
            ('g', 'i', 6),
            ('h', 'i', 7),
        ]);
        let (forest, out) = run(&g);
        assert_eq!(forest.edges.len(), 8);
        assert_eq!(forest.total_cost(), 37);
        assert_eq!(out.vertex_count(), 9);
    }

    #[test]
    fn disconnected_input_yields_forest() {
        let g = Graph::from_edges([('A', 'B', 3), ('C', 'D', 1), ('D', 'E', 2), ('C', 'E', 9)]);
        let (forest, out) = run(&g);
        assert_eq!(forest.components, 2);
        assert!(!forest.is_tree());
        assert_eq!(forest.total_cost(), 6);
        assert_eq!(out.edge_count(), 3);
    }

    #[test]
    fn equal_costs_keep_listing_order() {
        let g = Graph::from_edges([('A', 'B', 1), ('A', 'C', 1), ('B', 'C', 1)]);
        let (forest, _) = run(&g);
        assert_eq!(forest.edges, vec![Edge::new('A', 'B', 1), Edge::new('A', 'C', 1)]);
    }

    #[test]
    fn isolated_vertex_is_its_own_component() {
        let mut g = Graph::from_edges([('A', 'B', 1)]);
        g.add_vertex('Z');
        let (forest, out) = run(&g);
        assert_eq!(forest.components, 2);
        assert!(!out.contains_vertex(&'Z'));
    }

    #[test]
    fn output_graph_is_replaced() {
        let g = Graph::from_edges([('A', 'B', 1)]);
        let mut out = Graph::from_edges([('X', 'Y', 7)]);
        let mut kruskal = Kruskal::with_graph(&g);
        assert!(kruskal.gen_kruskal(&mut out).is_ok());
        assert!(!out.contains_vertex(&'X'));
        assert_eq!(out.edges(), vec![Edge::new('A', 'B', 1)]);
    }

    #[test]
    fn missing_input_graph() {
        let g = Graph::from_edges([('A', 'B', 1)]);
        let mut out: Graph<char, u32> = Graph::new();
        let mut kruskal = Kruskal::new();
        assert_eq!(kruskal.gen_kruskal(&mut out), Err(GraphError::NoInputGraph));

        kruskal.set_in_graph(&g);
        assert!(kruskal.gen_kruskal(&mut out).is_ok());
        kruskal.clear();
        assert_eq!(kruskal.gen_kruskal(&mut out), Err(GraphError::NoInputGraph));
    }

    #[test]
    fn empty_graph_has_empty_forest() {
        let g = Graph::new();
        let (forest, out) = run(&g);
        assert!(forest.edges.is_empty());
        assert_eq!(forest.components, 0);
        assert!(out.is_empty());
    }
}
