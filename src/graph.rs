//! Directed weighted graph with single-source shortest paths.
//!
//! Vertices are identified by their data and looked up through the data's
//! own `Ord`. Each vertex keeps the distance and predecessor found by the
//! most recent successful [`Graph::dijkstra`] run.

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::ops::Add;

use tracing::debug;

use crate::binary_heap::BinaryHeap;
use crate::error::GraphError;

/// Numeric edge weight.
pub trait Cost: Copy + PartialOrd + Add<Output = Self> {
    fn zero() -> Self;
}

macro_rules! impl_cost {
    ($($t:ty),*) => {
        $(
            impl Cost for $t {
                fn zero() -> Self {
                    0 as $t
                }
            }
        )*
    };
}

impl_cost!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge<V, W> {
    pub source: V,
    pub dest: V,
    pub cost: W,
}

impl<V, W> Edge<V, W> {
    pub fn new(source: V, dest: V, cost: W) -> Self {
        Edge { source, dest, cost }
    }
}

impl<V, W> From<(V, V, W)> for Edge<V, W> {
    fn from((source, dest, cost): (V, V, W)) -> Self {
        Edge::new(source, dest, cost)
    }
}

/// Order in which improved vertices are revisited by [`Graph::dijkstra`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Worklist {
    /// First in, first out. Every improvement re-queues the vertex, so a
    /// vertex may be expanded more than once.
    #[default]
    Fifo,
    /// Smallest tentative distance first.
    MinDistance,
}

#[derive(Debug, Clone)]
struct Vertex<V, W> {
    data: V,
    adj: BTreeMap<usize, W>,
    dist: Option<W>,
    next_in_path: Option<usize>,
}

impl<V, W> Vertex<V, W> {
    fn new(data: V) -> Self {
        Vertex {
            data,
            adj: BTreeMap::new(),
            dist: None,
            next_in_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Graph<V, W> {
    vertices: Vec<Vertex<V, W>>,
    index: BTreeMap<V, usize>,
    worklist: Worklist,
}

impl<V: Ord + Clone, W: Cost> Graph<V, W> {
    pub fn new() -> Self {
        Self::with_worklist(Worklist::default())
    }

    pub fn with_worklist(worklist: Worklist) -> Self {
        Graph {
            vertices: Vec::new(),
            index: BTreeMap::new(),
            worklist,
        }
    }

    pub fn from_edges<I, E>(edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge<V, W>>,
    {
        let mut graph = Self::new();
        graph.set_graph(edges);
        graph
    }

    pub fn worklist(&self) -> Worklist {
        self.worklist
    }

    pub fn set_worklist(&mut self, worklist: Worklist) {
        self.worklist = worklist;
    }

    pub fn set_graph<I, E>(&mut self, edges: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge<V, W>>,
    {
        self.clear();
        for edge in edges {
            let edge = edge.into();
            self.add_edge(edge.source, edge.dest, edge.cost);
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.index.clear();
    }

    /// Adds a vertex carrying `data`. Returns `false` if it already exists.
    pub fn add_vertex(&mut self, data: V) -> bool {
        let before = self.vertices.len();
        self.intern(data);
        self.vertices.len() > before
    }

    /// Adds both endpoints if needed and sets the cost from `source` to
    /// `dest`, replacing any earlier cost for that pair.
    pub fn add_edge(&mut self, source: V, dest: V, cost: W) {
        let src = self.intern(source);
        let dst = self.intern(dest);
        self.vertices[src].adj.insert(dst, cost);
    }

    pub fn contains_vertex(&self, data: &V) -> bool {
        self.index.contains_key(data)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(|v| v.adj.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex data in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.index.keys()
    }

    pub fn edge_cost(&self, source: &V, dest: &V) -> Option<W> {
        let src = self.vertex_index(source)?;
        let dst = self.vertex_index(dest)?;
        self.vertices[src].adj.get(&dst).copied()
    }

    /// All edges, grouped by source vertex in ascending order.
    pub fn edges(&self) -> Vec<Edge<V, W>> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for &src in self.index.values() {
            let source = &self.vertices[src];
            for (&dst, &cost) in &source.adj {
                edges.push(Edge::new(source.data.clone(), self.vertices[dst].data.clone(), cost));
            }
        }
        edges
    }

    pub fn total_cost(&self) -> W {
        self.vertices
            .iter()
            .flat_map(|v| v.adj.values())
            .fold(W::zero(), |acc, &c| acc + c)
    }

    pub fn adjacency_table(&self) -> AdjacencyTable<V, W> {
        let rows = self
            .index
            .values()
            .map(|&i| {
                let vertex = &self.vertices[i];
                let neighbours = vertex
                    .adj
                    .iter()
                    .map(|(&dst, &cost)| (self.vertices[dst].data.clone(), cost))
                    .collect();
                (vertex.data.clone(), neighbours)
            })
            .collect();
        AdjacencyTable { rows }
    }

    /// Computes distances and predecessors from `source` to every vertex by
    /// repeated edge relaxation.
    ///
    /// With the default [`Worklist::Fifo`] a vertex is re-queued whenever its
    /// distance improves, which gives correct results for non-negative
    /// weights. A negative cycle reachable from `source` never settles.
    pub fn dijkstra(&mut self, source: &V) -> Result<(), GraphError> {
        let s = self.vertex_index(source).ok_or(GraphError::UnknownVertex)?;

        for vertex in &mut self.vertices {
            vertex.dist = None;
            vertex.next_in_path = None;
        }
        self.vertices[s].dist = Some(W::zero());

        match self.worklist {
            Worklist::Fifo => self.relax_fifo(s),
            Worklist::MinDistance => self.relax_by_distance(s),
        }
        Ok(())
    }

    /// Distance found by the last [`Graph::dijkstra`] run; `None` when
    /// `data` was unreachable.
    pub fn distance_to(&self, data: &V) -> Result<Option<W>, GraphError> {
        let i = self.vertex_index(data).ok_or(GraphError::UnknownVertex)?;
        Ok(self.vertices[i].dist)
    }

    /// Runs [`Graph::dijkstra`] from `from` and walks the predecessor chain
    /// back from `to`.
    pub fn shortest_path(&mut self, from: &V, to: &V) -> Result<ShortestPath<V, W>, GraphError> {
        let start = self.vertex_index(from).ok_or(GraphError::UnknownVertex)?;
        let stop = self.vertex_index(to).ok_or(GraphError::UnknownVertex)?;
        self.dijkstra(from)?;

        let mut chain = vec![stop];
        let mut current = stop;
        while current != start {
            let Some(prev) = self.vertices[current].next_in_path else {
                return Err(GraphError::NoPath);
            };
            chain.push(prev);
            current = prev;
        }
        let cost = self.vertices[stop].dist.ok_or(GraphError::NoPath)?;

        let path = chain.into_iter().rev().map(|i| self.vertices[i].data.clone()).collect();
        Ok(ShortestPath { cost, path })
    }

    pub fn show_distances_to(&mut self, source: &V) -> Result<DistanceTable<V, W>, GraphError> {
        self.dijkstra(source)?;
        let rows = self
            .index
            .values()
            .map(|&i| (self.vertices[i].data.clone(), self.vertices[i].dist))
            .collect();
        Ok(DistanceTable {
            source: source.clone(),
            rows,
        })
    }

    pub(crate) fn vertex_index(&self, data: &V) -> Option<usize> {
        self.index.get(data).copied()
    }

    pub(crate) fn vertex_data(&self, i: usize) -> &V {
        &self.vertices[i].data
    }

    pub(crate) fn vertex_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.index.values().copied()
    }

    pub(crate) fn out_edges(&self, i: usize) -> impl Iterator<Item = (usize, W)> + '_ {
        self.vertices[i].adj.iter().map(|(&dst, &cost)| (dst, cost))
    }

    fn intern(&mut self, data: V) -> usize {
        if let Some(&i) = self.index.get(&data) {
            return i;
        }
        let i = self.vertices.len();
        self.index.insert(data.clone(), i);
        self.vertices.push(Vertex::new(data));
        i
    }

    /// Lowers the distance of every neighbour of `v` reachable more cheaply
    /// through `v`, returning the neighbours that improved.
    fn relax(&mut self, v: usize) -> Vec<(usize, W)> {
        let Some(dist_v) = self.vertices[v].dist else {
            return Vec::new();
        };
        let edges: Vec<(usize, W)> = self.out_edges(v).collect();

        let mut improved = Vec::new();
        for (w, cost) in edges {
            let candidate = dist_v + cost;
            let target = &mut self.vertices[w];
            let better = target.dist.map_or(true, |dist_w| candidate < dist_w);
            if better {
                target.dist = Some(candidate);
                target.next_in_path = Some(v);
                debug!(from = v, to = w, "graph: relaxed edge");
                improved.push((w, candidate));
            }
        }
        improved
    }

    fn relax_fifo(&mut self, source: usize) {
        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            for (w, _) in self.relax(v) {
                queue.push_back(w);
            }
        }
    }

    fn relax_by_distance(&mut self, source: usize) {
        let by_distance = |a: &(W, usize), b: &(W, usize)| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
        let mut heap = BinaryHeap::with_comparator(by_distance);
        heap.push((W::zero(), source));
        while let Some((dist, v)) = heap.pop() {
            // skip entries superseded by a later improvement
            if self.vertices[v].dist.is_some_and(|best| best < dist) {
                continue;
            }
            for (w, candidate) in self.relax(v) {
                heap.push((candidate, w));
            }
        }
    }
}

impl<V: Ord + Clone, W: Cost> Default for Graph<V, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Ord + Clone, W: Cost, E: Into<Edge<V, W>>> FromIterator<E> for Graph<V, W> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_edges(iter)
    }
}

/// Result of [`Graph::shortest_path`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortestPath<V, W> {
    pub cost: W,
    /// Vertices from the start to the end of the path, both included.
    pub path: Vec<V>,
}

impl<V: fmt::Display, W: fmt::Display> fmt::Display for ShortestPath<V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(first), Some(last)) = (self.path.first(), self.path.last()) else {
            return Ok(());
        };
        writeln!(f, "Cost of shortest path from {first} to {last}: {}", self.cost)?;
        for (k, v) in self.path.iter().enumerate() {
            if k > 0 {
                write!(f, " --> ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable<V, W> {
    pub source: V,
    /// Every vertex with its distance, `None` when unreachable.
    pub rows: Vec<(V, Option<W>)>,
}

impl<V: fmt::Display, W: fmt::Display> fmt::Display for DistanceTable<V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dist to {} -----------", self.source)?;
        for (v, dist) in &self.rows {
            match dist {
                Some(d) => writeln!(f, "{v} {d}")?,
                None => writeln!(f, "{v} inf")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyTable<V, W> {
    pub rows: Vec<(V, Vec<(V, W)>)>,
}

impl<V: fmt::Display, W: fmt::Display> fmt::Display for AdjacencyTable<V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------------------------")?;
        for (v, neighbours) in &self.rows {
            write!(f, "Adj List for {v}:")?;
            for (w, cost) in neighbours {
                write!(f, " {w}({cost})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&'static str, &'static str, u32)]) -> Graph<&'static str, u32> {
        edges.iter().copied().collect()
    }

    #[test]
    fn add_edge_creates_vertices_once() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("B", "A", 2);
        g.add_edge("A", "C", 3);
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(!g.add_vertex("A"));
        assert!(g.add_vertex("D"));
        assert_eq!(g.vertices().copied().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn add_edge_overwrites_cost() {
        let mut g = graph(&[("A", "B", 4)]);
        g.add_edge("A", "B", 9);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_cost(&"A", &"B"), Some(9));
    }

    #[test]
    fn edges_are_directed() {
        let g = graph(&[("A", "B", 4)]);
        assert_eq!(g.edge_cost(&"A", &"B"), Some(4));
        assert_eq!(g.edge_cost(&"B", &"A"), None);
    }

    #[test]
    fn shorter_indirect_path_wins() {
        let mut g = graph(&[("A", "B", 4), ("A", "C", 1), ("C", "B", 1)]);
        assert_eq!(g.dijkstra(&"A"), Ok(()));
        assert_eq!(g.distance_to(&"B"), Ok(Some(2)));
        assert_eq!(g.distance_to(&"C"), Ok(Some(1)));
        assert_eq!(g.distance_to(&"A"), Ok(Some(0)));
    }

    #[test]
    fn dijkstra_on_unknown_vertex_fails() {
        let mut g = graph(&[("A", "B", 4)]);
        assert!(g.dijkstra(&"A").is_ok());
        assert_eq!(g.dijkstra(&"Z"), Err(GraphError::UnknownVertex));
        assert_eq!(g.distance_to(&"Z"), Err(GraphError::UnknownVertex));
        // the earlier run's distances are left in place
        assert_eq!(g.distance_to(&"B"), Ok(Some(4)));
        assert_eq!(g.distance_to(&"A"), Ok(Some(0)));
    }

    #[test]
    fn unreachable_vertex_has_no_distance() {
        let mut g = graph(&[("A", "B", 4), ("C", "A", 1)]);
        g.dijkstra(&"A").ok();
        assert_eq!(g.distance_to(&"C"), Ok(None));
    }

    #[test]
    fn rerun_resets_previous_state() {
        let mut g = graph(&[("A", "B", 4), ("B", "C", 1)]);
        g.dijkstra(&"A").ok();
        assert_eq!(g.distance_to(&"C"), Ok(Some(5)));
        g.dijkstra(&"B").ok();
        assert_eq!(g.distance_to(&"A"), Ok(None));
        assert_eq!(g.distance_to(&"C"), Ok(Some(1)));
    }

    #[test]
    fn shortest_path_lists_vertices_in_order() {
        let mut g = graph(&[("A", "B", 4), ("A", "C", 1), ("C", "B", 1), ("B", "D", 2)]);
        let path = g.shortest_path(&"A", &"D");
        assert_eq!(
            path,
            Ok(ShortestPath {
                cost: 4,
                path: vec!["A", "C", "B", "D"],
            })
        );
    }

    #[test]
    fn shortest_path_to_self_is_trivial() {
        let mut g = graph(&[("A", "B", 4)]);
        let path = g.shortest_path(&"A", &"A");
        assert_eq!(path.map(|p| (p.cost, p.path)), Ok((0, vec!["A"])));
    }

    #[test]
    fn shortest_path_failures() {
        let mut g = graph(&[("A", "B", 4), ("C", "D", 1)]);
        assert_eq!(g.shortest_path(&"A", &"D"), Err(GraphError::NoPath));
        assert_eq!(g.shortest_path(&"A", &"Q"), Err(GraphError::UnknownVertex));
        assert_eq!(g.shortest_path(&"Q", &"A"), Err(GraphError::UnknownVertex));
    }

    #[test]
    fn shortest_path_report_format() {
        let mut g = graph(&[("A", "B", 4), ("A", "C", 1), ("C", "B", 1)]);
        let report = g.shortest_path(&"A", &"B").map(|p| p.to_string());
        assert_eq!(report.as_deref(), Ok("Cost of shortest path from A to B: 2\nA --> C --> B"));
    }

    #[test]
    fn distance_table_lists_every_vertex() {
        let mut g = graph(&[("A", "B", 4), ("A", "C", 1), ("D", "A", 1)]);
        let table = g.show_distances_to(&"A");
        let rows = table.as_ref().map(|t| t.rows.clone());
        assert_eq!(rows, Ok(vec![("A", Some(0)), ("B", Some(4)), ("C", Some(1)), ("D", None)]));
        let text = table.map(|t| t.to_string());
        assert_eq!(text.as_deref(), Ok("Dist to A -----------\nA 0\nB 4\nC 1\nD inf\n"));
    }

    #[test]
    fn adjacency_table_format() {
        let g = graph(&[("A", "B", 4), ("A", "C", 1), ("C", "B", 1)]);
        assert_eq!(
            g.adjacency_table().to_string(),
            "------------------------\nAdj List for A: B(4) C(1)\nAdj List for B:\nAdj List for C: B(1)\n"
        );
    }

    #[test]
    fn min_distance_worklist_agrees_with_fifo() {
        let edges = [
            ("S", "A", 7),
            ("S", "B", 2),
            ("B", "A", 3),
            ("A", "C", 1),
            ("B", "C", 8),
            ("C", "D", 2),
            ("B", "D", 9),
        ];
        let mut fifo = graph(&edges);
        let mut heap = graph(&edges);
        heap.set_worklist(Worklist::MinDistance);
        fifo.dijkstra(&"S").ok();
        heap.dijkstra(&"S").ok();
        for v in ["S", "A", "B", "C", "D"] {
            assert_eq!(fifo.distance_to(&v), heap.distance_to(&v));
        }
        assert_eq!(fifo.distance_to(&"D"), Ok(Some(8)));
    }

    #[test]
    fn float_costs() {
        let mut g: Graph<u8, f64> = Graph::new();
        g.add_edge(1, 2, 0.5);
        g.add_edge(2, 3, 0.25);
        g.add_edge(1, 3, 1.0);
        g.dijkstra(&1).ok();
        assert_eq!(g.distance_to(&3), Ok(Some(0.75)));
    }

    #[test]
    fn set_graph_replaces_contents() {
        let mut g = graph(&[("A", "B", 4)]);
        g.set_graph([Edge::new("X", "Y", 1), Edge::new("Y", "Z", 2)]);
        assert!(!g.contains_vertex(&"A"));
        assert_eq!(g.edges(), vec![Edge::new("X", "Y", 1), Edge::new("Y", "Z", 2)]);
        assert_eq!(g.total_cost(), 3);
    }

    #[test]
    fn clear_empties_graph() {
        let mut g = graph(&[("A", "B", 4)]);
        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.dijkstra(&"A"), Err(GraphError::UnknownVertex));
    }
}
