//! Ordered containers and weighted-graph algorithms.
//!
//! Three search trees share the [`OrderedContainer`] contract and take their
//! ordering from a [`Comparator`]. [`Graph`] answers shortest-path queries
//! and [`Kruskal`] builds minimum spanning forests from it.
//!
//! ```
//! use data_structures::{AVLTree, Graph};
//!
//! let mut tree: AVLTree<i32> = [5, 3, 8, 1, 4, 7, 9, 2, 6].into_iter().collect();
//! assert_eq!(tree.show_height(), 3);
//! assert!(tree.remove(&5));
//!
//! let mut g = Graph::from_edges([("A", "B", 4), ("A", "C", 1), ("C", "B", 1)]);
//! g.dijkstra(&"A").unwrap();
//! assert_eq!(g.distance_to(&"B"), Ok(Some(2)));
//! ```

mod avl_tree;
mod binary_heap;
mod binary_search_tree;
mod compare;
mod error;
mod graph;
mod kruskal;
mod node;
mod ordered;
mod threaded_tree;

pub use avl_tree::{AVLTree, Iter as AVLTreeIter};
pub use binary_heap::BinaryHeap;
pub use binary_search_tree::{BinarySearchTree, Iter as BinarySearchTreeIter};
pub use compare::{by_key, Comparator, NaturalOrder, Reversed};
pub use error::{GraphError, TreeError};
pub use graph::{AdjacencyTable, Cost, DistanceTable, Edge, Graph, ShortestPath, Worklist};
pub use kruskal::{Kruskal, SpanningForest};
pub use ordered::OrderedContainer;
pub use threaded_tree::{Iter as ThreadedSearchTreeIter, NodeId, ThreadedSearchTree};
