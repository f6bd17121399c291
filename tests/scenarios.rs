//! End-to-end scenarios across the public API.

use data_structures::{
    by_key, AVLTree, AVLTreeIter, BinarySearchTree, BinarySearchTreeIter, Graph, GraphError, Kruskal,
    OrderedContainer, Reversed, ThreadedSearchTree, ThreadedSearchTreeIter, TreeError, Worklist,
};
use rand::seq::SliceRandom;
use rand::Rng;

fn in_order<T: OrderedContainer<i32>>(tree: &T) -> Vec<i32> {
    let mut out = Vec::new();
    tree.traverse(|v| out.push(*v));
    out
}

#[test]
fn avl_nine_keys_then_remove_root() {
    let mut tree = AVLTree::new();
    for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
        assert!(tree.insert(k));
    }
    assert_eq!(in_order(&tree), (1..=9).collect::<Vec<_>>());
    assert_eq!(tree.show_height(), 3);

    assert!(tree.remove(&5));
    assert!(tree.is_balanced());
    assert_eq!(in_order(&tree), vec![1, 2, 3, 4, 6, 7, 8, 9]);
}

#[test]
fn duplicate_is_rejected_by_every_tree() {
    fn check<T: OrderedContainer<i32>>(mut tree: T) {
        assert!(tree.insert(10));
        assert!(!tree.insert(10));
        assert_eq!(tree.size(), 1);
    }
    check(BinarySearchTree::new());
    check(AVLTree::new());
    check(ThreadedSearchTree::new());
}

#[test]
fn empty_trees_report_errors() {
    fn check<T: OrderedContainer<i32>>(tree: T) {
        assert_eq!(tree.find_min(), Err(TreeError::EmptyTree));
        assert_eq!(tree.find_max(), Err(TreeError::EmptyTree));
        assert!(tree.find(&7).is_err());
        assert_eq!(tree.show_height(), -1);
    }
    check(BinarySearchTree::new());
    check(AVLTree::new());
    check(ThreadedSearchTree::new());
}

#[test]
fn shuffled_workload_keeps_trees_in_agreement() {
    let mut rng = rand::thread_rng();
    let mut keys: Vec<i32> = (0..400).collect();
    keys.shuffle(&mut rng);

    let mut bst = BinarySearchTree::new();
    let mut avl = AVLTree::new();
    let mut threaded = ThreadedSearchTree::new();
    for &k in &keys {
        bst.insert(k);
        avl.insert(k);
        threaded.insert(k);
    }

    for _ in 0..200 {
        let k = rng.gen_range(0..400);
        let removed = bst.remove(&k);
        assert_eq!(removed, avl.remove(&k));
        assert_eq!(removed, threaded.remove(&k));
    }

    assert!(avl.is_balanced());
    assert_eq!(in_order(&bst), in_order(&avl));
    assert_eq!(in_order(&avl), in_order(&threaded));
    assert_eq!(bst.find_min(), avl.find_min());
    assert_eq!(avl.find_max(), threaded.find_max());
}

#[test]
fn tree_iterators_can_be_named() {
    fn first_two<'a>(mut it: impl Iterator<Item = &'a i32>) -> (Option<&'a i32>, Option<&'a i32>) {
        (it.next(), it.next())
    }
    let bst: BinarySearchTree<i32> = [4, 2, 6].into_iter().collect();
    let avl: AVLTree<i32> = [4, 2, 6].into_iter().collect();
    let threaded: ThreadedSearchTree<i32> = [4, 2, 6].into_iter().collect();

    let a: BinarySearchTreeIter<'_, i32> = bst.iter();
    let b: AVLTreeIter<'_, i32> = avl.iter();
    let c: ThreadedSearchTreeIter<'_, i32, _> = threaded.iter();
    assert_eq!(first_two(a), (Some(&2), Some(&4)));
    assert_eq!(first_two(b), (Some(&2), Some(&4)));
    assert_eq!(first_two(c), (Some(&2), Some(&4)));
}

#[test]
fn trees_share_a_comparator_strategy() {
    let mut bst = BinarySearchTree::with_comparator(Reversed(by_key(|s: &&str| s.len())));
    let mut threaded = ThreadedSearchTree::with_comparator(Reversed(by_key(|s: &&str| s.len())));
    for word in ["kiwi", "fig", "banana", "apple", "date"] {
        bst.insert(word);
        threaded.insert(word);
    }
    // "date" has the same length as "kiwi" and is rejected
    assert_eq!(bst.size(), 4);
    assert_eq!(bst.in_order(), vec![&"banana", &"apple", &"kiwi", &"fig"]);
    assert_eq!(threaded.in_order(), bst.in_order());
    assert_eq!(bst.find(&"pear"), Ok(&"kiwi"));
    assert_eq!(threaded.find(&"toolong"), Err(TreeError::NotFound));
}

#[test]
fn dijkstra_prefers_cheaper_detour() {
    let mut g = Graph::from_edges([("A", "B", 4), ("A", "C", 1), ("C", "B", 1)]);
    assert!(g.dijkstra(&"A").is_ok());
    assert_eq!(g.distance_to(&"B"), Ok(Some(2)));

    let report = g.shortest_path(&"A", &"B").map(|p| p.to_string());
    assert_eq!(report.as_deref(), Ok("Cost of shortest path from A to B: 2\nA --> C --> B"));
}

#[test]
fn heap_worklist_on_a_grid() {
    let mut edges = Vec::new();
    for r in 0..5_u32 {
        for c in 0..5_u32 {
            let here = r * 5 + c;
            if c < 4 {
                edges.push((here, here + 1, 1 + (r + c) % 3));
            }
            if r < 4 {
                edges.push((here, here + 5, 1 + (r * c) % 4));
            }
        }
    }
    let mut fifo: Graph<u32, u32> = Graph::from_edges(edges.iter().copied());
    let mut heap = Graph::with_worklist(Worklist::MinDistance);
    heap.set_graph(edges);

    let a = fifo.shortest_path(&0, &24);
    let b = heap.shortest_path(&0, &24);
    assert_eq!(a.as_ref().map(|p| p.cost), b.as_ref().map(|p| p.cost));
    assert_eq!(heap.shortest_path(&24, &0), Err(GraphError::NoPath));
}

#[test]
fn kruskal_on_triangle() {
    let g = Graph::from_edges([('A', 'B', 1), ('B', 'C', 2), ('A', 'C', 5)]);
    let mut mst = Graph::new();
    let forest = Kruskal::with_graph(&g).gen_kruskal(&mut mst);

    assert_eq!(forest.as_ref().map(|f| f.total_cost()), Ok(3));
    assert_eq!(mst.edge_count(), 2);
    assert_eq!(mst.edge_cost(&'A', &'B'), Some(1));
    assert_eq!(mst.edge_cost(&'B', &'C'), Some(2));
    assert_eq!(mst.edge_cost(&'A', &'C'), None);
    assert_eq!(mst.total_cost(), 3);
}

#[test]
fn kruskal_output_feeds_dijkstra() {
    let g = Graph::from_edges([('A', 'B', 2), ('B', 'C', 2), ('A', 'C', 3), ('C', 'D', 1), ('B', 'D', 6)]);
    let mut mst = Graph::new();
    assert!(Kruskal::with_graph(&g).gen_kruskal(&mut mst).is_ok());

    let path = mst.shortest_path(&'A', &'D');
    assert_eq!(path.map(|p| p.path), Ok(vec!['A', 'B', 'C', 'D']));
}
