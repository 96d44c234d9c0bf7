#![allow(dead_code)]

use bindforge::binding::{BindingProblem, KeyBinding};
use bindforge::graph::DistanceGraph;
use bindforge::types::{Ability, Combination};
use itertools::Itertools;
use std::sync::Arc;

/// `n` nodes named a, b, c... on a line, `adjacency[i][j] = |i - j|`.
pub fn line_graph(n: usize) -> DistanceGraph {
    let names = (0..n)
        .map(|i| ((b'a' + i as u8) as char).to_string())
        .collect();
    let rows = (0..n)
        .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
        .collect();
    DistanceGraph::from_matrix(names, rows).unwrap()
}

/// Five keys on a line, four abilities, homes {a, b}, two combinations.
pub fn line_problem(priorities: [f64; 4], combo_priority: f64) -> Arc<BindingProblem> {
    let graph = line_graph(5);
    let abilities = ["wrack", "wrack #2", "ice barrage", "dbreath"]
        .iter()
        .zip(priorities)
        .map(|(n, p)| Ability::new(*n, p))
        .collect();
    let combinations = vec![
        Combination::new("ice barrage>wrack", combo_priority, vec![2, 0]),
        Combination::new("ice barrage>wrack #2", combo_priority, vec![2, 1]),
    ];
    let home = graph.node_indices(&["a", "b"]).unwrap();
    Arc::new(BindingProblem::new(graph, abilities, combinations, home).unwrap())
}

/// Six keys with uneven distances and five abilities.
pub fn irregular_problem() -> Arc<BindingProblem> {
    let names = ["q", "w", "e", "a", "s", "d"].map(String::from).to_vec();
    let rows = vec![
        vec![0.0, 1.0, 2.0, 1.2, 1.6, 2.4],
        vec![1.0, 0.0, 1.0, 1.6, 1.2, 1.6],
        vec![2.0, 1.0, 0.0, 2.4, 1.6, 1.2],
        vec![1.2, 1.6, 2.4, 0.0, 1.0, 2.0],
        vec![1.6, 1.2, 1.6, 1.0, 0.0, 1.0],
        vec![2.4, 1.6, 1.2, 2.0, 1.0, 0.0],
    ];
    let graph = DistanceGraph::from_matrix(names, rows).unwrap();
    let abilities = vec![
        Ability::new("strike", 3.0),
        Ability::new("block", 1.0),
        Ability::new("dash", 2.0),
        Ability::new("heal", 0.5),
        Ability::new("taunt", 1.5),
    ];
    let combinations = vec![
        Combination::new("dash > strike", 2.0, vec![2, 0]),
        Combination::new("block > heal > block", 1.0, vec![1, 3, 1]),
        Combination::new("taunt > strike > dash", 0.5, vec![4, 0, 2]),
    ];
    let home = graph.node_indices(&["a", "s"]).unwrap();
    Arc::new(BindingProblem::new(graph, abilities, combinations, home).unwrap())
}

/// Exhaustive minimum over every injective ability -> key mapping.
pub fn brute_force_best(problem: &Arc<BindingProblem>) -> f64 {
    let n = problem.graph().size();
    let k = problem.abilities().len();
    (0..n)
        .permutations(k)
        .map(|perm| {
            let mut binding = KeyBinding::new(problem.clone());
            for node in perm {
                assert!(binding.assign_next(node));
            }
            binding.eval_loss()
        })
        .fold(f64::INFINITY, f64::min)
}
