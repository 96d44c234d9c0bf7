use crate::binding::{BindingProblem, KeyBinding};
use crate::config::TreeParams;
use crate::solver::{make_rng, BestTracker, Solver};
use fnv::FnvHashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// UCT score for a minimisation problem: low mean loss scores high.
///
/// `1 / (loss + epsilon) + exploration * sqrt(ln(parent_visits) / child_visits)`,
/// or `0` while either node is unvisited.
#[inline]
pub fn uct_score(
    parent_visits: u64,
    child_visits: u64,
    child_loss: f64,
    epsilon: f64,
    exploration: f64,
) -> f64 {
    if parent_visits == 0 || child_visits == 0 {
        return 0.0;
    }
    let exploitation = 1.0 / (child_loss + epsilon);
    let bonus = ((parent_visits as f64).ln() / child_visits as f64).sqrt();
    exploitation + exploration * bonus
}

/// One partial-assignment prefix in the search tree.
///
/// Children are keyed by the global node index bound at this depth and only
/// exist once that branch has been visited.
#[derive(Debug, Clone, Default)]
pub struct SearchNode {
    visits: u64,
    loss: f64,
    width: usize,
    children: FnvHashMap<usize, SearchNode>,
}

impl SearchNode {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Running mean of every loss observed through this node.
    pub fn loss(&self) -> f64 {
        self.loss
    }

    /// Number of keys that were free when this node was created.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn children(&self) -> &FnvHashMap<usize, SearchNode> {
        &self.children
    }

    pub fn child(&self, node: usize) -> Option<&SearchNode> {
        self.children.get(&node)
    }

    /// Total number of materialised nodes in this subtree, including self.
    pub fn tree_size(&self) -> usize {
        1 + self.children.values().map(SearchNode::tree_size).sum::<usize>()
    }

    fn record(&mut self, loss: f64) {
        self.loss = (self.loss * self.visits as f64 + loss) / (self.visits + 1) as f64;
        self.visits += 1;
    }

    fn descend(&mut self, binding: &mut KeyBinding, rng: &mut fastrand::Rng, params: &TreeParams) -> f64 {
        if binding.fully_assigned() {
            let loss = binding.eval_loss();
            self.record(loss);
            return loss;
        }

        let free = binding.get_unassigned().to_vec();
        let unvisited: Vec<usize> = free
            .iter()
            .copied()
            .filter(|n| !self.children.contains_key(n))
            .collect();

        let next = if unvisited.is_empty() {
            self.select_uct(&free, rng, params)
        } else {
            unvisited[rng.usize(0..unvisited.len())]
        };

        let assigned = binding.assign_next(next);
        debug_assert!(assigned);

        let child = self
            .children
            .entry(next)
            .or_insert_with(|| SearchNode::new(binding.get_unassigned().len()));
        let loss = child.descend(binding, rng, params);

        self.record(loss);
        loss
    }

    fn select_uct(&self, free: &[usize], rng: &mut fastrand::Rng, params: &TreeParams) -> usize {
        let mut best_score = f64::NEG_INFINITY;
        let mut best: Vec<usize> = Vec::new();

        for &n in free {
            let child = &self.children[&n];
            let score = uct_score(
                self.visits,
                child.visits,
                child.loss,
                params.uct_epsilon,
                params.exploration,
            );
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(n);
            } else if score == best_score {
                best.push(n);
            }
        }

        best[rng.usize(0..best.len())]
    }
}

/// Monte Carlo tree search over assignment prefixes, reusing one tree for
/// every iteration.
pub struct TreeSearchSolver {
    problem: Arc<BindingProblem>,
    root: SearchNode,
    params: TreeParams,
    best: BestTracker,
    num_iter: usize,
    rng: fastrand::Rng,
}

impl TreeSearchSolver {
    pub fn new(problem: Arc<BindingProblem>, seed: Option<u64>) -> Self {
        Self::with_params(problem, TreeParams::default(), seed)
    }

    pub fn with_params(problem: Arc<BindingProblem>, params: TreeParams, seed: Option<u64>) -> Self {
        let root = SearchNode::new(problem.graph().size());
        Self {
            problem,
            root,
            params,
            best: BestTracker::default(),
            num_iter: 0,
            rng: make_rng(seed),
        }
    }

    pub fn root(&self) -> &SearchNode {
        &self.root
    }
}

impl Solver for TreeSearchSolver {
    fn run_iteration(&mut self) -> (f64, KeyBinding) {
        let mut binding = KeyBinding::new(self.problem.clone());
        let loss = self.root.descend(&mut binding, &mut self.rng, &self.params);

        if self.best.offer(loss, &binding) {
            info!(
                "New best loss: {:.4} (iteration {}, tree size {})",
                loss,
                self.num_iter,
                self.root.tree_size()
            );
        } else {
            debug!("Iteration {} loss {:.4}", self.num_iter, loss);
        }
        self.num_iter += 1;
        (loss, binding)
    }

    fn tracker(&self) -> &BestTracker {
        &self.best
    }

    fn iterations(&self) -> usize {
        self.num_iter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DistanceGraph;
    use crate::types::{Ability, Combination};

    fn problem() -> Arc<BindingProblem> {
        let names = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
        let rows = (0..5)
            .map(|i| (0..5).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        let graph = DistanceGraph::from_matrix(names, rows).unwrap();
        let abilities = vec![
            Ability::new("wrack", 1.0),
            Ability::new("wrack #2", 1.0),
            Ability::new("ice barrage", 2.0),
            Ability::new("dbreath", 3.0),
        ];
        let combinations = vec![
            Combination::new("ice barrage>wrack", 1.0, vec![2, 0]),
            Combination::new("ice barrage>wrack #2", 1.0, vec![2, 1]),
        ];
        Arc::new(BindingProblem::new(graph, abilities, combinations, vec![0, 1]).unwrap())
    }

    fn assert_consistent(node: &SearchNode) {
        if node.children().is_empty() {
            return;
        }
        let sum: u64 = node.children().values().map(SearchNode::visits).sum();
        assert_eq!(sum, node.visits());
        assert!(node.children().len() <= node.width());
        for child in node.children().values() {
            assert_consistent(child);
        }
    }

    #[test]
    fn test_uct_score() {
        assert_eq!(uct_score(0, 3, 1.0, 0.01, 1.0), 0.0);
        assert_eq!(uct_score(10, 0, 1.0, 0.01, 1.0), 0.0);
        let s = uct_score(10, 2, 0.99, 0.01, 1.0);
        let expected = 1.0 + (10f64.ln() / 2.0).sqrt();
        assert!((s - expected).abs() < 1e-12);
    }

    #[test]
    fn test_visit_counts() {
        let mut solver = TreeSearchSolver::new(problem(), Some(42));
        solver.run_for_count(100);

        let root = solver.root();
        assert_eq!(root.visits(), 100);
        assert_eq!(root.width(), 5);
        assert_eq!(root.children().len(), 5);
        assert_consistent(root);
    }

    #[test]
    fn test_running_mean() {
        let mut node = SearchNode::new(0);
        node.record(2.0);
        node.record(4.0);
        node.record(9.0);
        assert_eq!(node.visits(), 3);
        assert!((node.loss() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_leaf_mean_equals_leaf_loss() {
        let mut solver = TreeSearchSolver::new(problem(), Some(5));
        let (loss, binding) = solver.run_iteration();

        let mut node = solver.root();
        for &n in binding.assignments() {
            node = node.child(n).unwrap();
        }
        assert_eq!(node.visits(), 1);
        assert_eq!(node.loss(), loss);
        assert_eq!(solver.root().loss(), loss);
    }
}
