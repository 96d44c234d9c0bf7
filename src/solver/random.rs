use crate::binding::{BindingProblem, KeyBinding};
use crate::solver::{make_rng, BestTracker, Solver};
use std::sync::Arc;
use tracing::{debug, info};

/// Baseline: binds every ability to a uniformly random free key.
pub struct RandomSolver {
    problem: Arc<BindingProblem>,
    best: BestTracker,
    num_iter: usize,
    rng: fastrand::Rng,
}

impl RandomSolver {
    pub fn new(problem: Arc<BindingProblem>, seed: Option<u64>) -> Self {
        Self {
            problem,
            best: BestTracker::default(),
            num_iter: 0,
            rng: make_rng(seed),
        }
    }
}

impl Solver for RandomSolver {
    fn run_iteration(&mut self) -> (f64, KeyBinding) {
        let mut binding = KeyBinding::new(self.problem.clone());

        while !binding.fully_assigned() {
            let free = binding.get_unassigned();
            let node = free[self.rng.usize(0..free.len())];
            let assigned = binding.assign_next(node);
            debug_assert!(assigned);
        }

        let loss = binding.eval_loss();
        if self.best.offer(loss, &binding) {
            info!("New best loss: {:.4} (iteration {})", loss, self.num_iter);
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
