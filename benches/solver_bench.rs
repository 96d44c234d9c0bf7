use bindforge::binding::{BindingProblem, KeyBinding, ProblemParams};
use bindforge::geometry::{KeyRow, Keyboard};
use bindforge::solver::{RandomSolver, Solver, TreeSearchSolver};
use bindforge::types::{Ability, Combination};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

fn setup_problem() -> Arc<BindingProblem> {
    let mut kb = Keyboard::default();
    kb.add_key_row(&KeyRow::new(1.5, 1.0, ["1", "2", "3", "4", "5", "6"]), "", 0.0);
    kb.add_key_row(&KeyRow::new(2.5, 1.5, ["Q", "W", "E", "R", "T"]), "", 0.0);
    kb.add_key_row(&KeyRow::new(3.5, 1.8, ["A", "S", "D", "F", "G"]), "", 0.0);
    kb.add_key_row(&KeyRow::new(3.5, 1.8, ["A", "S", "D", "F", "G"]), "Shift", 4.0);
    kb.add_mouse_keys(&["Mouse4", "Mouse5"], 2.0, "", 0.0);
    let graph = kb.generate_graph().expect("Failed to build graph");

    let abilities: Vec<Ability> = (0..16)
        .map(|i| Ability::new(format!("ability {}", i), 1.0 + (i % 4) as f64))
        .collect();
    let combinations = (0..8)
        .map(|i| {
            Combination::new(
                format!("chain {}", i),
                1.0 + (i % 3) as f64,
                vec![i, (i * 3 + 1) % 16, (i * 5 + 2) % 16],
            )
        })
        .collect();
    let home_nodes = graph
        .node_indices(&["A", "S", "D", "F"])
        .expect("Missing home keys");

    let problem = ProblemParams::builder()
        .graph(graph)
        .abilities(abilities)
        .combinations(combinations)
        .home_nodes(home_nodes)
        .build()
        .into_problem()
        .expect("Failed to build problem");
    Arc::new(problem)
}

fn criterion_benchmark(c: &mut Criterion) {
    let problem = setup_problem();

    let mut binding = KeyBinding::new(problem.clone());
    for node in 0..problem.abilities().len() {
        binding.assign_next(node);
    }
    c.bench_function("eval_loss (16 abilities, 8 chains)", |b| {
        b.iter(|| black_box(&binding).eval_loss())
    });

    let mut random = RandomSolver::new(problem.clone(), Some(1));
    c.bench_function("random iteration", |b| b.iter(|| random.run_iteration()));

    let mut tree = TreeSearchSolver::new(problem, Some(1));
    c.bench_function("tree iteration", |b| b.iter(|| tree.run_iteration()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
