mod common;

use bindforge::geometry::{KeyRow, Keyboard};
use bindforge::graph::DistanceGraph;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(vec![], 0.0)]
#[case(vec![3], 0.0)]
#[case(vec![0, 4], 4.0)]
#[case(vec![0, 2, 1, 4], 6.0)]
#[case(vec![2, 2], 0.0)]
fn test_path_length_on_line(#[case] path: Vec<usize>, #[case] expected: f64) {
    let g = common::line_graph(5);
    assert_eq!(g.path_length(&path), expected);
}

#[test]
fn test_minimum_distance_to_home_set() {
    let g = common::line_graph(5);
    let home = g.node_indices(&["a", "b"]).unwrap();
    let reach: Vec<f64> = (0..5)
        .map(|n| g.minimum_distance(n, &home).unwrap())
        .collect();
    assert_eq!(reach, vec![0.0, 0.0, 1.0, 2.0, 3.0]);
}

prop_compose! {
    fn arb_keyboard()(
        rows in proptest::collection::vec((0.0..5.0f64, 0.0..3.0f64, 1usize..5), 1..4),
        mouse in 0usize..4,
        penalty in 0.0..10.0f64,
    ) -> Keyboard {
        let mut kb = Keyboard::default();
        for (r, (y, x, len)) in rows.into_iter().enumerate() {
            let keys: Vec<String> = (0..len).map(|i| format!("K{}_{}", r, i)).collect();
            let modifier = if r % 2 == 0 { "" } else { "Shift" };
            kb.add_key_row(&KeyRow::new(y, x, keys), modifier, penalty);
        }
        let buttons: Vec<String> = (0..mouse).map(|i| format!("Mouse{}", i)).collect();
        kb.add_mouse_keys(&buttons, penalty, "", 0.0);
        kb
    }
}

fn all_pairs(g: &DistanceGraph) -> Vec<(usize, usize)> {
    (0..g.size())
        .flat_map(|i| (0..g.size()).map(move |j| (i, j)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_generated_graph_is_symmetric(kb in arb_keyboard()) {
        let g = kb.generate_graph().unwrap();
        for (i, j) in all_pairs(&g) {
            prop_assert_eq!(g.minimum_distance(i, j).unwrap(), g.minimum_distance(j, i).unwrap());
            prop_assert!(g.distance(i, j) >= 0.0);
        }
        for i in 0..g.size() {
            prop_assert_eq!(g.minimum_distance(i, i).unwrap(), 0.0);
            prop_assert_eq!(g.path_length(&[i]), 0.0);
        }
    }

    #[test]
    fn test_minimum_distance_is_pairwise_min(
        a in proptest::collection::vec(0usize..6, 1..4),
        b in proptest::collection::vec(0usize..6, 1..4),
    ) {
        let g = common::line_graph(6);
        let expected = a.iter()
            .flat_map(|&i| b.iter().map(move |&j| (i as f64 - j as f64).abs()))
            .fold(f64::INFINITY, f64::min);
        prop_assert_eq!(g.minimum_distance(&a, &b).unwrap(), expected);
    }
}
