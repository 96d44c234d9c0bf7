use crate::config::LossWeights;
use crate::error::{BfResult, BindForgeError};
use crate::graph::DistanceGraph;
use crate::types::{Ability, Combination};
use fnv::FnvHashMap;
use itertools::Itertools;
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ProblemParams {
    pub graph: DistanceGraph,
    pub abilities: Vec<Ability>,
    #[builder(default)]
    pub combinations: Vec<Combination>,
    pub home_nodes: Vec<usize>,
    #[builder(default)]
    pub weights: LossWeights,
}

impl ProblemParams {
    pub fn into_problem(self) -> BfResult<BindingProblem> {
        let ProblemParams {
            graph,
            abilities,
            combinations,
            home_nodes,
            weights,
        } = self;

        if abilities.is_empty() {
            return Err(BindForgeError::Validation(
                "Ability table is empty".to_string(),
            ));
        }
        if abilities.len() > graph.size() {
            return Err(BindForgeError::Validation(format!(
                "{} abilities cannot be bound to {} keys",
                abilities.len(),
                graph.size()
            )));
        }
        if home_nodes.is_empty() {
            return Err(BindForgeError::Validation(
                "Home node set is empty".to_string(),
            ));
        }

        let mut ability_index = FnvHashMap::default();
        for (i, a) in abilities.iter().enumerate() {
            if !(a.priority.is_finite() && a.priority > 0.0) {
                return Err(BindForgeError::Validation(format!(
                    "Ability '{}' has non-positive priority {}",
                    a.name, a.priority
                )));
            }
            if ability_index.insert(a.name.clone(), i).is_some() {
                return Err(BindForgeError::Validation(format!(
                    "Duplicate ability '{}'",
                    a.name
                )));
            }
        }

        for c in &combinations {
            if !(c.priority.is_finite() && c.priority > 0.0) {
                return Err(BindForgeError::Validation(format!(
                    "Combination '{}' has non-positive priority {}",
                    c.name, c.priority
                )));
            }
            if let Some(&bad) = c.indices.iter().find(|&&i| i >= abilities.len()) {
                return Err(BindForgeError::Validation(format!(
                    "Combination '{}' references ability ordinal {}",
                    c.name, bad
                )));
            }
        }

        for (label, value) in [
            ("individual_coefficient", weights.individual_coefficient),
            ("combination_coefficient", weights.combination_coefficient),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(BindForgeError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    label, value
                )));
            }
        }

        let node_preference = weights.get_node_preference()?;
        if let Some(pref) = &node_preference {
            if pref.len() != graph.size() {
                return Err(BindForgeError::Config(format!(
                    "node_preference has {} values, graph has {} nodes",
                    pref.len(),
                    graph.size()
                )));
            }
        }

        let home_distance = (0..graph.size())
            .map(|n| graph.minimum_distance(n, &home_nodes))
            .collect::<BfResult<Vec<f64>>>()?;

        Ok(BindingProblem {
            graph,
            abilities,
            combinations,
            home_nodes,
            individual_coefficient: weights.individual_coefficient,
            combination_coefficient: weights.combination_coefficient,
            node_preference,
            home_distance,
            ability_index,
        })
    }
}

/// Read-only inputs shared by every binding a solver creates.
#[derive(Debug)]
pub struct BindingProblem {
    graph: DistanceGraph,
    abilities: Vec<Ability>,
    combinations: Vec<Combination>,
    home_nodes: Vec<usize>,
    individual_coefficient: f64,
    combination_coefficient: f64,
    node_preference: Option<Vec<f64>>,

    // Distance from each node to its closest home node
    home_distance: Vec<f64>,
    ability_index: FnvHashMap<String, usize>,
}

impl BindingProblem {
    pub fn new(
        graph: DistanceGraph,
        abilities: Vec<Ability>,
        combinations: Vec<Combination>,
        home_nodes: Vec<usize>,
    ) -> BfResult<Self> {
        ProblemParams::builder()
            .graph(graph)
            .abilities(abilities)
            .combinations(combinations)
            .home_nodes(home_nodes)
            .build()
            .into_problem()
    }

    pub fn graph(&self) -> &DistanceGraph {
        &self.graph
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn home_nodes(&self) -> &[usize] {
        &self.home_nodes
    }

    pub fn ability_ordinal(&self, name: &str) -> Option<usize> {
        self.ability_index.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossBreakdown {
    pub individual: f64,
    pub combination: f64,
    pub total: f64,
}

/// A partial or complete assignment of abilities (by ordinal) to graph nodes.
///
/// `assignments[k]` is the node bound to ability `k`. `unassigned` is kept
/// sorted and always holds exactly the nodes not in `assignments`.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    problem: Arc<BindingProblem>,
    assignments: Vec<usize>,
    unassigned: Vec<usize>,
}

impl KeyBinding {
    pub fn new(problem: Arc<BindingProblem>) -> Self {
        let unassigned = (0..problem.graph.size()).collect();
        let capacity = problem.abilities.len();
        Self {
            problem,
            assignments: Vec::with_capacity(capacity),
            unassigned,
        }
    }

    pub fn problem(&self) -> &Arc<BindingProblem> {
        &self.problem
    }

    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    pub fn get_unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    pub fn has_assigned(&self, node: usize) -> bool {
        node < self.problem.graph.size() && self.unassigned.binary_search(&node).is_err()
    }

    pub fn fully_assigned(&self) -> bool {
        self.assignments.len() == self.problem.abilities.len()
    }

    /// Binds the next ability to `node`. Returns `false` and leaves the state
    /// untouched if the node is taken, unknown, or the binding is complete.
    pub fn assign_next(&mut self, node: usize) -> bool {
        if self.fully_assigned() {
            return false;
        }
        match self.unassigned.binary_search(&node) {
            Ok(pos) => {
                self.unassigned.remove(pos);
                self.assignments.push(node);
                true
            }
            Err(_) => false,
        }
    }

    /// The ability the next `assign_next` call will bind, if any.
    pub fn next_ability(&self) -> Option<&Ability> {
        self.problem.abilities.get(self.assignments.len())
    }

    pub fn get_assignment(&self, ability_name: &str) -> Option<usize> {
        self.problem
            .ability_ordinal(ability_name)
            .and_then(|k| self.assignments.get(k).copied())
    }

    /// Replaces the current state with an externally authored binding.
    ///
    /// Abilities are placed by ordinal. If some ability is missing, only the
    /// leading run of bound abilities is kept and the loss stays undefined.
    pub fn assign_from_data<A, K>(&mut self, binds: &[(A, K)]) -> BfResult<()>
    where
        A: AsRef<str>,
        K: AsRef<str>,
    {
        let ability_count = self.problem.abilities.len();
        let mut slots: Vec<Option<usize>> = vec![None; ability_count];
        let mut used = vec![false; self.problem.graph.size()];

        for (ability, key) in binds {
            let ability = ability.as_ref();
            let k = self
                .problem
                .ability_ordinal(ability)
                .ok_or_else(|| BindForgeError::UnknownAbility(ability.to_string()))?;
            let node = self.problem.graph.node_index(key.as_ref())?;

            if slots[k].is_some() {
                return Err(BindForgeError::Validation(format!(
                    "Ability '{}' is bound more than once",
                    ability
                )));
            }
            if used[node] {
                return Err(BindForgeError::Validation(format!(
                    "Key '{}' is bound more than once",
                    key.as_ref()
                )));
            }
            slots[k] = Some(node);
            used[node] = true;
        }

        self.assignments = slots.iter().map_while(|s| *s).collect();
        let mut taken = vec![false; self.problem.graph.size()];
        for &n in &self.assignments {
            taken[n] = true;
        }
        self.unassigned = (0..taken.len()).filter(|&n| !taken[n]).collect();

        if let Some(missing) = self.next_ability() {
            let dropped = binds.len() - self.assignments.len();
            warn!(
                "No key bound for '{}'; keeping {} of {} abilities and dropping {} later binds, loss is undefined",
                missing.name,
                self.assignments.len(),
                ability_count,
                dropped
            );
        }
        Ok(())
    }

    /// Loss of a complete binding, or NaN if any ability is still unbound.
    pub fn eval_loss(&self) -> f64 {
        self.loss_breakdown().map_or(f64::NAN, |b| b.total)
    }

    pub fn loss(&self) -> Option<f64> {
        self.loss_breakdown().map(|b| b.total)
    }

    pub fn loss_breakdown(&self) -> Option<LossBreakdown> {
        if !self.fully_assigned() {
            return None;
        }
        let p = &self.problem;

        let individual: f64 = self
            .assignments
            .iter()
            .zip(&p.abilities)
            .map(|(&node, ability)| {
                let reach = p.home_distance[node] / ability.priority;
                match &p.node_preference {
                    Some(pref) => reach + pref[node],
                    None => reach,
                }
            })
            .sum();

        let combination: f64 = p
            .combinations
            .iter()
            .map(|c| {
                let length: f64 = c
                    .indices
                    .iter()
                    .map(|&k| self.assignments[k])
                    .tuple_windows()
                    .map(|(a, b)| p.graph.distance(a, b))
                    .sum();
                length / c.priority
            })
            .sum();

        let individual = individual * p.individual_coefficient;
        let combination = combination * p.combination_coefficient;
        Some(LossBreakdown {
            individual,
            combination,
            total: individual + combination,
        })
    }

    /// `(ability name, key name)` for every bound ability, in ordinal order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.assignments
            .iter()
            .zip(&self.problem.abilities)
            .map(|(&node, ability)| {
                (
                    ability.name.as_str(),
                    self.problem.graph.name(node).unwrap_or("?"),
                )
            })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .pairs()
            .map(|(ability, key)| format!("{} : {}", ability, key))
            .join("\n");
        f.write_str(&text)
    }
}
