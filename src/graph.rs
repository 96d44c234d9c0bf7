use crate::error::{BfResult, BindForgeError};
use fnv::FnvHashMap;
use itertools::Itertools;

/// Anything that can stand on one side of a distance query: a single node
/// index or a collection of them.
pub trait NodeSelection {
    fn as_nodes(&self) -> &[usize];
}

impl NodeSelection for usize {
    fn as_nodes(&self) -> &[usize] {
        std::slice::from_ref(self)
    }
}

impl NodeSelection for [usize] {
    fn as_nodes(&self) -> &[usize] {
        self
    }
}

impl NodeSelection for Vec<usize> {
    fn as_nodes(&self) -> &[usize] {
        self
    }
}

impl<const N: usize> NodeSelection for [usize; N] {
    fn as_nodes(&self) -> &[usize] {
        self
    }
}

impl<T: NodeSelection + ?Sized> NodeSelection for &T {
    fn as_nodes(&self) -> &[usize] {
        (**self).as_nodes()
    }
}

/// Weighted, undirected graph over named key positions.
///
/// The adjacency matrix is stored flattened (`i * size + j`) and kept
/// symmetric by every mutator.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceGraph {
    size: usize,
    names: Vec<String>,
    index: FnvHashMap<String, usize>,
    adjacency: Vec<f64>,
}

impl DistanceGraph {
    /// Creates a graph with all distances set to zero.
    pub fn new(names: Vec<String>) -> BfResult<Self> {
        if names.is_empty() {
            return Err(BindForgeError::Validation(
                "Distance graph must contain at least one node".to_string(),
            ));
        }

        let mut index = FnvHashMap::default();
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(BindForgeError::Validation(format!(
                    "Duplicate node name '{}'",
                    name
                )));
            }
        }

        let size = names.len();
        Ok(Self {
            size,
            names,
            index,
            adjacency: vec![0.0; size * size],
        })
    }

    /// Creates a graph from a full square matrix, validating symmetry.
    pub fn from_matrix(names: Vec<String>, rows: Vec<Vec<f64>>) -> BfResult<Self> {
        let mut graph = Self::new(names)?;
        let n = graph.size;

        if rows.len() != n || rows.iter().any(|r| r.len() != n) {
            return Err(BindForgeError::Validation(format!(
                "Adjacency matrix must be {}x{}",
                n, n
            )));
        }

        for (i, row) in rows.iter().enumerate() {
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(BindForgeError::Validation(format!(
                        "Invalid distance {} at ({}, {})",
                        d, i, j
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(BindForgeError::Validation(format!(
                        "Non-zero diagonal at node {}",
                        i
                    )));
                }
                if rows[j][i] != d {
                    return Err(BindForgeError::Validation(format!(
                        "Adjacency not symmetric at ({}, {})",
                        i, j
                    )));
                }
                graph.adjacency[i * n + j] = d;
            }
        }

        Ok(graph)
    }

    /// Sets the distance between `i` and `j` in both directions.
    pub fn set_distance(&mut self, i: usize, j: usize, distance: f64) -> BfResult<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(BindForgeError::Validation(format!(
                "Invalid distance {} between {} and {}",
                distance, i, j
            )));
        }
        if i == j {
            return Ok(());
        }
        self.adjacency[i * self.size + j] = distance;
        self.adjacency[j * self.size + i] = distance;
        Ok(())
    }

    #[inline(always)]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.adjacency[i * self.size + j]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, i: usize) -> Option<&str> {
        self.names.get(i).map(String::as_str)
    }

    pub fn node_index(&self, name: &str) -> BfResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| BindForgeError::UnknownNode(name.to_string()))
    }

    pub fn node_indices<S: AsRef<str>>(&self, names: &[S]) -> BfResult<Vec<usize>> {
        names.iter().map(|n| self.node_index(n.as_ref())).collect()
    }

    /// Smallest distance over every pair in `from × to`.
    pub fn minimum_distance<A, B>(&self, from: A, to: B) -> BfResult<f64>
    where
        A: NodeSelection,
        B: NodeSelection,
    {
        let from = from.as_nodes();
        let to = to.as_nodes();
        if from.is_empty() || to.is_empty() {
            return Err(BindForgeError::EmptySelection);
        }
        for &n in from.iter().chain(to.iter()) {
            self.check_index(n)?;
        }

        Ok(from
            .iter()
            .cartesian_product(to.iter())
            .map(|(&i, &j)| self.distance(i, j))
            .fold(f64::INFINITY, f64::min))
    }

    /// Sum of distances between consecutive nodes. Zero for fewer than two nodes.
    pub fn path_length(&self, path: &[usize]) -> f64 {
        path.iter()
            .tuple_windows()
            .map(|(&a, &b)| self.distance(a, b))
            .sum()
    }

    fn check_index(&self, i: usize) -> BfResult<()> {
        if i < self.size {
            Ok(())
        } else {
            Err(BindForgeError::Validation(format!(
                "Node index {} out of range (size {})",
                i, self.size
            )))
        }
    }
}
