//! Collision partitioning
//!
//! Every pair of balls is a potential collision, so the collision graph over
//! `n` balls is the complete graph K_n. A [`Partition`] splits its edges into
//! an ordered list of [`Cell`]s, each of which is a matching: no ball appears
//! in two pairs of the same cell. Pairs inside a cell can therefore be
//! resolved concurrently; cells themselves must run one after the other.
//!
//! The partition only depends on the ball count, so it is built once per run.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A potential collision between two balls, always stored as `(lo, hi)`
pub type Edge = (usize, usize);

/// How a [`Partition`] decomposes K_n into matchings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartitionStrategy {
    /// First-fit greedy matching over the canonical edge order
    #[default]
    Greedy,
    /// Circle method for round-robin tournaments; the minimal cell count
    RoundRobin,
}

impl fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::RoundRobin => write!(f, "round-robin"),
        }
    }
}

impl FromStr for PartitionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "round-robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            other => Err(format!(
                "unknown partition strategy `{other}` (expected `greedy` or `round-robin`)"
            )),
        }
    }
}

/// A set of pairwise disjoint edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    edges: Vec<Edge>,
}

impl Cell {
    #[cfg(test)]
    pub(crate) fn from_edges(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }
}

impl<'a> IntoIterator for &'a Cell {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("cell {cell} holds edge ({a}, {b}) which is not an edge of K_{n}")]
    InvalidEdge { cell: usize, a: usize, b: usize, n: usize },

    #[error("edge ({a}, {b}) appears in more than one place")]
    DuplicateEdge { a: usize, b: usize },

    #[error("cell {cell} touches ball {index} more than once")]
    SharedIndex { cell: usize, index: usize },

    #[error("partition covers {found} edges, K_{n} has {expected}")]
    MissingEdge {
        n: usize,
        found: usize,
        expected: usize,
    },
}

/// Ordered decomposition of K_n into matchings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    cells: Vec<Cell>,
    body_count: usize,
}

impl Partition {
    /// Greedy first-fit partition of K_n
    ///
    /// Edges are enumerated as `(i, j)` for `i in 0..n`, `j in i+1..n`. Each
    /// round scans the remaining edges in that order and accepts an edge when
    /// neither endpoint is taken yet in the current cell. Accepted edges form
    /// the next cell; the rest carry over to the next round.
    pub fn build(n: usize) -> Self {
        let mut remaining = complete_graph(n);
        let mut cells = Vec::new();
        // A cell can never hold more than n / 2 edges
        let saturated = n / 2;

        while !remaining.is_empty() {
            let mut used = vec![false; n];
            let mut cell = Vec::with_capacity(saturated);
            let mut rest = Vec::with_capacity(remaining.len());

            for (a, b) in remaining {
                if cell.len() < saturated && !used[a] && !used[b] {
                    used[a] = true;
                    used[b] = true;
                    cell.push((a, b));
                } else {
                    rest.push((a, b));
                }
            }

            log::trace!("cell {}: {:?}", cells.len(), cell);
            cells.push(Cell { edges: cell });
            remaining = rest;
        }

        log::info!(
            "Partitioned {} potential collisions between {} balls into {} cells",
            n * n.saturating_sub(1) / 2,
            n,
            cells.len()
        );

        Self {
            cells,
            body_count: n,
        }
    }

    /// Round-robin partition of K_n: `n - 1` cells for even `n`, `n` for odd
    ///
    /// Ball `m - 1` stays fixed while the others rotate, where `m` is `n`
    /// rounded up to even. When `n` is odd the extra slot is a bye and its
    /// pairings are dropped.
    pub fn round_robin(n: usize) -> Self {
        if n < 2 {
            return Self {
                cells: Vec::new(),
                body_count: n,
            };
        }

        let m = if n % 2 == 0 { n } else { n + 1 };
        let ring = m - 1;
        let mut cells = Vec::with_capacity(ring);

        for round in 0..ring {
            let mut edges = Vec::with_capacity(m / 2);
            let mut push = |a: usize, b: usize| {
                if a < n && b < n {
                    edges.push((a.min(b), a.max(b)));
                }
            };

            push(round, ring);
            for k in 1..m / 2 {
                push((round + k) % ring, (round + ring - k) % ring);
            }

            edges.sort_unstable();
            log::trace!("cell {}: {:?}", cells.len(), edges);
            cells.push(Cell { edges });
        }

        log::info!(
            "Round-robin partition of {} balls into {} cells",
            n,
            cells.len()
        );

        Self {
            cells,
            body_count: n,
        }
    }

    pub fn build_with(n: usize, strategy: PartitionStrategy) -> Self {
        match strategy {
            PartitionStrategy::Greedy => Self::build(n),
            PartitionStrategy::RoundRobin => Self::round_robin(n),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of balls this partition was built for
    pub fn body_count(&self) -> usize {
        self.body_count
    }

    pub fn edge_count(&self) -> usize {
        self.cells.iter().map(Cell::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Check that the cells cover every edge of K_n exactly once and that each
    /// cell is a matching
    pub fn validate(&self) -> Result<(), PartitionError> {
        let n = self.body_count;
        let mut seen = HashSet::with_capacity(self.edge_count());

        for (cell_index, cell) in self.cells.iter().enumerate() {
            let mut touched = HashSet::with_capacity(cell.len() * 2);
            for &(a, b) in cell {
                if a >= b || b >= n {
                    return Err(PartitionError::InvalidEdge {
                        cell: cell_index,
                        a,
                        b,
                        n,
                    });
                }
                if !seen.insert((a, b)) {
                    return Err(PartitionError::DuplicateEdge { a, b });
                }
                for index in [a, b] {
                    if !touched.insert(index) {
                        return Err(PartitionError::SharedIndex {
                            cell: cell_index,
                            index,
                        });
                    }
                }
            }
        }

        let expected = n * n.saturating_sub(1) / 2;
        if seen.len() != expected {
            return Err(PartitionError::MissingEdge {
                n,
                found: seen.len(),
                expected,
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Edges of K_n in canonical order
fn complete_graph(n: usize) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            edges.push((i, j));
        }
    }
    edges
}
