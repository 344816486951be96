//! The device topology model.
//!
//! A [`Device`] describes one physical machine: which qubits exist, which
//! pairs can interact directly, and the fidelity estimate attached to each
//! qubit and coupling. Layout and routing passes hold it read-only for the
//! duration of a mapping computation.
//!
//! # Performance
//!
//! On construction, a distance matrix is precomputed using BFS from each
//! qubit. This enables O(1) `distance()` lookups and O(distance) path
//! reconstruction during routing, eliminating per-gate BFS.
//!
//! # Deserialization
//!
//! After deserialization, call [`rebuild_caches()`](Device::rebuild_caches)
//! to recompute the adjacency lists, the two-qubit fidelity index, and the
//! distance/predecessor matrices (all skipped during serialization).
//! Without this call, coupled pairs appear disconnected.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeviceError, DeviceResult};

/// Normalize an undirected pair to (lo, hi) key order.
#[inline]
fn ordered(q1: u32, q2: u32) -> (u32, u32) {
    if q1 <= q2 { (q1, q2) } else { (q2, q1) }
}

/// One physical device's connectivity and error-rate profile.
///
/// Constructed once from either a bare edge list ([`Device::from_edges`])
/// or a fully-specified coupling matrix with fidelities
/// ([`Device::from_matrix`]), then queried read-only. The coupling relation
/// is symmetric with no self-coupling; every fidelity lies in `[0.0, 1.0]`.
/// All of that is enforced at construction, so a published `Device` is safe
/// for unsynchronized concurrent reads.
///
/// # Examples
///
/// ```
/// use grani_device::Device;
///
/// let device = Device::from_edges("demo", 3, &[(0, 1), (1, 2)])?;
/// assert!(device.coupled(0, 1)?);
/// assert!(!device.coupled(0, 2)?);
/// assert_eq!(device.two_qubit_fidelity(1, 2)?, 1.0);
/// # Ok::<(), grani_device::DeviceError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Human-readable device name.
    name: String,
    /// Number of addressable physical qubits.
    num_qubits: u32,
    /// Coupling edges, normalized to (lo, hi), sorted, deduplicated.
    edges: Vec<(u32, u32)>,
    /// Single-qubit operation fidelity per qubit, length `num_qubits`.
    sq_fidelity: Vec<f64>,
    /// Two-qubit operation fidelity per edge, parallel to `edges`.
    edge_fidelity: Vec<f64>,
    /// Sorted neighbor lists per qubit.
    #[serde(skip)]
    adjacency: Vec<Vec<u32>>,
    /// Edge key → fidelity index for O(1) two-qubit lookups.
    #[serde(skip)]
    tq_fidelity: FxHashMap<(u32, u32), f64>,
    /// Precomputed all-pairs distance matrix. `dist_matrix[from][to]` is the
    /// shortest-path distance, or `u32::MAX` if unreachable.
    #[serde(skip)]
    dist_matrix: Vec<Vec<u32>>,
    /// Precomputed predecessor matrix for shortest-path reconstruction.
    /// `pred_matrix[from][to]` is the hop preceding `to` on the path from→to.
    #[serde(skip)]
    pred_matrix: Vec<Vec<u32>>,
}

impl Device {
    /// Create a device from a bare edge list.
    ///
    /// Each pair couples both directions. Every single-qubit fidelity and
    /// every coupled pair's two-qubit fidelity is initialized to `1.0`;
    /// refine them with [`with_single_qubit_fidelities`](Self::with_single_qubit_fidelities)
    /// and [`with_two_qubit_fidelity`](Self::with_two_qubit_fidelity)
    /// before publishing the device. Duplicate edges (including reversed
    /// pairs) are silently merged.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::ShapeMismatch`] if `num_qubits` is zero, an
    /// edge references a qubit outside `[0, num_qubits)`, or an edge is a
    /// self-loop.
    pub fn from_edges(
        name: impl Into<String>,
        num_qubits: u32,
        edges: &[(u32, u32)],
    ) -> DeviceResult<Self> {
        if num_qubits == 0 {
            return Err(DeviceError::ShapeMismatch(
                "device must have at least one qubit".into(),
            ));
        }
        for &(q1, q2) in edges {
            if q1 >= num_qubits || q2 >= num_qubits {
                return Err(DeviceError::ShapeMismatch(format!(
                    "edge ({q1}, {q2}) references a qubit outside [0, {num_qubits})"
                )));
            }
            if q1 == q2 {
                return Err(DeviceError::ShapeMismatch(format!(
                    "edge ({q1}, {q2}) is a self-loop"
                )));
            }
        }

        let mut normalized: Vec<(u32, u32)> = edges.iter().map(|&(a, b)| ordered(a, b)).collect();
        normalized.sort_unstable();
        normalized.dedup();

        Ok(Self::from_parts(name.into(), num_qubits, normalized))
    }

    /// Create a fully-specified device from a coupling matrix and fidelities.
    ///
    /// `coupling` must be a square `num_qubits × num_qubits` boolean
    /// relation, symmetric with a false diagonal. `sq_fidelity` must have
    /// exactly `num_qubits` entries. `tq_fidelity` must be square of the
    /// same size; its values are read only at coupled positions, where they
    /// must agree across the diagonal. Values at uncoupled positions are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::ShapeMismatch`] on any dimension, symmetry,
    /// or diagonal violation, and [`DeviceError::InvalidFidelity`] for a
    /// fidelity outside `[0.0, 1.0]`.
    pub fn from_matrix(
        name: impl Into<String>,
        num_qubits: u32,
        coupling: &[Vec<bool>],
        sq_fidelity: Vec<f64>,
        tq_fidelity: &[Vec<f64>],
    ) -> DeviceResult<Self> {
        if num_qubits == 0 {
            return Err(DeviceError::ShapeMismatch(
                "device must have at least one qubit".into(),
            ));
        }
        let n = num_qubits as usize;
        if coupling.len() != n {
            return Err(DeviceError::ShapeMismatch(format!(
                "coupling matrix has {} rows, expected {n}",
                coupling.len()
            )));
        }
        for (i, row) in coupling.iter().enumerate() {
            if row.len() != n {
                return Err(DeviceError::ShapeMismatch(format!(
                    "coupling matrix row {i} has {} columns, expected {n}",
                    row.len()
                )));
            }
        }
        for i in 0..n {
            if coupling[i][i] {
                return Err(DeviceError::ShapeMismatch(format!(
                    "qubit {i} is coupled to itself"
                )));
            }
            for j in (i + 1)..n {
                if coupling[i][j] != coupling[j][i] {
                    return Err(DeviceError::ShapeMismatch(format!(
                        "coupling matrix is asymmetric at ({i}, {j})"
                    )));
                }
            }
        }
        if sq_fidelity.len() != n {
            return Err(DeviceError::ShapeMismatch(format!(
                "single-qubit fidelities have {} entries, expected {n}",
                sq_fidelity.len()
            )));
        }
        for &value in &sq_fidelity {
            check_fidelity(value)?;
        }
        if tq_fidelity.len() != n {
            return Err(DeviceError::ShapeMismatch(format!(
                "two-qubit fidelity table has {} rows, expected {n}",
                tq_fidelity.len()
            )));
        }
        for (i, row) in tq_fidelity.iter().enumerate() {
            if row.len() != n {
                return Err(DeviceError::ShapeMismatch(format!(
                    "two-qubit fidelity row {i} has {} columns, expected {n}",
                    row.len()
                )));
            }
        }

        let mut edges = Vec::new();
        let mut edge_fidelity = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if coupling[i][j] {
                    let value = tq_fidelity[i][j];
                    if value != tq_fidelity[j][i] {
                        return Err(DeviceError::ShapeMismatch(format!(
                            "two-qubit fidelity is asymmetric at ({i}, {j})"
                        )));
                    }
                    check_fidelity(value)?;
                    edges.push((i as u32, j as u32));
                    edge_fidelity.push(value);
                }
            }
        }

        let mut device = Self::from_parts(name.into(), num_qubits, edges);
        device.sq_fidelity = sq_fidelity;
        device.edge_fidelity = edge_fidelity;
        device.rebuild_caches();
        Ok(device)
    }

    /// Build a device from normalized, in-range, deduplicated edges.
    /// Unit fidelities everywhere; all caches populated.
    fn from_parts(name: String, num_qubits: u32, edges: Vec<(u32, u32)>) -> Self {
        let mut device = Self {
            name,
            num_qubits,
            sq_fidelity: vec![1.0; num_qubits as usize],
            edge_fidelity: vec![1.0; edges.len()],
            edges,
            adjacency: Vec::new(),
            tq_fidelity: FxHashMap::default(),
            dist_matrix: Vec::new(),
            pred_matrix: Vec::new(),
        };
        device.rebuild_caches();
        debug!(
            "Built device '{}': {} qubits, {} couplings",
            device.name,
            device.num_qubits,
            device.edges.len()
        );
        device
    }

    /// Replace all single-qubit fidelities (pre-publication refinement).
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::ShapeMismatch`] if the length differs from
    /// the qubit count, or [`DeviceError::InvalidFidelity`] for a value
    /// outside `[0.0, 1.0]`.
    pub fn with_single_qubit_fidelities(mut self, fidelities: Vec<f64>) -> DeviceResult<Self> {
        if fidelities.len() != self.num_qubits as usize {
            return Err(DeviceError::ShapeMismatch(format!(
                "single-qubit fidelities have {} entries, expected {}",
                fidelities.len(),
                self.num_qubits
            )));
        }
        for &value in &fidelities {
            check_fidelity(value)?;
        }
        self.sq_fidelity = fidelities;
        Ok(self)
    }

    /// Set the two-qubit fidelity for one coupled pair (pre-publication
    /// refinement).
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] for an out-of-range index,
    /// [`DeviceError::NotCoupled`] if the pair is not coupled, or
    /// [`DeviceError::InvalidFidelity`] for a value outside `[0.0, 1.0]`.
    pub fn with_two_qubit_fidelity(mut self, q1: u32, q2: u32, fidelity: f64) -> DeviceResult<Self> {
        if !self.coupled(q1, q2)? {
            return Err(DeviceError::NotCoupled {
                qubit1: q1,
                qubit2: q2,
            });
        }
        check_fidelity(fidelity)?;
        let key = ordered(q1, q2);
        if let Some(idx) = self.edges.iter().position(|&e| e == key) {
            self.edge_fidelity[idx] = fidelity;
        }
        self.tq_fidelity.insert(key, fidelity);
        Ok(self)
    }

    /// Create a linear chain device (0-1-2-...) with unit fidelities.
    pub fn linear(name: impl Into<String>, num_qubits: u32) -> Self {
        let edges: Vec<_> = (0..num_qubits.saturating_sub(1))
            .map(|i| (i, i + 1))
            .collect();
        Self::from_parts(name.into(), num_qubits.max(1), edges)
    }

    /// Create a ring device (0-1-2-...-0) with unit fidelities.
    ///
    /// For fewer than three qubits the wraparound edge collapses and the
    /// result degenerates to a linear chain.
    pub fn ring(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut edges: Vec<_> = (0..num_qubits.saturating_sub(1))
            .map(|i| (i, i + 1))
            .collect();
        if num_qubits >= 3 {
            edges.push((0, num_qubits - 1));
        }
        edges.sort_unstable();
        Self::from_parts(name.into(), num_qubits.max(1), edges)
    }

    /// Create a star device (qubit 0 coupled to all others) with unit
    /// fidelities.
    pub fn star(name: impl Into<String>, num_qubits: u32) -> Self {
        let edges: Vec<_> = (1..num_qubits).map(|i| (0, i)).collect();
        Self::from_parts(name.into(), num_qubits.max(1), edges)
    }

    /// Create a fully connected device with unit fidelities.
    pub fn full(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut edges = Vec::new();
        for i in 0..num_qubits {
            for j in (i + 1)..num_qubits {
                edges.push((i, j));
            }
        }
        Self::from_parts(name.into(), num_qubits.max(1), edges)
    }

    /// Create a 2D grid device (row-major indexing) with unit fidelities.
    pub fn grid(name: impl Into<String>, rows: u32, cols: u32) -> Self {
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let idx = r * cols + c;
                // Horizontal edge
                if c + 1 < cols {
                    edges.push((idx, idx + 1));
                }
                // Vertical edge
                if r + 1 < rows {
                    edges.push((idx, idx + cols));
                }
            }
        }
        edges.sort_unstable();
        Self::from_parts(name.into(), (rows * cols).max(1), edges)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the coupling edges, normalized to (lo, hi) and sorted.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Check whether two qubits are directly coupled.
    ///
    /// Symmetric; a qubit is never coupled to itself.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] if either index is outside
    /// `[0, num_qubits)`.
    pub fn coupled(&self, q1: u32, q2: u32) -> DeviceResult<bool> {
        self.check_qubit(q1)?;
        self.check_qubit(q2)?;
        Ok(self
            .adjacency
            .get(q1 as usize)
            .is_some_and(|neighbors| neighbors.binary_search(&q2).is_ok()))
    }

    /// Get the single-qubit operation fidelity for a qubit.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] if the index is outside
    /// `[0, num_qubits)`.
    pub fn single_qubit_fidelity(&self, qubit: u32) -> DeviceResult<f64> {
        self.check_qubit(qubit)?;
        Ok(self.sq_fidelity[qubit as usize])
    }

    /// Get the two-qubit operation fidelity for a coupled pair.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] if either index is outside
    /// `[0, num_qubits)`, or [`DeviceError::NotCoupled`] if both indices
    /// are valid but the pair is not coupled. Never falls back to a
    /// default value.
    pub fn two_qubit_fidelity(&self, q1: u32, q2: u32) -> DeviceResult<f64> {
        if !self.coupled(q1, q2)? {
            return Err(DeviceError::NotCoupled {
                qubit1: q1,
                qubit2: q2,
            });
        }
        self.tq_fidelity
            .get(&ordered(q1, q2))
            .copied()
            .ok_or(DeviceError::NotCoupled {
                qubit1: q1,
                qubit2: q2,
            })
    }

    /// Get the neighbors of a qubit, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] if the index is outside
    /// `[0, num_qubits)`.
    pub fn neighbors(&self, qubit: u32) -> DeviceResult<&[u32]> {
        self.check_qubit(qubit)?;
        Ok(self
            .adjacency
            .get(qubit as usize)
            .map_or(&[][..], Vec::as_slice))
    }

    /// Get the number of qubits directly coupled to a qubit.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] if the index is outside
    /// `[0, num_qubits)`.
    pub fn degree(&self, qubit: u32) -> DeviceResult<usize> {
        Ok(self.neighbors(qubit)?.len())
    }

    /// Shortest-path distance between two qubits, `None` if disconnected.
    ///
    /// O(1) lookup from the precomputed matrix; falls back to per-query
    /// BFS over the edge list if the caches are absent.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] if either index is outside
    /// `[0, num_qubits)`.
    pub fn distance(&self, from: u32, to: u32) -> DeviceResult<Option<u32>> {
        self.check_qubit(from)?;
        self.check_qubit(to)?;
        if from == to {
            return Ok(Some(0));
        }

        let (f, t) = (from as usize, to as usize);
        if f < self.dist_matrix.len() && t < self.dist_matrix[f].len() {
            let d = self.dist_matrix[f][t];
            return Ok(if d == u32::MAX { None } else { Some(d) });
        }

        Ok(self.distance_bfs(from, to))
    }

    /// Reconstruct a shortest path from→to using the predecessor matrix.
    ///
    /// Returns `None` if no path exists or the caches have not been
    /// rebuilt after deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QubitOutOfRange`] if either index is outside
    /// `[0, num_qubits)`.
    pub fn shortest_path(&self, from: u32, to: u32) -> DeviceResult<Option<Vec<u32>>> {
        self.check_qubit(from)?;
        self.check_qubit(to)?;
        if from == to {
            return Ok(Some(vec![from]));
        }

        let (f, t) = (from as usize, to as usize);
        if f >= self.pred_matrix.len() || t >= self.pred_matrix[f].len() {
            return Ok(None);
        }
        if self.dist_matrix[f][t] == u32::MAX {
            return Ok(None);
        }

        // Walk the predecessor chain backwards from `to`.
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            let pred = self.pred_matrix[f][current as usize];
            if pred == u32::MAX {
                return Ok(None);
            }
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Ok(Some(path))
    }

    /// Rebuild the adjacency lists, two-qubit fidelity index, and
    /// distance/predecessor matrices from the serialized fields. Must be
    /// called after deserialization, before the device is published.
    pub fn rebuild_caches(&mut self) {
        let n = self.num_qubits as usize;
        self.adjacency = vec![Vec::new(); n];
        for &(q1, q2) in &self.edges {
            self.adjacency[q1 as usize].push(q2);
            self.adjacency[q2 as usize].push(q1);
        }
        for neighbors in &mut self.adjacency {
            neighbors.sort_unstable();
        }
        self.tq_fidelity = self
            .edges
            .iter()
            .copied()
            .zip(self.edge_fidelity.iter().copied())
            .collect();
        self.precompute_distances();
    }

    /// Precompute all-pairs shortest paths using BFS from each qubit.
    fn precompute_distances(&mut self) {
        let n = self.num_qubits as usize;
        self.dist_matrix = vec![vec![u32::MAX; n]; n];
        self.pred_matrix = vec![vec![u32::MAX; n]; n];

        for src in 0..n {
            self.dist_matrix[src][src] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(src as u32);

            while let Some(current) = queue.pop_front() {
                let cur = current as usize;
                for &neighbor in &self.adjacency[cur] {
                    let nb = neighbor as usize;
                    if self.dist_matrix[src][nb] == u32::MAX {
                        self.dist_matrix[src][nb] = self.dist_matrix[src][cur] + 1;
                        self.pred_matrix[src][nb] = current;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    /// BFS fallback over the edge list, for devices whose caches have not
    /// been rebuilt after deserialization.
    fn distance_bfs(&self, from: u32, to: u32) -> Option<u32> {
        let n = self.num_qubits as usize;
        let mut adjacency = vec![Vec::new(); n];
        for &(q1, q2) in &self.edges {
            adjacency[q1 as usize].push(q2);
            adjacency[q2 as usize].push(q1);
        }

        let mut dist = vec![u32::MAX; n];
        dist[from as usize] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for &neighbor in &adjacency[current as usize] {
                if dist[neighbor as usize] == u32::MAX {
                    dist[neighbor as usize] = dist[current as usize] + 1;
                    if neighbor == to {
                        return Some(dist[neighbor as usize]);
                    }
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    #[inline]
    fn check_qubit(&self, qubit: u32) -> DeviceResult<()> {
        if qubit < self.num_qubits {
            Ok(())
        } else {
            Err(DeviceError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            })
        }
    }
}

/// Validate a fidelity value at construction time.
#[inline]
fn check_fidelity(value: f64) -> DeviceResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DeviceError::InvalidFidelity { value })
    }
}
