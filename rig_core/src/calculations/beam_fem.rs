//! # Beam Finite Element Model
//!
//! Euler-Bernoulli beam on simple supports, discretized into 2-node Hermite
//! elements with two degrees of freedom per node:
//!
//! ```text
//!  DOF 2i   : transverse deflection v  (positive up)
//!  DOF 2i+1 : rotation θ = dv/dx       (positive counterclockwise)
//! ```
//!
//! ## Sign Convention
//! - Forces and deflections: positive upward (gravity loads are negative)
//! - Bending moment: positive sagging (tension on bottom fibre)
//!
//! ## Mesh
//!
//! The span is split into roughly `n_elements` equal elements. Supports are
//! always mesh nodes so their deflection can be fixed. Fixtures are nodes too,
//! unless they sit within a small fraction of an element from another anchor;
//! those few are lumped onto their two bracketing nodes by linear
//! interpolation, which preserves both the total force and its first moment.
//!
//! ## Reactions
//!
//! With two supports the beam is statically determinate and the reactions
//! come from equilibrium of the applied loads. With more, they are the
//! residual `K·d − F` at each support DOF.
//!
//! Point loads applied at nodes give exact nodal results for this element, so
//! the moment between nodes is linear and the deflection is the cubic Hermite
//! interpolant. A uniform load adds the fixed-end particular solution inside
//! each element.

use nalgebra::{DMatrix, DVector, Matrix4, Vector4};

use crate::errors::{RigError, RigResult};

/// Positions closer than this are the same point (m)
pub const MERGE_TOLERANCE_M: f64 = 1.0e-6;

/// Fixtures closer than this fraction of an element to an existing node are
/// lumped instead of receiving their own node.
const FIXTURE_SNAP_FRACTION: f64 = 0.05;

/// Interior sampling of each element for diagrams and envelopes
const SAMPLES_PER_ELEMENT: usize = 8;

/// Smallest accepted |pivot| relative to the largest in the LU factors
const PIVOT_RATIO_LIMIT: f64 = 1.0e-13;

// =============================================================================
// MESH
// =============================================================================

/// Sorted node positions along the span
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    nodes: Vec<f64>,
}

impl Mesh {
    /// Build a mesh over `[0, length_m]`.
    ///
    /// `supports` always become nodes. `fixtures` become nodes unless a support,
    /// an end, or an earlier fixture node is within a small fraction of the
    /// target element length.
    /// Gaps between those anchor points are filled with equal elements sized
    /// as close as possible to `length_m / n_elements`.
    pub fn build(length_m: f64, n_elements: usize, supports: &[f64], fixtures: &[f64]) -> Self {
        let target_h = length_m / n_elements.max(1) as f64;

        let mut anchors: Vec<f64> = supports.iter().copied().chain([0.0, length_m]).collect();
        anchors.sort_by(f64::total_cmp);
        anchors.dedup_by(|later, kept| (*later - *kept).abs() <= MERGE_TOLERANCE_M);

        let snap = FIXTURE_SNAP_FRACTION * target_h;
        let mut sorted_fixtures = fixtures.to_vec();
        sorted_fixtures.sort_by(f64::total_cmp);
        for x in sorted_fixtures {
            let idx = anchors.partition_point(|&a| a < x);
            let near_left = idx > 0 && x - anchors[idx - 1] <= snap;
            let near_right = idx < anchors.len() && anchors[idx] - x <= snap;
            if !near_left && !near_right {
                anchors.insert(idx, x);
            }
        }

        // Merging may have kept a point a hair inside either end
        if let Some(first) = anchors.first_mut() {
            *first = 0.0;
        }
        if let Some(last) = anchors.last_mut() {
            *last = length_m;
        }

        let mut nodes = Vec::with_capacity(n_elements + anchors.len());
        nodes.push(anchors[0]);
        for pair in anchors.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let parts = ((b - a) / target_h).round().max(1.0) as usize;
            let h = (b - a) / parts as f64;
            for i in 1..parts {
                nodes.push(a + h * i as f64);
            }
            nodes.push(b);
        }

        Self { nodes }
    }

    /// Node positions (m)
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements
    pub fn element_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Length of element `e` (m)
    pub fn element_length(&self, e: usize) -> f64 {
        self.nodes[e + 1] - self.nodes[e]
    }

    /// Index of the node at `x`, if one lies within the merge tolerance
    pub fn node_at(&self, x: f64) -> Option<usize> {
        let idx = self.nodes.partition_point(|&n| n < x);
        [idx.checked_sub(1), Some(idx)]
            .into_iter()
            .flatten()
            .filter(|&i| i < self.nodes.len())
            .find(|&i| (self.nodes[i] - x).abs() <= MERGE_TOLERANCE_M)
    }

    /// Bracketing nodes of `x` and the share of a load going to the right one
    pub fn bracket(&self, x: f64) -> (usize, usize, f64) {
        let last = self.nodes.len() - 1;
        let right = self.nodes.partition_point(|&n| n < x).clamp(1, last);
        let left = right - 1;
        let h = self.nodes[right] - self.nodes[left];
        let t = ((x - self.nodes[left]) / h).clamp(0.0, 1.0);
        (left, right, t)
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

/// Hermite beam element stiffness for DOFs `[v1, θ1, v2, θ2]`
fn element_stiffness(ei: f64, h: f64) -> Matrix4<f64> {
    let h2 = h * h;
    (ei / (h2 * h))
        * Matrix4::from_row_slice(&[
            12.0,
            6.0 * h,
            -12.0,
            6.0 * h,
            6.0 * h,
            4.0 * h2,
            -6.0 * h,
            2.0 * h2,
            -12.0,
            -6.0 * h,
            12.0,
            -6.0 * h,
            6.0 * h,
            2.0 * h2,
            -6.0 * h,
            4.0 * h2,
        ])
}

/// Work-equivalent nodal loads of a uniform load `q` (N/m, positive up)
fn uniform_load_vector(q: f64, h: f64) -> Vector4<f64> {
    Vector4::new(
        q * h / 2.0,
        q * h * h / 12.0,
        q * h / 2.0,
        -q * h * h / 12.0,
    )
}

/// Hermite interpolation of deflection at `s` from the left node
fn hermite_deflection(d: &Vector4<f64>, h: f64, s: f64) -> f64 {
    let xi = s / h;
    let xi2 = xi * xi;
    let xi3 = xi2 * xi;
    let n1 = 1.0 - 3.0 * xi2 + 2.0 * xi3;
    let n2 = h * (xi - 2.0 * xi2 + xi3);
    let n3 = 3.0 * xi2 - 2.0 * xi3;
    let n4 = h * (xi3 - xi2);
    n1 * d[0] + n2 * d[1] + n3 * d[2] + n4 * d[3]
}

// =============================================================================
// MODEL
// =============================================================================

/// Solved response of a [`BeamModel`]
#[derive(Debug, Clone)]
pub struct BeamResponse {
    /// Node positions (m)
    pub nodes: Vec<f64>,
    /// Nodal deflections (m, positive up)
    pub deflections: Vec<f64>,
    /// Nodal rotations (rad)
    pub rotations: Vec<f64>,
    /// Reaction at each support, in the order supports were added (N, positive up)
    pub support_reactions_n: Vec<f64>,
    /// Bending moment samples `(x, M)` (m, N·m, sagging positive)
    pub moment_samples: Vec<(f64, f64)>,
    /// Deflection samples `(x, v)` (m, m, positive up)
    pub deflection_samples: Vec<(f64, f64)>,
}

/// Beam with loads and supports ready to be solved
#[derive(Debug, Clone)]
pub struct BeamModel {
    mesh: Mesh,
    ei: f64,
    nodal_forces: Vec<f64>,
    uniform_load: f64,
    support_nodes: Vec<usize>,
}

impl BeamModel {
    /// Unloaded, unsupported beam of flexural rigidity `ei` (N·m²)
    pub fn new(mesh: Mesh, ei: f64) -> Self {
        let n = mesh.node_count();
        Self {
            mesh,
            ei,
            nodal_forces: vec![0.0; n],
            uniform_load: 0.0,
            support_nodes: Vec::new(),
        }
    }

    /// The mesh this model is built on
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Add a transverse point load (N, positive up), lumped onto the mesh
    pub fn add_point_load(&mut self, x: f64, force_n: f64) {
        if let Some(node) = self.mesh.node_at(x) {
            self.nodal_forces[node] += force_n;
            return;
        }
        let (left, right, t) = self.mesh.bracket(x);
        self.nodal_forces[left] += force_n * (1.0 - t);
        self.nodal_forces[right] += force_n * t;
    }

    /// Add a uniform load over the full span (N/m, positive up)
    pub fn add_uniform_load(&mut self, q_n_per_m: f64) {
        self.uniform_load += q_n_per_m;
    }

    /// Restrain deflection at `x`.
    ///
    /// The position must be a mesh node.
    pub fn add_support(&mut self, x: f64) -> RigResult<usize> {
        let node = self.mesh.node_at(x).ok_or_else(|| {
            RigError::singular(format!("support at x = {} m is not a mesh node", x))
        })?;
        self.support_nodes.push(node);
        Ok(node)
    }

    /// Total transverse load applied (N, positive up)
    pub fn total_load_n(&self) -> f64 {
        let span = self.mesh.nodes().last().copied().unwrap_or(0.0);
        self.nodal_forces.iter().sum::<f64>() + self.uniform_load * span
    }

    /// Assemble the global stiffness matrix and load vector
    fn assemble(&self) -> (DMatrix<f64>, DVector<f64>) {
        let dof = 2 * self.mesh.node_count();
        let mut stiffness = DMatrix::<f64>::zeros(dof, dof);
        let mut load = DVector::<f64>::zeros(dof);

        for e in 0..self.mesh.element_count() {
            let h = self.mesh.element_length(e);
            let local_k = element_stiffness(self.ei, h);
            let local_f = uniform_load_vector(self.uniform_load, h);
            let dof_map = [2 * e, 2 * e + 1, 2 * e + 2, 2 * e + 3];
            for (row_local, &global_row) in dof_map.iter().enumerate() {
                load[global_row] += local_f[row_local];
                for (col_local, &global_col) in dof_map.iter().enumerate() {
                    stiffness[(global_row, global_col)] += local_k[(row_local, col_local)];
                }
            }
        }

        for (node, force) in self.nodal_forces.iter().enumerate() {
            load[2 * node] += force;
        }

        (stiffness, load)
    }

    /// Solve for deflections, reactions and internal moments.
    ///
    /// # Errors
    ///
    /// [`RigError::SingularSystem`] when the supports do not restrain the beam
    /// (too few or coincident) or the factorization is numerically unusable.
    pub fn solve(&self) -> RigResult<BeamResponse> {
        let (stiffness, load) = self.assemble();
        let dof = load.len();

        let mut fixed = vec![false; dof];
        for &node in &self.support_nodes {
            fixed[2 * node] = true;
        }
        let free: Vec<usize> = (0..dof).filter(|&d| !fixed[d]).collect();

        let mut k_ff = DMatrix::<f64>::zeros(free.len(), free.len());
        let mut f_f = DVector::<f64>::zeros(free.len());
        for (row_idx, &row) in free.iter().enumerate() {
            f_f[row_idx] = load[row];
            for (col_idx, &col) in free.iter().enumerate() {
                k_ff[(row_idx, col_idx)] = stiffness[(row, col)];
            }
        }

        let lu = k_ff.lu();
        if !lu.is_invertible() {
            return Err(RigError::singular(
                "reduced stiffness matrix has a zero pivot; check support positions",
            ));
        }
        let (min_pivot, max_pivot) = lu
            .u()
            .diagonal()
            .iter()
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &p| {
                (lo.min(p.abs()), hi.max(p.abs()))
            });
        if !(min_pivot > max_pivot * PIVOT_RATIO_LIMIT) {
            return Err(RigError::singular(format!(
                "pivot ratio {:.3e} is below {:.0e}; supports do not restrain the truss",
                min_pivot / max_pivot,
                PIVOT_RATIO_LIMIT
            )));
        }
        let solution = lu
            .solve(&f_f)
            .ok_or_else(|| RigError::singular("LU back-substitution failed"))?;
        if solution.iter().any(|v| !v.is_finite()) {
            return Err(RigError::singular("solution contains non-finite values"));
        }

        let mut displacements = DVector::<f64>::zeros(dof);
        for (idx, &d) in free.iter().enumerate() {
            displacements[d] = solution[idx];
        }

        let support_reactions_n = match self.statically_determinate_reactions() {
            Some(reactions) => reactions,
            None => {
                let residual = &stiffness * &displacements - &load;
                self.support_nodes
                    .iter()
                    .map(|&node| residual[2 * node])
                    .collect()
            }
        };

        let (moment_samples, deflection_samples) = self.sample_elements(&displacements);

        let n = self.mesh.node_count();
        Ok(BeamResponse {
            nodes: self.mesh.nodes().to_vec(),
            deflections: (0..n).map(|i| displacements[2 * i]).collect(),
            rotations: (0..n).map(|i| displacements[2 * i + 1]).collect(),
            support_reactions_n,
            moment_samples,
            deflection_samples,
        })
    }

    /// Reactions from force and moment equilibrium, for exactly two supports.
    ///
    /// Exact for any mesh; the stiffness residual loses digits on long
    /// overhangs meshed finely.
    fn statically_determinate_reactions(&self) -> Option<Vec<f64>> {
        let [a, b] = self.support_nodes[..] else {
            return None;
        };
        let nodes = self.mesh.nodes();
        let (xa, xb) = (nodes[a], nodes[b]);
        let span = nodes.last().copied().unwrap_or(0.0);

        let uniform_total = self.uniform_load * span;
        let force: f64 = self.nodal_forces.iter().sum::<f64>() + uniform_total;
        let moment_about_a: f64 = self
            .nodal_forces
            .iter()
            .zip(nodes)
            .map(|(f, x)| f * (x - xa))
            .sum::<f64>()
            + uniform_total * (span / 2.0 - xa);

        let rb = -moment_about_a / (xb - xa);
        Some(vec![-force - rb, rb])
    }

    /// Recover moment and deflection at nodes and interior points
    fn sample_elements(&self, displacements: &DVector<f64>) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
        let capacity = self.mesh.element_count() * SAMPLES_PER_ELEMENT + 1;
        let mut moments = Vec::with_capacity(capacity);
        let mut deflections = Vec::with_capacity(capacity);
        let q = self.uniform_load;

        for e in 0..self.mesh.element_count() {
            let x0 = self.mesh.nodes()[e];
            let h = self.mesh.element_length(e);
            let d = Vector4::new(
                displacements[2 * e],
                displacements[2 * e + 1],
                displacements[2 * e + 2],
                displacements[2 * e + 3],
            );
            let end_forces = element_stiffness(self.ei, h) * d - uniform_load_vector(q, h);
            let shear_left = end_forces[0];
            let moment_left = end_forces[1];

            let first = if e == 0 { 0 } else { 1 };
            for j in first..=SAMPLES_PER_ELEMENT {
                let s = h * j as f64 / SAMPLES_PER_ELEMENT as f64;
                let moment = -moment_left + shear_left * s + q * s * s / 2.0;
                let particular = q * s * s * (h - s) * (h - s) / (24.0 * self.ei);
                moments.push((x0 + s, moment));
                deflections.push((x0 + s, hermite_deflection(&d, h, s) + particular));
            }
        }

        (moments, deflections)
    }
}
