//! Test geometry for the probe
//!
//! Test workloads are point clouds spread uniformly over the unit sphere.
//! They exist to push raw vertex/normal throughput, so their index buffer is
//! the identity and carries no topology.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WORKLOAD_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one generated workload for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkloadId(u64);

impl WorkloadId {
    fn next() -> Self {
        Self(NEXT_WORKLOAD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    /// Permanent object of the minimal scene, drawn as triangles.
    Baseline,
    /// Growing point cloud, drawn as points.
    Test,
}

/// Interleaved vertex layout for GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug)]
pub struct Workload {
    id: WorkloadId,
    kind: WorkloadKind,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Workload {
    /// Unit cube centred on the origin, 36 vertices with face normals.
    pub fn cube() -> Self {
        const FACES: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::Z, Vec3::NEG_X),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::X, Vec3::NEG_Y),
        ];

        let mut positions = Vec::with_capacity(36);
        let mut normals = Vec::with_capacity(36);
        for (normal, u, v) in FACES {
            let center = normal * 0.5;
            let corners = [
                center - u * 0.5 - v * 0.5,
                center + u * 0.5 - v * 0.5,
                center + u * 0.5 + v * 0.5,
                center - u * 0.5 + v * 0.5,
            ];
            for corner in [0, 1, 2, 0, 2, 3] {
                positions.push(corners[corner]);
                normals.push(normal);
            }
        }

        let indices = (0..positions.len() as u32).collect();
        Self {
            id: WorkloadId::next(),
            kind: WorkloadKind::Baseline,
            positions,
            normals,
            indices,
        }
    }

    pub fn id(&self) -> WorkloadId {
        self.id
    }

    pub fn kind(&self) -> WorkloadKind {
        self.kind
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertices(&self) -> Vec<GpuVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| GpuVertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }
}

/// Builds and releases test workloads. Keeps no reference to what it hands out.
pub struct WorkloadGenerator {
    rng: StdRng,
}

impl WorkloadGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, vertex_count: u32) -> Workload {
        let n = vertex_count as usize;
        let mut positions = Vec::with_capacity(n);
        let mut normals = Vec::with_capacity(n);

        for _ in 0..n {
            let theta = self.rng.random_range(0.0..TAU);
            let u: f32 = self.rng.random();
            // acos(2u - 1) gives equal area per sample; a uniform phi would
            // bunch points at the poles.
            let phi = (2.0 * u - 1.0).clamp(-1.0, 1.0).acos();

            let position = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
            positions.push(position);
            normals.push(position / position.length());
        }

        tracing::trace!(vertex_count, "generated workload");

        Workload {
            id: WorkloadId::next(),
            kind: WorkloadKind::Test,
            positions,
            normals,
            indices: (0..vertex_count).collect(),
        }
    }

    pub fn release(&mut self, workload: Workload) {
        tracing::trace!(
            id = workload.id.raw(),
            vertex_count = workload.vertex_count(),
            "released workload"
        );
        drop(workload);
    }
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self::new()
    }
}
