// crates/pf_physics/src/numerics/gradient/least_squares.rs

//! 最小二乘梯度计算
//!
//! 对每个单元最小化
//!
//! ```text
//! Σ_j (φ_j − φ_i − ∇φ_i · d_ij)²,   d_ij = x_j − x_i
//! ```
//!
//! 设计矩阵 A 的第 j 行为 d_ijᵀ，梯度为 `(AᵀA)⁻¹ Aᵀ Δφ`。
//! 伪逆只依赖几何，在建立阶段对每个单元计算一次并按列存储：
//! 第 j 列 `w_j = (AᵀA)⁻¹ d_ij`，求值时 `∇φ_i = Σ_j w_j (φ_j − φ_i)`。
//!
//! # 退化模板
//!
//! 二维网格所有 d_ij 的 z 分量为零，法方程矩阵秩亏。对每个坐标轴，
//! 若全部距离向量在该轴上的分量都小于 1e-15，就给每个距离向量加上同一个
//! 偏移（大小为模板最小距离），恢复满秩。偏移后仍奇异（独立方向不足 3 个）
//! 时建立失败，不输出 NaN 梯度。

use super::traits::CellGradientCalculator;
use crate::numerics::neighbors::{NeighborsCalculator, Stencil};
use crate::numerics::parallel::ParallelPolicy;
use glam::DMat3;
use pf_foundation::{CellIndex, PfError, PfResult};
use pf_mesh::{Cell, Mesh, Vector};
use rayon::prelude::*;
use smallvec::SmallVec;

/// 平坦轴判断阈值
const FLAT_AXIS_EPS: f64 = 1e-15;

/// 相对奇异阈值：|det| ≤ SINGULAR_RTOL · (trace/3)³
const SINGULAR_RTOL: f64 = 1e-12;

/// 单元模板与伪逆列
#[derive(Debug, Clone)]
struct CellStencil {
    neighbors: Stencil,
    weights: SmallVec<[Vector; 8]>,
}

/// 最小二乘梯度计算器
#[derive(Debug, Clone)]
pub struct LeastSquaresGradient {
    stencils: Vec<CellStencil>,
}

impl LeastSquaresGradient {
    /// 为网格所有内部单元建立模板和伪逆
    ///
    /// 网格索引必须已经冻结；之后重新编号会使预计算失效。
    pub fn new(mesh: &Mesh, neighbors: &dyn NeighborsCalculator) -> PfResult<Self> {
        Self::with_policy(mesh, neighbors, ParallelPolicy::default())
    }

    /// 指定并行粒度建立
    pub fn with_policy(
        mesh: &Mesh,
        neighbors: &dyn NeighborsCalculator,
        policy: ParallelPolicy,
    ) -> PfResult<Self> {
        let stencils = mesh
            .cells()
            .par_iter()
            .with_min_len(policy.min_len)
            .map(|cell| setup(mesh, cell, neighbors))
            .collect::<PfResult<Vec<_>>>()?;

        let max_len = stencils.iter().map(|s| s.neighbors.len()).max().unwrap_or(0);
        log::info!(
            "最小二乘梯度模板建立完成: {} 单元, 最大模板 {}",
            stencils.len(),
            max_len
        );
        Ok(Self { stencils })
    }

    /// 单元模板
    pub fn stencil(&self, cell: CellIndex) -> &[CellIndex] {
        &self.stencils[cell.get()].neighbors
    }

    /// 模板数（等于内部单元数）
    pub fn len(&self) -> usize {
        self.stencils.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.stencils.is_empty()
    }
}

fn setup(mesh: &Mesh, cell: &Cell, neighbors: &dyn NeighborsCalculator) -> PfResult<CellStencil> {
    let stencil = neighbors.calculate_for(mesh, cell);
    let center = cell.centroid();

    let mut distances: SmallVec<[Vector; 8]> = stencil
        .iter()
        .map(|&n| center.vector_to(&mesh.cell(n).centroid()))
        .collect();

    let min_distance = distances
        .iter()
        .map(|d| d.length())
        .reduce(f64::min)
        .unwrap_or(1.0);

    let mut shift = Vector::ZERO;
    for axis in 0..3 {
        if distances.iter().all(|d| d[axis].abs() < FLAT_AXIS_EPS) {
            shift[axis] = min_distance;
        }
    }
    if shift != Vector::ZERO {
        log::trace!("单元 {} 模板平坦轴偏移 {:?}", cell.index(), shift);
        for d in &mut distances {
            *d += shift;
        }
    }

    // AᵀA = Σ d dᵀ
    let normal = distances.iter().fold(DMat3::ZERO, |m, &d| {
        m + DMat3::from_cols(d * d.x, d * d.y, d * d.z)
    });

    let det = normal.determinant();
    let scale = (normal.x_axis.x + normal.y_axis.y + normal.z_axis.z) / 3.0;
    if !det.is_finite() || det.abs() <= SINGULAR_RTOL * scale.powi(3) || scale <= 0.0 {
        return Err(PfError::singular_stencil(cell.index().get(), det));
    }

    let inverse = normal.inverse();
    let weights = distances.iter().map(|&d| inverse * d).collect();

    Ok(CellStencil {
        neighbors: stencil,
        weights,
    })
}

impl CellGradientCalculator for LeastSquaresGradient {
    fn name(&self) -> &'static str {
        "least-squares"
    }

    fn for_cell(&self, mesh: &Mesh, cell: CellIndex) -> Vec<Vector> {
        let stencil = &self.stencils[cell.get()];
        let u = &mesh.cell(cell).u;

        let mut gradients = vec![Vector::ZERO; u.len()];
        for (&n, &w) in stencil.neighbors.iter().zip(&stencil.weights) {
            let un = &mesh.cell(n).u;
            for (var, g) in gradients.iter_mut().enumerate() {
                *g += w * (un[var] - u[var]);
            }
        }
        gradients
    }
}
