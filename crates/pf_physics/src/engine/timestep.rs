// crates/pf_physics/src/engine/timestep.rs

//! 局部时间步
//!
//! 每个单元的稳定性估计综合对流与扩散：
//!
//! ```text
//! Δt_raw = V / Σ_f ( λ_f A_f + 2 D_f A_f² / V )
//! Δt     = min( C · Δt_raw, Δt_bound )
//! ```
//!
//! λ_f 为面两侧沿面法向的最大特征速度，D_f 为两侧最大扩散系数。
//! 得到非有限时间步（例如无输运的网格且未给出上界）是数值错误。

use crate::equations::GoverningEquations;
use crate::numerics::parallel::ParallelPolicy;
use pf_foundation::{PfError, PfResult};
use pf_mesh::{Cell, Mesh};
use rayon::prelude::*;
use std::sync::Arc;

/// 局部时间步计算
pub trait TimeStepCalculator: Send + Sync {
    /// 控制方程的变量数
    fn num_vars(&self) -> usize;

    /// 设置所有内部单元的 `dt`
    ///
    /// # 参数
    /// - `courant_number`: Courant 数
    /// - `bounded_real_dt`: 时间步上界（无上界时为 `f64::INFINITY`）
    fn update_cell_time_steps(
        &self,
        mesh: &mut Mesh,
        courant_number: f64,
        bounded_real_dt: f64,
    ) -> PfResult<()>;
}

/// 基于控制方程的局部时间步
pub struct LocalTimeStep {
    equations: Arc<dyn GoverningEquations>,
    policy: ParallelPolicy,
}

impl LocalTimeStep {
    /// 创建
    pub fn new(equations: Arc<dyn GoverningEquations>) -> Self {
        Self {
            equations,
            policy: ParallelPolicy::default(),
        }
    }

    /// 设置并行粒度
    pub fn with_policy(mut self, policy: ParallelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 单元稳定时间步估计（未乘 Courant 数）
    pub fn stable_estimate(&self, mesh: &Mesh, cell: &Cell) -> f64 {
        let volume = cell.volume();
        let mut denominator = 0.0;
        for &f in cell.faces() {
            let face = mesh.face(f);
            let (left, right) = mesh.face_cells(face);
            let n = face.surface().unit_normal();
            let area = face.area();

            let lambda = self
                .equations
                .max_abs_eigenvalue(&left.u, n)
                .max(self.equations.max_abs_eigenvalue(&right.u, n));
            let diffusivity = self
                .equations
                .max_diffusivity(&left.u)
                .max(self.equations.max_diffusivity(&right.u));

            denominator += lambda * area + 2.0 * diffusivity * area * area / volume;
        }
        if denominator > 0.0 {
            volume / denominator
        } else {
            f64::INFINITY
        }
    }
}

impl TimeStepCalculator for LocalTimeStep {
    fn num_vars(&self) -> usize {
        self.equations.num_vars()
    }

    fn update_cell_time_steps(
        &self,
        mesh: &mut Mesh,
        courant_number: f64,
        bounded_real_dt: f64,
    ) -> PfResult<()> {
        let steps: Vec<f64> = mesh
            .cells()
            .par_iter()
            .with_min_len(self.policy.min_len)
            .map(|cell| (courant_number * self.stable_estimate(mesh, cell)).min(bounded_real_dt))
            .collect();

        if let Some((i, dt)) = steps
            .iter()
            .enumerate()
            .find(|(_, dt)| !(dt.is_finite() && **dt > 0.0))
        {
            return Err(PfError::numerical(format!(
                "单元 {} 的局部时间步无效: {}",
                i, dt
            )));
        }

        mesh.cells_mut()
            .par_iter_mut()
            .with_min_len(self.policy.min_len)
            .zip(steps.into_par_iter())
            .for_each(|(cell, dt)| cell.dt = dt);
        Ok(())
    }
}
