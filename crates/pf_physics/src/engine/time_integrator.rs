// crates/pf_physics/src/engine/time_integrator.rs

//! 伪时间显式积分器
//!
//! ## 显式 Euler
//!
//! ```text
//! U⁰    ← U                          （快照）
//! R     ← R(U)  [+ 物理时间项]
//! Δt    ← min(C · Δt_raw, 0.66 · Δt_real)
//! U     ← U⁰ − R · Δt / V
//! ```
//!
//! ## SSP-RK2 (Heun 方法)
//!
//! ```text
//! U¹    = U⁰ − Δt/V · R(U⁰)
//! U²    = U¹ − Δt/V · R(U¹)         （沿用第一级 Δt）
//! U     = ½ U⁰ + ½ U²
//! ```
//!
//! 两级结构对外不可见，外部接口与显式 Euler 相同。
//!
//! ## 收敛残差
//!
//! `|U − U⁰| / Δt` 逐单元逐变量按范数聚合，再除以网格平均 |U|。

use super::dual_time::RealTimeDiscretization;
use super::norm::ResidualNorm;
use super::timestep::TimeStepCalculator;
use crate::numerics::parallel::ParallelPolicy;
use crate::numerics::space_discretization::SpaceDiscretization;
use pf_config::{IntegratorKind, NormKind};
use pf_foundation::{PfError, PfResult};
use pf_mesh::Mesh;
use rayon::prelude::*;

/// 双时间步时伪时间步相对物理时间步的上界系数
pub const REAL_DT_SAFETY: f64 = 0.66;

/// 伪时间积分器
pub trait TimeIntegrator: Send {
    /// 积分器名称
    fn name(&self) -> &'static str;

    /// 推进一个伪时间步
    fn update_cell_averages(&mut self, mesh: &mut Mesh) -> PfResult<()>;

    /// 最近一步的归一化残差，每个变量一个值
    fn current_total_residual(&self, mesh: &Mesh, norm: NormKind) -> PfResult<Vec<f64>>;

    /// 设置 Courant 数
    fn set_courant_number(&mut self, courant_number: f64);

    /// 当前 Courant 数
    fn courant_number(&self) -> f64;

    /// 挂接物理时间离散（启用双时间步）
    fn set_real_time_discretization(&mut self, real_time: Box<dyn RealTimeDiscretization>);

    /// 已挂接的物理时间离散
    fn real_time_discretization(&self) -> Option<&dyn RealTimeDiscretization>;

    /// 进入下一物理时间层；未挂接物理时间离散时返回 `false`
    fn advance_real_time(&mut self, mesh: &Mesh) -> bool;
}

/// 显式积分器公共部分
struct ExplicitCore {
    space: SpaceDiscretization,
    time_step: Box<dyn TimeStepCalculator>,
    num_vars: usize,
    courant_number: f64,
    real_time: Option<Box<dyn RealTimeDiscretization>>,
    snapshot: Vec<f64>,
    policy: ParallelPolicy,
}

impl ExplicitCore {
    fn new(
        space: SpaceDiscretization,
        time_step: Box<dyn TimeStepCalculator>,
        num_vars: usize,
    ) -> Self {
        Self {
            space,
            time_step,
            num_vars,
            courant_number: 1.0,
            real_time: None,
            snapshot: Vec::new(),
            policy: ParallelPolicy::default(),
        }
    }

    fn check_mesh(&self, mesh: &Mesh) -> PfResult<()> {
        if mesh.num_vars() != self.num_vars {
            return Err(PfError::size_mismatch("num_vars", self.num_vars, mesh.num_vars()));
        }
        if self.time_step.num_vars() != self.num_vars {
            return Err(PfError::size_mismatch(
                "num_vars",
                self.num_vars,
                self.time_step.num_vars(),
            ));
        }
        self.space.check_num_vars(self.num_vars)
    }

    /// 保存当前 U 到 `buffer`
    fn save(mesh: &Mesh, buffer: &mut Vec<f64>) {
        buffer.clear();
        buffer.extend(mesh.cells().iter().flat_map(|c| c.u.iter().copied()));
    }

    /// 空间残差 + 物理时间项
    fn set_residuals(&mut self, mesh: &mut Mesh) -> PfResult<()> {
        self.space.set_residuals(mesh)?;
        if let Some(rt) = &self.real_time {
            rt.update_cell_residuals(mesh)?;
        }
        Ok(())
    }

    fn set_time_steps(&self, mesh: &mut Mesh) -> PfResult<()> {
        let bounded = self
            .real_time
            .as_ref()
            .map_or(f64::INFINITY, |rt| rt.dt() * REAL_DT_SAFETY);
        self.time_step
            .update_cell_time_steps(mesh, self.courant_number, bounded)
    }

    /// U ← U − R · dt / V
    fn explicit_update(&self, mesh: &mut Mesh) {
        mesh.cells_mut()
            .par_iter_mut()
            .with_min_len(self.policy.min_len)
            .for_each(|cell| {
                let dt_vol = cell.dt / cell.volume();
                for k in 0..cell.u.len() {
                    cell.u[k] -= cell.residual[k] * dt_vol;
                }
            });
    }

    fn total_residual(&self, mesh: &Mesh, norm: NormKind) -> PfResult<Vec<f64>> {
        let nv = self.num_vars;
        if self.snapshot.len() != mesh.n_cells() * nv {
            return Err(PfError::config(
                "尚未推进伪时间步，无法计算残差（先调用 update_cell_averages）",
            ));
        }
        let values: Vec<f64> = mesh
            .cells()
            .par_iter()
            .with_min_len(self.policy.min_len)
            .zip(self.snapshot.par_chunks(nv))
            .flat_map_iter(|(cell, u0)| {
                let dt = cell.dt;
                cell.u
                    .iter()
                    .zip(u0)
                    .map(move |(u, u0)| ((u - u0) / dt).abs())
            })
            .collect();

        let mut total = ResidualNorm::aggregate(norm, nv, &values);
        ResidualNorm::normalize(&mut total, mesh);
        Ok(total)
    }

    fn advance_real_time(&mut self, mesh: &Mesh) -> bool {
        match &mut self.real_time {
            Some(rt) => {
                rt.advance(mesh);
                log::info!("物理时间推进到 t = {:.6e}", rt.time());
                true
            }
            None => false,
        }
    }
}

// ============================================================
// 显式 Euler
// ============================================================

/// 显式 Euler 伪时间积分器
pub struct ExplicitEuler {
    core: ExplicitCore,
}

impl ExplicitEuler {
    /// 创建
    pub fn new(
        space: SpaceDiscretization,
        time_step: Box<dyn TimeStepCalculator>,
        num_vars: usize,
    ) -> Self {
        Self {
            core: ExplicitCore::new(space, time_step, num_vars),
        }
    }

    /// 设置并行粒度
    pub fn with_policy(mut self, policy: ParallelPolicy) -> Self {
        self.core.policy = policy;
        self
    }
}

impl TimeIntegrator for ExplicitEuler {
    fn name(&self) -> &'static str {
        "ExplicitEuler"
    }

    fn update_cell_averages(&mut self, mesh: &mut Mesh) -> PfResult<()> {
        self.core.check_mesh(mesh)?;
        ExplicitCore::save(mesh, &mut self.core.snapshot);
        self.core.set_residuals(mesh)?;
        self.core.set_time_steps(mesh)?;
        self.core.explicit_update(mesh);
        Ok(())
    }

    fn current_total_residual(&self, mesh: &Mesh, norm: NormKind) -> PfResult<Vec<f64>> {
        self.core.total_residual(mesh, norm)
    }

    fn set_courant_number(&mut self, courant_number: f64) {
        self.core.courant_number = courant_number;
    }

    fn courant_number(&self) -> f64 {
        self.core.courant_number
    }

    fn set_real_time_discretization(&mut self, real_time: Box<dyn RealTimeDiscretization>) {
        self.core.real_time = Some(real_time);
    }

    fn real_time_discretization(&self) -> Option<&dyn RealTimeDiscretization> {
        self.core.real_time.as_deref()
    }

    fn advance_real_time(&mut self, mesh: &Mesh) -> bool {
        self.core.advance_real_time(mesh)
    }
}

// ============================================================
// SSP-RK2
// ============================================================

/// 两级 SSP Runge-Kutta 伪时间积分器
pub struct SspRk2 {
    core: ExplicitCore,
}

impl SspRk2 {
    /// 创建
    pub fn new(
        space: SpaceDiscretization,
        time_step: Box<dyn TimeStepCalculator>,
        num_vars: usize,
    ) -> Self {
        Self {
            core: ExplicitCore::new(space, time_step, num_vars),
        }
    }

    /// 设置并行粒度
    pub fn with_policy(mut self, policy: ParallelPolicy) -> Self {
        self.core.policy = policy;
        self
    }
}

impl TimeIntegrator for SspRk2 {
    fn name(&self) -> &'static str {
        "SSP-RK2"
    }

    fn update_cell_averages(&mut self, mesh: &mut Mesh) -> PfResult<()> {
        self.core.check_mesh(mesh)?;
        ExplicitCore::save(mesh, &mut self.core.snapshot);

        // 第一级
        self.core.set_residuals(mesh)?;
        self.core.set_time_steps(mesh)?;
        self.core.explicit_update(mesh);

        // 第二级（沿用第一级时间步）
        self.core.set_residuals(mesh)?;
        self.core.explicit_update(mesh);

        // U = ½ U⁰ + ½ U²
        let nv = self.core.num_vars;
        mesh.cells_mut()
            .par_iter_mut()
            .with_min_len(self.core.policy.min_len)
            .zip(self.core.snapshot.par_chunks(nv))
            .for_each(|(cell, u0)| {
                for (u, &u0) in cell.u.iter_mut().zip(u0) {
                    *u = 0.5 * u0 + 0.5 * *u;
                }
            });
        Ok(())
    }

    fn current_total_residual(&self, mesh: &Mesh, norm: NormKind) -> PfResult<Vec<f64>> {
        self.core.total_residual(mesh, norm)
    }

    fn set_courant_number(&mut self, courant_number: f64) {
        self.core.courant_number = courant_number;
    }

    fn courant_number(&self) -> f64 {
        self.core.courant_number
    }

    fn set_real_time_discretization(&mut self, real_time: Box<dyn RealTimeDiscretization>) {
        self.core.real_time = Some(real_time);
    }

    fn real_time_discretization(&self) -> Option<&dyn RealTimeDiscretization> {
        self.core.real_time.as_deref()
    }

    fn advance_real_time(&mut self, mesh: &Mesh) -> bool {
        self.core.advance_real_time(mesh)
    }
}

/// 按类型创建积分器
pub fn create_integrator(
    kind: IntegratorKind,
    space: SpaceDiscretization,
    time_step: Box<dyn TimeStepCalculator>,
    num_vars: usize,
    policy: ParallelPolicy,
) -> Box<dyn TimeIntegrator> {
    match kind {
        IntegratorKind::ExplicitEuler => {
            Box::new(ExplicitEuler::new(space, time_step, num_vars).with_policy(policy))
        }
        IntegratorKind::SspRk2 => {
            Box::new(SspRk2::new(space, time_step, num_vars).with_policy(policy))
        }
    }
}
