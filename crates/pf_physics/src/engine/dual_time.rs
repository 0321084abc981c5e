// crates/pf_physics/src/engine/dual_time.rs

//! 双时间步：物理时间导数项
//!
//! 伪时间迭代在每个物理时间层内推进到收敛。物理时间导数离散后
//! 作为额外残差加入：
//!
//! ```text
//! R += V · (U − Uⁿ) / Δt
//! ```
//!
//! 收敛后调用 [`RealTimeDiscretization::advance`] 把当前解移入 Uⁿ。

use pf_foundation::{PfError, PfResult};
use pf_mesh::Mesh;
use rayon::prelude::*;

/// 物理时间离散
pub trait RealTimeDiscretization: Send + Sync {
    /// 物理时间步
    fn dt(&self) -> f64;

    /// 把物理时间导数项加入内部单元残差
    fn update_cell_residuals(&self, mesh: &mut Mesh) -> PfResult<()>;

    /// 进入下一物理时间层
    fn advance(&mut self, mesh: &Mesh);

    /// 已推进的物理时间
    fn time(&self) -> f64;
}

/// 一阶后向 Euler
#[derive(Debug, Clone)]
pub struct BackwardEulerRealTime {
    dt: f64,
    time: f64,
    num_vars: usize,
    previous: Vec<f64>,
}

impl BackwardEulerRealTime {
    /// 以网格当前解作为 Uⁿ 创建
    pub fn new(mesh: &Mesh, dt: f64) -> PfResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PfError::config(format!("物理时间步必须为有限正数: {}", dt)));
        }
        let mut this = Self {
            dt,
            time: 0.0,
            num_vars: mesh.num_vars(),
            previous: Vec::new(),
        };
        this.store(mesh);
        Ok(this)
    }

    fn store(&mut self, mesh: &Mesh) {
        self.previous.clear();
        self.previous
            .extend(mesh.cells().iter().flat_map(|c| c.u.iter().copied()));
    }
}

impl RealTimeDiscretization for BackwardEulerRealTime {
    fn dt(&self) -> f64 {
        self.dt
    }

    fn update_cell_residuals(&self, mesh: &mut Mesh) -> PfResult<()> {
        let expected = mesh.n_cells() * self.num_vars;
        if self.previous.len() != expected {
            return Err(PfError::size_mismatch(
                "previous solution",
                expected,
                self.previous.len(),
            ));
        }
        let dt = self.dt;
        mesh.cells_mut()
            .par_iter_mut()
            .zip(self.previous.par_chunks(self.num_vars))
            .for_each(|(cell, un)| {
                let scale = cell.volume() / dt;
                for k in 0..un.len() {
                    cell.residual[k] += scale * (cell.u[k] - un[k]);
                }
            });
        Ok(())
    }

    fn advance(&mut self, mesh: &Mesh) {
        self.store(mesh);
        self.time += self.dt;
    }

    fn time(&self) -> f64 {
        self.time
    }
}
