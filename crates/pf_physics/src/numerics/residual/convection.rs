// crates/pf_physics/src/numerics/residual/convection.rs

//! 对流残差（Rusanov 通量）
//!
//! ```text
//! F̂ = ½ (F(u_L) + F(u_R))·n − ½ λ_max (u_R − u_L)
//! λ_max = max(|λ(u_L)|, |λ(u_R)|)
//! ```
//!
//! 给定梯度计算器时做线性重构：`u_L = U_L + ∇U_L · (x_f − x_L)`，
//! 右侧同理；幽灵单元没有梯度，边界面右值直接取幽灵单元状态。

use super::flux_accumulator::{gather_face_fluxes, FaceFluxBuffer};
use super::ResidualCalculator;
use crate::equations::{GoverningEquations, VarBuffer};
use crate::numerics::gradient::{CellGradientCalculator, CellGradients};
use crate::numerics::parallel::ParallelPolicy;
use pf_foundation::{CellIndex, PfResult};
use pf_mesh::{Face, Mesh};
use std::sync::Arc;

/// 对流残差
pub struct ConvectionResidual {
    equations: Arc<dyn GoverningEquations>,
    gradient: Option<Arc<dyn CellGradientCalculator>>,
    policy: ParallelPolicy,
    buffer: FaceFluxBuffer,
}

impl ConvectionResidual {
    /// 一阶（单元常值）对流
    pub fn new(equations: Arc<dyn GoverningEquations>) -> Self {
        Self {
            equations,
            gradient: None,
            policy: ParallelPolicy::default(),
            buffer: FaceFluxBuffer::new(0, 0),
        }
    }

    /// 启用线性重构
    pub fn with_reconstruction(mut self, gradient: Arc<dyn CellGradientCalculator>) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// 设置并行粒度
    pub fn with_policy(mut self, policy: ParallelPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn reconstruct(
        mesh: &Mesh,
        gradients: Option<&CellGradients>,
        cell: CellIndex,
        face: &Face,
        out: &mut [f64],
    ) {
        let c = mesh.cell(cell);
        out.copy_from_slice(&c.u);
        if let Some(g) = gradients {
            if !mesh.is_ghost(cell) {
                let r = c.centroid().vector_to(&face.surface().centroid);
                for (o, grad) in out.iter_mut().zip(g.cell(cell)) {
                    *o += grad.dot(r);
                }
            }
        }
    }

    fn face_flux(
        equations: &dyn GoverningEquations,
        mesh: &Mesh,
        gradients: Option<&CellGradients>,
        face: &Face,
        out: &mut [f64],
    ) {
        let nv = out.len();
        let n = face.surface().unit_normal();

        let mut ul = VarBuffer::from_elem(0.0, nv);
        let mut ur = VarBuffer::from_elem(0.0, nv);
        Self::reconstruct(mesh, gradients, face.left(), face, &mut ul);
        Self::reconstruct(mesh, gradients, face.right(), face, &mut ur);

        let mut fl = VarBuffer::from_elem(0.0, nv);
        let mut fr = VarBuffer::from_elem(0.0, nv);
        equations.convective_flux(&ul, n, &mut fl);
        equations.convective_flux(&ur, n, &mut fr);

        let lambda = equations
            .max_abs_eigenvalue(&ul, n)
            .max(equations.max_abs_eigenvalue(&ur, n));
        let area = face.area();

        for k in 0..nv {
            out[k] = (0.5 * (fl[k] + fr[k]) - 0.5 * lambda * (ur[k] - ul[k])) * area;
        }
    }
}

impl ResidualCalculator for ConvectionResidual {
    fn name(&self) -> &'static str {
        "convection"
    }

    fn num_vars(&self) -> usize {
        self.equations.num_vars()
    }

    fn update_cell_residuals(&mut self, mesh: &mut Mesh) -> PfResult<()> {
        let gradients = self.gradient.as_ref().map(|g| g.gradients(mesh));
        let equations = self.equations.as_ref();

        self.buffer.resize_for(mesh);
        self.buffer.evaluate(mesh, self.policy, |face, out| {
            Self::face_flux(equations, mesh, gradients.as_ref(), face, out)
        });
        gather_face_fluxes(mesh, &self.buffer, self.policy);
        Ok(())
    }
}
