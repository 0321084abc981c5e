// crates/pf_physics/src/numerics/residual/diffusion.rs

//! 扩散残差
//!
//! 面法向梯度采用平均梯度加形心连线修正：
//!
//! ```text
//! e      = (x_R − x_L) / |x_R − x_L|
//! ∇u_f   = ḡ + ((u_R − u_L)/|x_R − x_L| − ḡ·e) e
//! flux   = −D_f (∇u_f · n) A
//! ```
//!
//! ḡ 为两侧单元梯度平均；边界面只用内侧单元梯度。
//! 未给出梯度计算器时 ḡ = 0，退化为两点格式（1D 网格使用这一模式）。
//! D_f 取两侧扩散系数的算术平均。

use super::flux_accumulator::{gather_face_fluxes, FaceFluxBuffer};
use super::ResidualCalculator;
use crate::equations::{GoverningEquations, VarBuffer};
use crate::numerics::gradient::{CellGradientCalculator, CellGradients};
use crate::numerics::parallel::ParallelPolicy;
use pf_foundation::PfResult;
use pf_mesh::{Face, Mesh, Vector};
use std::sync::Arc;

/// 扩散残差
pub struct DiffusionResidual {
    equations: Arc<dyn GoverningEquations>,
    gradient: Option<Arc<dyn CellGradientCalculator>>,
    policy: ParallelPolicy,
    buffer: FaceFluxBuffer,
}

impl DiffusionResidual {
    /// 两点格式
    pub fn new(equations: Arc<dyn GoverningEquations>) -> Self {
        Self {
            equations,
            gradient: None,
            policy: ParallelPolicy::default(),
            buffer: FaceFluxBuffer::new(0, 0),
        }
    }

    /// 使用单元梯度做非正交修正
    pub fn with_gradient(mut self, gradient: Arc<dyn CellGradientCalculator>) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// 设置并行粒度
    pub fn with_policy(mut self, policy: ParallelPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn face_flux(
        equations: &dyn GoverningEquations,
        mesh: &Mesh,
        gradients: Option<&CellGradients>,
        face: &Face,
        out: &mut [f64],
    ) {
        let (left, right) = mesh.face_cells(face);
        let d = left.centroid().vector_to(&right.centroid());
        let dist = d.length();
        if dist <= 0.0 {
            return;
        }
        let e = d / dist;
        let n = face.surface().unit_normal();
        let nv = out.len();

        let mut dl = VarBuffer::from_elem(0.0, nv);
        let mut dr = VarBuffer::from_elem(0.0, nv);
        equations.diffusivity(&left.u, &mut dl);
        equations.diffusivity(&right.u, &mut dr);

        for k in 0..nv {
            let avg = match gradients {
                Some(g) => {
                    let gl = g.cell(face.left())[k];
                    if face.is_boundary() {
                        gl
                    } else {
                        0.5 * (gl + g.cell(face.right())[k])
                    }
                }
                None => Vector::ZERO,
            };
            let jump = (right.u[k] - left.u[k]) / dist;
            let grad_f = avg + (jump - avg.dot(e)) * e;
            let d_f = 0.5 * (dl[k] + dr[k]);
            out[k] = -d_f * grad_f.dot(n) * face.area();
        }
    }
}

impl ResidualCalculator for DiffusionResidual {
    fn name(&self) -> &'static str {
        "diffusion"
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
