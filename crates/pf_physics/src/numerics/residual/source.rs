// crates/pf_physics/src/numerics/residual/source.rs

//! 源项残差：`R −= S(U, ∇U) · V`，每个单元只写自己。

use super::ResidualCalculator;
use crate::equations::{GoverningEquations, VarBuffer};
use crate::numerics::gradient::CellGradientCalculator;
use crate::numerics::parallel::ParallelPolicy;
use pf_foundation::PfResult;
use pf_mesh::{Mesh, Vector};
use rayon::prelude::*;
use std::sync::Arc;

/// 源项残差
pub struct SourceResidual {
    equations: Arc<dyn GoverningEquations>,
    gradient: Option<Arc<dyn CellGradientCalculator>>,
    policy: ParallelPolicy,
}

impl SourceResidual {
    /// 不依赖梯度的源项
    pub fn new(equations: Arc<dyn GoverningEquations>) -> Self {
        Self {
            equations,
            gradient: None,
            policy: ParallelPolicy::default(),
        }
    }

    /// 源项需要梯度时提供梯度计算器
    pub fn with_gradient(mut self, gradient: Arc<dyn CellGradientCalculator>) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// 设置并行粒度
    pub fn with_policy(mut self, policy: ParallelPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl ResidualCalculator for SourceResidual {
    fn name(&self) -> &'static str {
        "source"
    }

    fn num_vars(&self) -> usize {
        self.equations.num_vars()
    }

    fn update_cell_residuals(&mut self, mesh: &mut Mesh) -> PfResult<()> {
        let gradients = self.gradient.as_ref().map(|g| g.gradients(mesh));
        let zero = vec![Vector::ZERO; mesh.num_vars()];
        let equations = &self.equations;

        mesh.cells_mut()
            .par_iter_mut()
            .with_min_len(self.policy.min_len)
            .for_each(|cell| {
                let grads = gradients
                    .as_ref()
                    .map_or(zero.as_slice(), |g| g.cell(cell.index()));
                let mut s = VarBuffer::from_elem(0.0, cell.num_vars());
                equations.source(&cell.u, grads, &mut s);
                let volume = cell.volume();
                for (r, v) in cell.residual.iter_mut().zip(s) {
                    *r -= v * volume;
                }
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::LinearTransport;
    use pf_mesh::RectMeshGenerator;

    #[test]
    fn test_decay_source() {
        let mut mesh = RectMeshGenerator::new(2, 1, 2.0, 1.0).build(1).unwrap();
        for cell in mesh.cells_mut() {
            cell.u[0] = 2.0;
        }
        let eq = Arc::new(LinearTransport::new(1, Vector::ZERO).with_decay(vec![0.5]));
        SourceResidual::new(eq).update_cell_residuals(&mut mesh).unwrap();
        // S = −0.5·2 = −1, V = 1 → R = +1
        for cell in mesh.cells() {
            assert!((cell.residual[0] - 1.0).abs() < 1e-14);
        }
    }
}
