// crates/pf_physics/src/numerics/space_discretization.rs

//! 空间离散
//!
//! 每次外迭代调用一次 [`SpaceDiscretization::set_residuals`]，顺序固定：
//!
//! 1. 施加边界条件：每个边界面调用一次所属边界的边界条件，写入面和幽灵单元状态
//! 2. 内部单元残差清零
//! 3. 按登记顺序运行各残差计算器
//!
//! 每一步在下一步开始前全部完成（rayon 并行循环返回即为屏障）。

use crate::numerics::parallel::ParallelPolicy;
use crate::numerics::residual::ResidualCalculator;
use pf_foundation::{PfError, PfResult};
use pf_mesh::{BoundaryStateMut, Mesh};
use rayon::prelude::*;

/// 空间离散
pub struct SpaceDiscretization {
    residuals: Vec<Box<dyn ResidualCalculator>>,
    policy: ParallelPolicy,
}

impl SpaceDiscretization {
    /// 用残差计算器序列创建
    pub fn new(residuals: Vec<Box<dyn ResidualCalculator>>) -> Self {
        Self {
            residuals,
            policy: ParallelPolicy::default(),
        }
    }

    /// 设置并行粒度
    pub fn with_policy(mut self, policy: ParallelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 已登记的计算器名称
    pub fn calculator_names(&self) -> Vec<&'static str> {
        self.residuals.iter().map(|r| r.name()).collect()
    }

    /// 检查所有残差计算器的变量数都等于 `num_vars`
    pub fn check_num_vars(&self, num_vars: usize) -> PfResult<()> {
        match self.residuals.iter().find(|r| r.num_vars() != num_vars) {
            Some(r) => Err(PfError::size_mismatch("num_vars", num_vars, r.num_vars())),
            None => Ok(()),
        }
    }

    /// 计算所有内部单元残差
    ///
    /// 计算器变量数与网格不一致时返回 [`PfError::SizeMismatch`]，不修改任何状态。
    pub fn set_residuals(&mut self, mesh: &mut Mesh) -> PfResult<()> {
        self.check_num_vars(mesh.num_vars())?;
        self.apply_boundary_conditions(mesh)?;

        mesh.cells_mut()
            .par_iter_mut()
            .with_min_len(self.policy.min_len)
            .for_each(|cell| cell.reset_residual());

        for residual in &mut self.residuals {
            residual.update_cell_residuals(mesh)?;
        }
        Ok(())
    }

    /// 施加边界条件
    ///
    /// 任一边界未绑定边界条件，或边界条件的变量数与网格不一致时返回错误，
    /// 且不修改任何状态。
    pub fn apply_boundary_conditions(&self, mesh: &mut Mesh) -> PfResult<()> {
        let num_vars = mesh.num_vars();
        for boundary in mesh.boundaries() {
            boundary.require_bc()?;
            boundary.check_bc_num_vars(num_vars)?;
        }

        let BoundaryStateMut {
            cells,
            boundary_faces,
            ghost_cells,
            boundaries,
        } = mesh.boundary_state_mut();

        boundary_faces
            .par_iter_mut()
            .zip(ghost_cells.par_iter_mut())
            .with_min_len(self.policy.min_len)
            .try_for_each(|(face, ghost)| {
                let b = face.boundary().ok_or_else(|| {
                    PfError::internal(format!("边界面 {} 未关联边界", face.index()))
                })?;
                let bc = boundaries[b.get()].require_bc()?;
                let inside = &cells[face.left().get()];
                bc.set_ghost_cell_values(face, inside, ghost);
                Ok(())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{DirichletBc, ExtrapolatedBc};
    use crate::equations::LinearTransport;
    use crate::numerics::residual::DiffusionResidual;
    use pf_mesh::RectMeshGenerator;
    use std::sync::Arc;

    #[test]
    fn test_missing_bc_is_fatal() {
        let mut mesh = RectMeshGenerator::new(2, 2, 1.0, 1.0).build(1).unwrap();
        mesh.set_boundary_condition("left", Arc::new(ExtrapolatedBc)).unwrap();
        mesh.set_boundary_condition("right", Arc::new(ExtrapolatedBc)).unwrap();
        mesh.set_boundary_condition("top", Arc::new(ExtrapolatedBc)).unwrap();

        let mut space = SpaceDiscretization::new(Vec::new());
        let err = space.set_residuals(&mut mesh).unwrap_err();
        assert!(matches!(
            err,
            PfError::MissingBoundaryCondition { ref boundary } if boundary == "bottom"
        ));
    }

    #[test]
    fn test_residual_reset() {
        let mut mesh = RectMeshGenerator::new(2, 2, 1.0, 1.0).build(1).unwrap();
        mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));
        for cell in mesh.cells_mut() {
            cell.residual[0] = 9.0;
            cell.u[0] = 1.5;
        }
        let mut space = SpaceDiscretization::new(Vec::new()).with_policy(ParallelPolicy::new(1));
        space.set_residuals(&mut mesh).unwrap();
        assert!(mesh.cells().iter().all(|c| c.residual[0] == 0.0));
        assert!(mesh.ghost_cells().iter().all(|g| g.u[0] == 1.5));
    }

    #[test]
    fn test_calculator_num_vars_mismatch() {
        let mut mesh = RectMeshGenerator::new(2, 2, 1.0, 1.0).build(2).unwrap();
        mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));
        for cell in mesh.cells_mut() {
            cell.residual[1] = 9.0;
        }
        let eq = Arc::new(LinearTransport::diffusion(vec![1.0]));
        let mut space = SpaceDiscretization::new(vec![Box::new(DiffusionResidual::new(eq))]);
        assert_eq!(space.calculator_names(), vec!["diffusion"]);

        let err = space.set_residuals(&mut mesh).unwrap_err();
        assert!(matches!(
            err,
            PfError::SizeMismatch { name: "num_vars", expected: 2, actual: 1 }
        ));
        assert!(mesh.cells().iter().all(|c| c.residual[1] == 9.0));
    }

    #[test]
    fn test_boundary_condition_num_vars_mismatch() {
        // 批量绑定不做检查，施加边界条件时拦截
        let mut mesh = RectMeshGenerator::new(2, 2, 1.0, 1.0).build(2).unwrap();
        mesh.set_all_boundary_conditions(Arc::new(DirichletBc::new(vec![1.0])));
        let mut space = SpaceDiscretization::new(Vec::new());
        let err = space.set_residuals(&mut mesh).unwrap_err();
        assert!(matches!(
            err,
            PfError::SizeMismatch { expected: 2, actual: 1, .. }
        ));
        assert!(mesh.ghost_cells().iter().all(|g| g.u == vec![0.0, 0.0]));
    }
}
