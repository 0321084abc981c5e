// crates/pf_physics/src/boundary.rs

//! 常用边界条件
//!
//! - [`ExtrapolatedBc`]: 零梯度外推，幽灵单元复制内侧状态（零通量壁面/出口）
//! - [`DirichletBc`]: 固定面值，幽灵单元取 `2·v − u_inside`，使面中点插值等于 `v`

use pf_mesh::{BoundaryCondition, Cell, Face};

/// 零梯度外推边界
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtrapolatedBc;

impl BoundaryCondition for ExtrapolatedBc {
    fn name(&self) -> &'static str {
        "extrapolated"
    }

    fn set_ghost_cell_values(&self, face: &mut Face, inside: &Cell, ghost: &mut Cell) {
        face.u.copy_from_slice(&inside.u);
        ghost.u.copy_from_slice(&inside.u);
    }
}

/// 固定值边界
#[derive(Debug, Clone)]
pub struct DirichletBc {
    values: Vec<f64>,
}

impl DirichletBc {
    /// 创建固定值边界，`values` 长度必须等于变量数
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// 边界值
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl BoundaryCondition for DirichletBc {
    fn name(&self) -> &'static str {
        "dirichlet"
    }

    fn set_ghost_cell_values(&self, face: &mut Face, inside: &Cell, ghost: &mut Cell) {
        for (((f, g), &u), &v) in face
            .u
            .iter_mut()
            .zip(ghost.u.iter_mut())
            .zip(&inside.u)
            .zip(&self.values)
        {
            *f = v;
            *g = 2.0 * v - u;
        }
    }

    fn num_vars(&self) -> Option<usize> {
        Some(self.values.len())
    }
}
