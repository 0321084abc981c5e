// crates/pf_physics/src/numerics/gradient/traits.rs

//! 梯度计算 trait 和存储类型

use pf_foundation::CellIndex;
use pf_mesh::{Mesh, Vector};
use rayon::prelude::*;

/// 全部内部单元的梯度（单元 × 变量，行主序）
#[derive(Debug, Clone, Default)]
pub struct CellGradients {
    num_vars: usize,
    data: Vec<Vector>,
}

impl CellGradients {
    /// 由扁平数据创建
    pub fn from_flat(num_vars: usize, data: Vec<Vector>) -> Self {
        debug_assert!(num_vars == 0 || data.len() % num_vars == 0);
        Self { num_vars, data }
    }

    /// 变量数
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// 单元数
    pub fn len(&self) -> usize {
        if self.num_vars == 0 {
            0
        } else {
            self.data.len() / self.num_vars
        }
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 单元梯度（每变量一个向量）
    #[inline]
    pub fn cell(&self, cell: CellIndex) -> &[Vector] {
        let start = cell.get() * self.num_vars;
        &self.data[start..start + self.num_vars]
    }
}

/// 单元梯度计算
pub trait CellGradientCalculator: Send + Sync {
    /// 方法名称
    fn name(&self) -> &'static str;

    /// 计算内部单元 `cell` 的梯度，每个变量一个向量
    ///
    /// 读取模板中邻居（含幽灵单元）的当前 U，调用前应已施加边界条件。
    fn for_cell(&self, mesh: &Mesh, cell: CellIndex) -> Vec<Vector>;

    /// 计算全部内部单元的梯度
    fn gradients(&self, mesh: &Mesh) -> CellGradients {
        let data: Vec<Vector> = mesh
            .cells()
            .par_iter()
            .flat_map_iter(|cell| self.for_cell(mesh, cell.index()))
            .collect();
        CellGradients::from_flat(mesh.num_vars(), data)
    }
}
