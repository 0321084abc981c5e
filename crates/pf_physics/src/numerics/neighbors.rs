// crates/pf_physics/src/numerics/neighbors.rs

//! 梯度模板邻居

use pf_foundation::CellIndex;
use pf_mesh::{Cell, Mesh};
use smallvec::SmallVec;

/// 单元模板（邻居单元索引，可能包含幽灵单元）
pub type Stencil = SmallVec<[CellIndex; 8]>;

/// 邻居计算
pub trait NeighborsCalculator: Send + Sync {
    /// 计算 `cell` 的梯度模板，顺序固定
    fn calculate_for(&self, mesh: &Mesh, cell: &Cell) -> Stencil;
}

/// 面相邻邻居：单元每个面另一侧的单元（边界面为幽灵单元）
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceBasedNeighbors;

impl NeighborsCalculator for FaceBasedNeighbors {
    fn calculate_for(&self, mesh: &Mesh, cell: &Cell) -> Stencil {
        cell.faces()
            .iter()
            .map(|&f| mesh.face(f).other_side(cell.index()))
            .collect()
    }
}
