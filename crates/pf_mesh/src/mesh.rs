// crates/pf_mesh/src/mesh.rs

//! 网格容器
//!
//! 扁平数组 + 索引关系存储网格：
//!
//! ```text
//! cells        [0, N)          内部单元
//! ghost_cells  [N, N+G)        幽灵单元，第 k 个属于边界面 n_interior_faces + k
//! faces        [0, Fi)         内部面
//!              [Fi, Fi+G)      边界面（按边界顺序）
//! nodes        [0, M)          真实节点
//! ghost_nodes  [M, M+K)        镜像节点
//! ```
//!
//! 幽灵单元和镜像节点不出现在内部列表中，只通过边界面的 `right` 引用。
//! 索引在 [`MeshBuilder`](crate::builder::MeshBuilder) 中一次性分配后冻结，
//! 之后只有求解状态会被修改。

use crate::boundary::{Boundary, BoundaryCondition};
use crate::entities::{Cell, Face, Node};
use crate::geometry::Point;
use pf_foundation::{BoundaryIndex, CellIndex, FaceIndex, KahanSum, NodeIndex, PfError, PfResult};
use std::sync::Arc;

/// 非结构多面体网格
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) num_vars: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) ghost_nodes: Vec<Node>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) ghost_cells: Vec<Cell>,
    pub(crate) faces: Vec<Face>,
    pub(crate) n_interior_faces: usize,
    pub(crate) boundaries: Vec<Boundary>,
}

/// 边界条件施加阶段的分离借用
///
/// 内部单元只读；边界面与幽灵单元一一对应，可以按面并行写入。
pub struct BoundaryStateMut<'a> {
    /// 内部单元（只读）
    pub cells: &'a [Cell],
    /// 边界面
    pub boundary_faces: &'a mut [Face],
    /// 幽灵单元，与 `boundary_faces` 一一对应
    pub ghost_cells: &'a mut [Cell],
    /// 边界（只读）
    pub boundaries: &'a [Boundary],
}

impl Mesh {
    // ========== 基本信息 ==========

    /// 变量数
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// 内部单元数量
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// 幽灵单元数量
    #[inline]
    pub fn n_ghost_cells(&self) -> usize {
        self.ghost_cells.len()
    }

    /// 面数量（内部 + 边界）
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// 内部面数量
    #[inline]
    pub fn n_interior_faces(&self) -> usize {
        self.n_interior_faces
    }

    /// 边界面数量
    #[inline]
    pub fn n_boundary_faces(&self) -> usize {
        self.faces.len() - self.n_interior_faces
    }

    /// 真实节点数量
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    // ========== 单元 ==========

    /// 内部单元
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// 内部单元（可写状态）
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// 幽灵单元
    #[inline]
    pub fn ghost_cells(&self) -> &[Cell] {
        &self.ghost_cells
    }

    /// 是否为幽灵单元索引
    #[inline]
    pub fn is_ghost(&self, cell: CellIndex) -> bool {
        cell.get() >= self.cells.len()
    }

    /// 按索引取单元（内部或幽灵）
    ///
    /// # Panics
    /// 索引超出 `0..N+G` 时 panic，与切片索引一致。
    #[inline]
    pub fn cell(&self, cell: CellIndex) -> &Cell {
        let i = cell.get();
        if i < self.cells.len() {
            &self.cells[i]
        } else {
            &self.ghost_cells[i - self.cells.len()]
        }
    }

    /// 按索引取单元，越界返回错误
    pub fn try_cell(&self, cell: CellIndex) -> PfResult<&Cell> {
        let total = self.cells.len() + self.ghost_cells.len();
        if cell.get() >= total {
            return Err(PfError::index_out_of_bounds("Cell", cell.get(), total));
        }
        Ok(self.cell(cell))
    }

    /// 边界面对应的幽灵单元索引
    #[inline]
    pub fn ghost_of(&self, face: FaceIndex) -> Option<CellIndex> {
        let f = &self.faces[face.get()];
        f.is_boundary().then_some(f.right)
    }

    // ========== 面 ==========

    /// 全部面
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// 内部面
    #[inline]
    pub fn interior_faces(&self) -> &[Face] {
        &self.faces[..self.n_interior_faces]
    }

    /// 边界面
    #[inline]
    pub fn boundary_faces(&self) -> &[Face] {
        &self.faces[self.n_interior_faces..]
    }

    /// 按索引取面
    #[inline]
    pub fn face(&self, face: FaceIndex) -> &Face {
        &self.faces[face.get()]
    }

    /// 面两侧单元 (left, right)
    #[inline]
    pub fn face_cells(&self, face: &Face) -> (&Cell, &Cell) {
        (self.cell(face.left), self.cell(face.right))
    }

    // ========== 节点 ==========

    /// 真实节点
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// 镜像节点
    #[inline]
    pub fn ghost_nodes(&self) -> &[Node] {
        &self.ghost_nodes
    }

    /// 按索引取节点（真实或镜像）
    #[inline]
    pub fn node(&self, node: NodeIndex) -> &Node {
        let i = node.get();
        if i < self.nodes.len() {
            &self.nodes[i]
        } else {
            &self.ghost_nodes[i - self.nodes.len()]
        }
    }

    /// 节点位置
    #[inline]
    pub fn node_location(&self, node: NodeIndex) -> Point {
        self.node(node).location
    }

    // ========== 边界 ==========

    /// 全部边界
    #[inline]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// 按索引取边界
    #[inline]
    pub fn boundary(&self, boundary: BoundaryIndex) -> &Boundary {
        &self.boundaries[boundary.get()]
    }

    /// 按名称查找边界
    pub fn boundary_by_name(&self, name: &str) -> Option<&Boundary> {
        self.boundaries.iter().find(|b| b.name == name)
    }

    /// 为指定名称的边界绑定边界条件
    ///
    /// 边界条件声明的变量数与网格不一致时返回 [`PfError::SizeMismatch`]，不做绑定。
    pub fn set_boundary_condition(
        &mut self,
        name: &str,
        bc: Arc<dyn BoundaryCondition>,
    ) -> PfResult<()> {
        if let Some(n) = bc.num_vars() {
            if n != self.num_vars {
                return Err(PfError::size_mismatch("num_vars", self.num_vars, n));
            }
        }
        let boundary = self
            .boundaries
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or_else(|| PfError::invalid_mesh(format!("网格中不存在边界 '{}'", name)))?;
        boundary.set_bc(bc);
        Ok(())
    }

    /// 为所有边界绑定同一个边界条件
    pub fn set_all_boundary_conditions(&mut self, bc: Arc<dyn BoundaryCondition>) {
        for boundary in &mut self.boundaries {
            boundary.set_bc(Arc::clone(&bc));
        }
    }

    // ========== 状态访问 ==========

    /// 边界条件施加阶段的分离借用
    pub fn boundary_state_mut(&mut self) -> BoundaryStateMut<'_> {
        let n_interior = self.n_interior_faces;
        BoundaryStateMut {
            cells: &self.cells,
            boundary_faces: &mut self.faces[n_interior..],
            ghost_cells: &mut self.ghost_cells,
            boundaries: &self.boundaries,
        }
    }

    /// 内部单元可写、面只读的分离借用（单元收集面通量时使用）
    pub fn cells_and_faces_mut(&mut self) -> (&mut [Cell], &[Face]) {
        (&mut self.cells, &self.faces)
    }

    /// 内部单元体积之和
    pub fn total_volume(&self) -> f64 {
        KahanSum::sum_iter(self.cells.iter().map(|c| c.volume()))
    }

    /// 各变量 |U| 的网格平均值
    pub fn mean_abs_u(&self) -> Vec<f64> {
        let n = self.cells.len();
        (0..self.num_vars)
            .map(|var| {
                if n == 0 {
                    return 0.0;
                }
                KahanSum::sum_iter(self.cells.iter().map(|c| c.u[var].abs())) / n as f64
            })
            .collect()
    }
}
