// crates/pf_mesh/src/entities.rs

//! 网格实体：节点、单元、面
//!
//! 实体之间只通过索引互相引用（面 → 单元、单元 → 节点/面），
//! 求解状态（U、残差、局部时间步）直接存放在实体上，
//! 每次迭代的状态修改不需要遍历拓扑图。

use crate::geometry::{Point, Shape, Surface};
use crate::kind::CellKind;
use pf_foundation::{BoundaryIndex, CellIndex, FaceIndex, NodeIndex};
use smallvec::SmallVec;

/// 单元节点列表
pub type NodeList = SmallVec<[NodeIndex; 8]>;

/// 单元面列表
pub type FaceList = SmallVec<[FaceIndex; 6]>;

// ============================================================
// Node
// ============================================================

/// 网格节点
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) index: NodeIndex,
    pub(crate) location: Point,
    /// 节点状态（供输出插值使用）
    pub u: Vec<f64>,
}

impl Node {
    pub(crate) fn new(index: NodeIndex, location: Point, num_vars: usize) -> Self {
        Self {
            index,
            location,
            u: vec![0.0; num_vars],
        }
    }

    /// 节点索引
    #[inline]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// 节点位置
    #[inline]
    pub fn location(&self) -> Point {
        self.location
    }
}

// ============================================================
// Cell
// ============================================================

/// 有限体积单元
///
/// 拓扑字段在网格构建后冻结，只暴露只读访问；
/// `u`、`residual`、`dt` 是每次迭代更新的状态。
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) index: CellIndex,
    pub(crate) kind: CellKind,
    pub(crate) nodes: NodeList,
    pub(crate) faces: FaceList,
    pub(crate) shape: Shape,
    pub(crate) ghost: bool,
    /// 守恒变量单元平均值
    pub u: Vec<f64>,
    /// 残差累加器
    pub residual: Vec<f64>,
    /// 局部时间步长
    pub dt: f64,
}

impl Cell {
    pub(crate) fn new(
        index: CellIndex,
        kind: CellKind,
        nodes: NodeList,
        shape: Shape,
        num_vars: usize,
    ) -> Self {
        Self {
            index,
            kind,
            nodes,
            faces: FaceList::new(),
            shape,
            ghost: false,
            u: vec![0.0; num_vars],
            residual: vec![0.0; num_vars],
            dt: 0.0,
        }
    }

    /// 单元索引
    #[inline]
    pub fn index(&self) -> CellIndex {
        self.index
    }

    /// 拓扑类型
    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// 节点索引列表
    #[inline]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// 面索引列表（幽灵单元只有其所在的边界面）
    #[inline]
    pub fn faces(&self) -> &[FaceIndex] {
        &self.faces
    }

    /// 几何形状
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// 体积
    #[inline]
    pub fn volume(&self) -> f64 {
        self.shape.volume
    }

    /// 形心
    #[inline]
    pub fn centroid(&self) -> Point {
        self.shape.centroid
    }

    /// 是否为幽灵单元
    #[inline]
    pub fn is_ghost(&self) -> bool {
        self.ghost
    }

    /// 变量数
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.u.len()
    }

    /// 残差清零
    #[inline]
    pub fn reset_residual(&mut self) {
        self.residual.fill(0.0);
    }

    /// 面列表与残差的分离借用（按面收集通量时使用）
    #[inline]
    pub fn faces_and_residual_mut(&mut self) -> (&[FaceIndex], &mut [f64]) {
        (&self.faces, &mut self.residual)
    }
}

// ============================================================
// Face
// ============================================================

/// 单元交界面
///
/// 法向量从 `left` 指向 `right`。边界面的 `right` 是 `left` 的幽灵镜像。
#[derive(Debug, Clone)]
pub struct Face {
    pub(crate) index: FaceIndex,
    pub(crate) nodes: NodeList,
    pub(crate) surface: Surface,
    pub(crate) left: CellIndex,
    pub(crate) right: CellIndex,
    pub(crate) boundary: Option<BoundaryIndex>,
    /// 面状态（插值或由边界条件设置）
    pub u: Vec<f64>,
}

impl Face {
    /// 面索引
    #[inline]
    pub fn index(&self) -> FaceIndex {
        self.index
    }

    /// 节点索引列表
    #[inline]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// 面几何
    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// 面积
    #[inline]
    pub fn area(&self) -> f64 {
        self.surface.area
    }

    /// 左侧单元
    #[inline]
    pub fn left(&self) -> CellIndex {
        self.left
    }

    /// 右侧单元（边界面为幽灵单元）
    #[inline]
    pub fn right(&self) -> CellIndex {
        self.right
    }

    /// 所属边界
    #[inline]
    pub fn boundary(&self) -> Option<BoundaryIndex> {
        self.boundary
    }

    /// 是否为边界面
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.boundary.is_some()
    }

    /// 是否包含节点
    #[inline]
    pub fn contains_node(&self, node: NodeIndex) -> bool {
        self.nodes.contains(&node)
    }

    /// 面另一侧的单元
    #[inline]
    pub fn other_side(&self, cell: CellIndex) -> CellIndex {
        if cell == self.left {
            self.right
        } else {
            self.left
        }
    }
}
