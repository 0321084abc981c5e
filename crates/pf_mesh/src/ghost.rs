// crates/pf_mesh/src/ghost.rs

//! 幽灵单元构造
//!
//! 对每个边界面，把内侧单元沿面所在平面做镜像，得到面外侧的幽灵单元，
//! 使边界面也拥有对称的两侧模板。
//!
//! # 镜像规则
//!
//! 1. 属于该面的节点保持不变（共享原节点）
//! 2. 其余节点：把"面形心 → 点"向量分解为法向分量和切向分量，
//!    法向分量取反后重新组合，再加回面形心
//! 3. 体积与原单元相同，形心为原形心的镜像，拓扑类型与变量数复制
//!
//! 不做多面体裁剪：凹边界上镜像形状可能与相邻单元重叠，这里按原样保留。

use crate::entities::{Cell, Face, Node, NodeList};
use crate::geometry::{Point, Shape, Surface};
use pf_foundation::{CellIndex, NodeIndex};
use smallvec::smallvec;

/// 关于面所在平面镜像一个点
///
/// ```
/// use pf_mesh::geometry::{Point, Surface, Vector};
/// use pf_mesh::ghost::mirror_point;
///
/// let face = Surface::new(1.0, Point::new(1.0, 0.0, 0.0), Vector::X);
/// let p = mirror_point(&face, Point::new(0.25, 3.0, 0.0));
/// assert!((p.x - 1.75).abs() < 1e-15);
/// assert!((p.y - 3.0).abs() < 1e-15);
/// ```
pub fn mirror_point(surface: &Surface, point: Point) -> Point {
    let normal = surface.unit_normal();
    let centroid = surface.centroid;

    let node_vector = centroid.vector_to(&point);
    let normal_component = normal * node_vector.dot(normal);
    let tangent_component = node_vector - normal_component;

    let mirrored = tangent_component - normal_component;
    centroid.translate(mirrored)
}

/// 点到面所在平面的有向距离（沿单位法向为正）
pub fn signed_distance(surface: &Surface, point: Point) -> f64 {
    surface.centroid.vector_to(&point).dot(surface.unit_normal())
}

/// 幽灵单元工厂
///
/// 负责生成镜像节点并为其分配 `n_real_nodes..` 范围内的索引。
pub struct GhostCellFactory<'a> {
    nodes: &'a [Node],
    ghost_nodes: Vec<Node>,
    num_vars: usize,
}

impl<'a> GhostCellFactory<'a> {
    /// 创建工厂
    ///
    /// # 参数
    /// - `nodes`: 真实节点（索引 `0..n`）
    /// - `num_vars`: 变量数
    pub fn new(nodes: &'a [Node], num_vars: usize) -> Self {
        Self {
            nodes,
            ghost_nodes: Vec::new(),
            num_vars,
        }
    }

    /// 构造 `cell` 关于 `face` 的幽灵单元
    ///
    /// # 参数
    /// - `cell`: 边界面内侧的真实单元
    /// - `face`: 边界面
    /// - `ghost_index`: 幽灵单元索引（位于内部单元索引范围之外）
    pub fn build(&mut self, cell: &Cell, face: &Face, ghost_index: CellIndex) -> Cell {
        let mut ghost_cell_nodes = NodeList::new();
        for &node in cell.nodes() {
            if face.contains_node(node) {
                ghost_cell_nodes.push(node);
            } else {
                let location = mirror_point(face.surface(), self.nodes[node.get()].location());
                ghost_cell_nodes.push(self.push_node(location));
            }
        }

        let centroid = mirror_point(face.surface(), cell.centroid());
        let shape = Shape::new(cell.volume(), centroid);

        let mut ghost = Cell::new(
            ghost_index,
            cell.kind(),
            ghost_cell_nodes,
            shape,
            cell.num_vars(),
        );
        ghost.faces = smallvec![face.index()];
        ghost.ghost = true;
        ghost
    }

    /// 取出生成的镜像节点
    pub fn into_ghost_nodes(self) -> Vec<Node> {
        self.ghost_nodes
    }

    fn push_node(&mut self, location: Point) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len() + self.ghost_nodes.len());
        self.ghost_nodes
            .push(Node::new(index, location, self.num_vars));
        index
    }
}
