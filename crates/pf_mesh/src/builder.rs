// crates/pf_mesh/src/builder.rs

//! 网格构建器
//!
//! 网格文件解析在外部完成，解析器把节点、单元、面和边界交给 [`MeshBuilder`]，
//! 由 [`MeshBuilder::build`] 完成：
//!
//! 1. 校验节点数/面数与拓扑类型一致、引用不越界、内部面两侧为不同单元
//! 2. 统一面法向：内部面指向 right，边界面指向域外
//! 3. 生成单元 → 面列表
//! 4. 构造幽灵单元（索引位于内部单元范围之外）
//! 5. 一次性分配全部索引
//!
//! # 示例
//!
//! ```
//! use pf_mesh::builder::MeshBuilder;
//! use pf_mesh::geometry::{Point, Shape, Surface, Vector};
//! use pf_mesh::kind::CellKind;
//!
//! let mut b = MeshBuilder::new();
//! let n0 = b.add_node(Point::new(0.0, 0.0, 0.0));
//! let n1 = b.add_node(Point::new(1.0, 0.0, 0.0));
//! let c0 = b.add_cell(CellKind::Line, &[n0, n1], Shape::from_segment(
//!     Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)));
//! let wall = b.add_boundary("wall");
//! b.add_boundary_face(wall, &[n0], Surface::from_point(Point::new(0.0, 0.0, 0.0), -Vector::X), c0);
//! b.add_boundary_face(wall, &[n1], Surface::from_point(Point::new(1.0, 0.0, 0.0), Vector::X), c0);
//!
//! let mesh = b.build(1).unwrap();
//! assert_eq!(mesh.n_cells(), 1);
//! assert_eq!(mesh.n_ghost_cells(), 2);
//! ```

use crate::boundary::Boundary;
use crate::entities::{Cell, Face, Node, NodeList};
use crate::geometry::{Point, Shape, Surface};
use crate::ghost::GhostCellFactory;
use crate::kind::CellKind;
use crate::mesh::Mesh;
use pf_foundation::{BoundaryIndex, CellIndex, FaceIndex, NodeIndex, PfError, PfResult};

struct CellSpec {
    kind: CellKind,
    nodes: NodeList,
    shape: Shape,
}

struct FaceSpec {
    nodes: NodeList,
    surface: Surface,
    left: CellIndex,
    right: Option<CellIndex>,
}

struct BoundarySpec {
    name: String,
    faces: Vec<FaceSpec>,
}

/// 网格构建器
#[derive(Default)]
pub struct MeshBuilder {
    nodes: Vec<Point>,
    cells: Vec<CellSpec>,
    interior_faces: Vec<FaceSpec>,
    boundaries: Vec<BoundarySpec>,
}

impl MeshBuilder {
    /// 创建空构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加节点
    pub fn add_node(&mut self, location: Point) -> NodeIndex {
        self.nodes.push(location);
        NodeIndex::new(self.nodes.len() - 1)
    }

    /// 添加单元
    pub fn add_cell(&mut self, kind: CellKind, nodes: &[NodeIndex], shape: Shape) -> CellIndex {
        self.cells.push(CellSpec {
            kind,
            nodes: nodes.iter().copied().collect(),
            shape,
        });
        CellIndex::new(self.cells.len() - 1)
    }

    /// 添加内部面
    pub fn add_interior_face(
        &mut self,
        nodes: &[NodeIndex],
        surface: Surface,
        left: CellIndex,
        right: CellIndex,
    ) {
        self.interior_faces.push(FaceSpec {
            nodes: nodes.iter().copied().collect(),
            surface,
            left,
            right: Some(right),
        });
    }

    /// 添加边界（同名边界只创建一次）
    pub fn add_boundary(&mut self, name: &str) -> BoundaryIndex {
        if let Some(i) = self.boundaries.iter().position(|b| b.name == name) {
            return BoundaryIndex::new(i);
        }
        self.boundaries.push(BoundarySpec {
            name: name.to_string(),
            faces: Vec::new(),
        });
        BoundaryIndex::new(self.boundaries.len() - 1)
    }

    /// 添加边界面
    ///
    /// # Panics
    /// `boundary` 不是由 [`add_boundary`](Self::add_boundary) 返回的索引时 panic。
    pub fn add_boundary_face(
        &mut self,
        boundary: BoundaryIndex,
        nodes: &[NodeIndex],
        surface: Surface,
        left: CellIndex,
    ) {
        self.boundaries[boundary.get()].faces.push(FaceSpec {
            nodes: nodes.iter().copied().collect(),
            surface,
            left,
            right: None,
        });
    }

    /// 完成构建
    ///
    /// # 参数
    /// - `num_vars`: 每个单元/面/节点的状态变量数
    pub fn build(self, num_vars: usize) -> PfResult<Mesh> {
        if num_vars == 0 {
            return Err(PfError::invalid_mesh("变量数必须大于 0"));
        }

        let n_nodes = self.nodes.len();
        let n_cells = self.cells.len();

        // 节点
        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &p)| Node::new(NodeIndex::new(i), p, num_vars))
            .collect();

        // 单元
        let mut cells = Vec::with_capacity(n_cells);
        for (i, draft) in self.cells.into_iter().enumerate() {
            if draft.nodes.len() != draft.kind.num_nodes() {
                return Err(PfError::invalid_mesh(format!(
                    "单元 {} 类型 {:?} 需要 {} 个节点，实际 {}",
                    i,
                    draft.kind,
                    draft.kind.num_nodes(),
                    draft.nodes.len()
                )));
            }
            check_nodes(&draft.nodes, n_nodes)?;
            if !(draft.shape.volume > 0.0) {
                return Err(PfError::invalid_mesh(format!(
                    "单元 {} 体积非正: {}",
                    i, draft.shape.volume
                )));
            }
            cells.push(Cell::new(
                CellIndex::new(i),
                draft.kind,
                draft.nodes,
                draft.shape,
                num_vars,
            ));
        }

        let n_interior_faces = self.interior_faces.len();
        let n_boundary_faces: usize = self.boundaries.iter().map(|b| b.faces.len()).sum();
        let mut faces = Vec::with_capacity(n_interior_faces + n_boundary_faces);

        // 内部面
        for draft in self.interior_faces {
            let index = FaceIndex::new(faces.len());
            let right = draft.right.unwrap_or(CellIndex::INVALID);
            check_cell(draft.left, n_cells, index)?;
            check_cell(right, n_cells, index)?;
            if draft.left == right {
                return Err(PfError::invalid_mesh(format!(
                    "内部面 {} 两侧是同一个单元 {}",
                    index, draft.left
                )));
            }
            check_nodes(&draft.nodes, n_nodes)?;
            check_face_nodes(&cells[draft.left.get()], &draft.nodes, index)?;
            check_face_nodes(&cells[right.get()], &draft.nodes, index)?;

            let to_right = cells[draft.left.get()]
                .centroid()
                .vector_to(&cells[right.get()].centroid());
            let surface = orient(draft.surface, to_right);

            cells[draft.left.get()].faces.push(index);
            cells[right.get()].faces.push(index);
            faces.push(Face {
                index,
                nodes: draft.nodes,
                surface,
                left: draft.left,
                right,
                boundary: None,
                u: vec![0.0; num_vars],
            });
        }

        // 边界面，right 指向幽灵单元
        let mut boundaries = Vec::with_capacity(self.boundaries.len());
        for (b, draft) in self.boundaries.into_iter().enumerate() {
            let boundary_index = BoundaryIndex::new(b);
            let mut face_indices = Vec::with_capacity(draft.faces.len());
            for face_draft in draft.faces {
                let index = FaceIndex::new(faces.len());
                check_cell(face_draft.left, n_cells, index)?;
                check_nodes(&face_draft.nodes, n_nodes)?;
                check_face_nodes(&cells[face_draft.left.get()], &face_draft.nodes, index)?;

                let outward = cells[face_draft.left.get()]
                    .centroid()
                    .vector_to(&face_draft.surface.centroid);
                let surface = orient(face_draft.surface, outward);
                let ghost = CellIndex::new(n_cells + (faces.len() - n_interior_faces));

                cells[face_draft.left.get()].faces.push(index);
                faces.push(Face {
                    index,
                    nodes: face_draft.nodes,
                    surface,
                    left: face_draft.left,
                    right: ghost,
                    boundary: Some(boundary_index),
                    u: vec![0.0; num_vars],
                });
                face_indices.push(index);
            }
            boundaries.push(Boundary {
                index: boundary_index,
                name: draft.name,
                faces: face_indices,
                bc: None,
            });
        }

        // 面数与拓扑类型一致
        for cell in &cells {
            let expected = cell.kind.num_faces();
            if cell.kind.dimension() > 0 && cell.faces.len() != expected {
                return Err(PfError::invalid_mesh(format!(
                    "单元 {} 类型 {:?} 应有 {} 个面，实际 {}",
                    cell.index,
                    cell.kind,
                    expected,
                    cell.faces.len()
                )));
            }
        }

        // 幽灵单元
        let mut factory = GhostCellFactory::new(&nodes, num_vars);
        let ghost_cells: Vec<Cell> = faces[n_interior_faces..]
            .iter()
            .map(|face| factory.build(&cells[face.left.get()], face, face.right))
            .collect();
        let ghost_nodes = factory.into_ghost_nodes();

        log::info!(
            "网格构建完成: {} 单元, {} 内部面, {} 边界面, {} 边界, {} 节点 (+{} 镜像)",
            cells.len(),
            n_interior_faces,
            ghost_cells.len(),
            boundaries.len(),
            nodes.len(),
            ghost_nodes.len()
        );

        Ok(Mesh {
            num_vars,
            nodes,
            ghost_nodes,
            cells,
            ghost_cells,
            faces,
            n_interior_faces,
            boundaries,
        })
    }
}

/// 让法向量与参考方向同向
fn orient(surface: Surface, reference: crate::geometry::Vector) -> Surface {
    if surface.unit_normal().dot(reference) < 0.0 {
        surface.flipped()
    } else {
        surface
    }
}

fn check_nodes(nodes: &[NodeIndex], n_nodes: usize) -> PfResult<()> {
    for node in nodes {
        if node.get() >= n_nodes {
            return Err(PfError::index_out_of_bounds("Node", node.get(), n_nodes));
        }
    }
    Ok(())
}

fn check_cell(cell: CellIndex, n_cells: usize, face: FaceIndex) -> PfResult<()> {
    if cell.get() >= n_cells {
        return Err(PfError::invalid_mesh(format!(
            "面 {} 引用了不存在的单元 {:?}",
            face, cell
        )));
    }
    Ok(())
}

fn check_face_nodes(cell: &Cell, face_nodes: &[NodeIndex], face: FaceIndex) -> PfResult<()> {
    if face_nodes.iter().all(|n| cell.nodes.contains(n)) {
        Ok(())
    } else {
        Err(PfError::invalid_mesh(format!(
            "面 {} 的节点不全属于单元 {}",
            face, cell.index
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector;

    fn two_segments() -> MeshBuilder {
        let mut b = MeshBuilder::new();
        let p: Vec<Point> = (0..3).map(|i| Point::new(i as f64, 0.0, 0.0)).collect();
        let n: Vec<NodeIndex> = p.iter().map(|&x| b.add_node(x)).collect();
        let c0 = b.add_cell(CellKind::Line, &[n[0], n[1]], Shape::from_segment(p[0], p[1]));
        let c1 = b.add_cell(CellKind::Line, &[n[1], n[2]], Shape::from_segment(p[1], p[2]));
        // 故意给反向法向，构建时应被纠正
        b.add_interior_face(&[n[1]], Surface::from_point(p[1], -Vector::X), c0, c1);
        let left = b.add_boundary("left");
        let right = b.add_boundary("right");
        b.add_boundary_face(left, &[n[0]], Surface::from_point(p[0], Vector::X), c0);
        b.add_boundary_face(right, &[n[2]], Surface::from_point(p[2], Vector::X), c1);
        b
    }

    #[test]
    fn test_build_indices_dense() {
        let mesh = two_segments().build(2).unwrap();
        assert_eq!(mesh.n_cells(), 2);
        assert_eq!(mesh.n_faces(), 3);
        assert_eq!(mesh.n_interior_faces(), 1);
        for (i, c) in mesh.cells().iter().enumerate() {
            assert_eq!(c.index().get(), i);
        }
        for (i, f) in mesh.faces().iter().enumerate() {
            assert_eq!(f.index().get(), i);
        }
        // 幽灵单元在内部范围之外
        for g in mesh.ghost_cells() {
            assert!(g.index().get() >= mesh.n_cells());
            assert!(mesh.is_ghost(g.index()));
        }
    }

    #[test]
    fn test_normals_oriented() {
        let mesh = two_segments().build(1).unwrap();
        assert!(mesh.face(FaceIndex::new(0)).surface().unit_normal().x > 0.0);
        // 左边界法向指向域外 (-x)
        assert!(mesh.face(FaceIndex::new(1)).surface().unit_normal().x < 0.0);
        assert!(mesh.face(FaceIndex::new(2)).surface().unit_normal().x > 0.0);
    }

    #[test]
    fn test_boundary_face_right_is_ghost_mirror() {
        let mesh = two_segments().build(1).unwrap();
        for face in mesh.boundary_faces() {
            let (inside, ghost) = mesh.face_cells(face);
            assert!(ghost.is_ghost());
            assert!((ghost.volume() - inside.volume()).abs() < 1e-15);
            let mid = Point::average(&[inside.centroid(), ghost.centroid()]);
            assert!(mid.distance(&face.surface().centroid) < 1e-12);
        }
        assert_eq!(mesh.ghost_of(FaceIndex::new(0)), None);
        assert_eq!(mesh.ghost_of(FaceIndex::new(1)), Some(CellIndex::new(2)));
    }

    #[test]
    fn test_reject_self_face() {
        let mut b = MeshBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0, 0.0));
        let n1 = b.add_node(Point::new(1.0, 0.0, 0.0));
        let c0 = b.add_cell(
            CellKind::Line,
            &[n0, n1],
            Shape::from_segment(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)),
        );
        b.add_interior_face(&[n0], Surface::from_point(Point::ORIGIN, Vector::X), c0, c0);
        assert!(matches!(b.build(1), Err(PfError::InvalidMesh { .. })));
    }

    #[test]
    fn test_reject_wrong_arity() {
        let mut b = MeshBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0, 0.0));
        b.add_cell(CellKind::Triangle, &[n0], Shape::new(1.0, Point::ORIGIN));
        assert!(b.build(1).is_err());
    }

    #[test]
    fn test_reject_zero_vars() {
        assert!(two_segments().build(0).is_err());
    }

    #[test]
    fn test_boundary_dedup() {
        let mut b = MeshBuilder::new();
        let a = b.add_boundary("wall");
        let c = b.add_boundary("wall");
        assert_eq!(a, c);
    }
}
