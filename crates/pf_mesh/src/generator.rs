// crates/pf_mesh/src/generator.rs

//! 结构化网格生成
//!
//! 提供简单的结构化网格，用于测试和验证：
//!
//! - [`LineMeshGenerator`]: 一维等距线段网格，边界 `left` / `right`
//! - [`RectMeshGenerator`]: 矩形域四边形或三角形网格，边界 `bottom` / `right` / `top` / `left`
//!
//! # 使用示例
//!
//! ```
//! use pf_mesh::generator::RectMeshGenerator;
//!
//! let mesh = RectMeshGenerator::new(4, 3, 2.0, 1.5).build(1).unwrap();
//! assert_eq!(mesh.n_cells(), 12);
//! assert_eq!(mesh.n_boundary_faces(), 2 * (4 + 3));
//! ```

use crate::builder::MeshBuilder;
use crate::geometry::{Point, Shape, Surface, Vector};
use crate::kind::CellKind;
use crate::mesh::Mesh;
use pf_foundation::{CellIndex, NodeIndex, PfError, PfResult};
use std::collections::BTreeMap;

// ============================================================
// 一维
// ============================================================

/// 一维线段网格生成器
#[derive(Debug, Clone)]
pub struct LineMeshGenerator {
    n: usize,
    x0: f64,
    x1: f64,
}

impl LineMeshGenerator {
    /// 在 `[x0, x1]` 上生成 `n` 个等长线段
    pub fn new(n: usize, x0: f64, x1: f64) -> Self {
        Self { n, x0, x1 }
    }

    /// 单元长度
    pub fn dx(&self) -> f64 {
        (self.x1 - self.x0) / self.n as f64
    }

    /// 构建网格
    pub fn build(&self, num_vars: usize) -> PfResult<Mesh> {
        if self.n == 0 || !(self.x1 > self.x0) {
            return Err(PfError::invalid_mesh(format!(
                "无效的一维网格参数: n = {}, [{}, {}]",
                self.n, self.x0, self.x1
            )));
        }

        let dx = self.dx();
        let mut b = MeshBuilder::new();

        let points: Vec<Point> = (0..=self.n)
            .map(|i| Point::new(self.x0 + i as f64 * dx, 0.0, 0.0))
            .collect();
        let nodes: Vec<NodeIndex> = points.iter().map(|&p| b.add_node(p)).collect();

        let cells: Vec<CellIndex> = (0..self.n)
            .map(|i| {
                b.add_cell(
                    CellKind::Line,
                    &[nodes[i], nodes[i + 1]],
                    Shape::from_segment(points[i], points[i + 1]),
                )
            })
            .collect();

        for i in 1..self.n {
            b.add_interior_face(
                &[nodes[i]],
                Surface::from_point(points[i], Vector::X),
                cells[i - 1],
                cells[i],
            );
        }

        let left = b.add_boundary("left");
        let right = b.add_boundary("right");
        b.add_boundary_face(left, &[nodes[0]], Surface::from_point(points[0], -Vector::X), cells[0]);
        b.add_boundary_face(
            right,
            &[nodes[self.n]],
            Surface::from_point(points[self.n], Vector::X),
            cells[self.n - 1],
        );

        b.build(num_vars)
    }
}

// ============================================================
// 二维
// ============================================================

/// 矩形结构化网格生成器
///
/// 节点按行主序排列：`id = j * (nx + 1) + i`。
/// 三角形模式下每个矩形沿 (i,j)-(i+1,j+1) 对角线切分为两个三角形。
#[derive(Debug, Clone)]
pub struct RectMeshGenerator {
    /// x 方向单元数
    nx: usize,
    /// y 方向单元数
    ny: usize,
    /// x 方向域长度
    lx: f64,
    /// y 方向域长度
    ly: f64,
    x0: f64,
    y0: f64,
    triangles: bool,
}

impl RectMeshGenerator {
    /// 创建矩形网格生成器（默认四边形单元）
    ///
    /// # 参数
    ///
    /// - `nx`: x 方向单元数
    /// - `ny`: y 方向单元数
    /// - `lx`: x 方向域长度
    /// - `ly`: y 方向域长度
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        Self {
            nx,
            ny,
            lx,
            ly,
            x0: 0.0,
            y0: 0.0,
            triangles: false,
        }
    }

    /// 设置原点偏移
    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    /// 使用三角形单元
    pub fn with_triangles(mut self) -> Self {
        self.triangles = true;
        self
    }

    /// x 方向网格间距
    pub fn dx(&self) -> f64 {
        self.lx / self.nx as f64
    }

    /// y 方向网格间距
    pub fn dy(&self) -> f64 {
        self.ly / self.ny as f64
    }

    /// 单元总数
    pub fn n_cells(&self) -> usize {
        let n = self.nx * self.ny;
        if self.triangles {
            2 * n
        } else {
            n
        }
    }

    /// 构建网格
    pub fn build(&self, num_vars: usize) -> PfResult<Mesh> {
        if self.nx == 0 || self.ny == 0 || !(self.lx > 0.0) || !(self.ly > 0.0) {
            return Err(PfError::invalid_mesh(format!(
                "无效的矩形网格参数: {}x{}, {}x{}",
                self.nx, self.ny, self.lx, self.ly
            )));
        }

        let dx = self.dx();
        let dy = self.dy();
        let mut b = MeshBuilder::new();

        // 顶点
        let mut points = Vec::with_capacity((self.nx + 1) * (self.ny + 1));
        let mut nodes = Vec::with_capacity(points.capacity());
        for j in 0..=self.ny {
            for i in 0..=self.nx {
                let p = Point::new(self.x0 + i as f64 * dx, self.y0 + j as f64 * dy, 0.0);
                points.push(p);
                nodes.push(b.add_node(p));
            }
        }
        let node_idx = |i: usize, j: usize| -> usize { j * (self.nx + 1) + i };

        // 单元（逆时针节点顺序）
        let mut cell_nodes: Vec<Vec<usize>> = Vec::with_capacity(self.n_cells());
        for j in 0..self.ny {
            for i in 0..self.nx {
                let n00 = node_idx(i, j);
                let n10 = node_idx(i + 1, j);
                let n11 = node_idx(i + 1, j + 1);
                let n01 = node_idx(i, j + 1);
                if self.triangles {
                    cell_nodes.push(vec![n00, n10, n11]);
                    cell_nodes.push(vec![n00, n11, n01]);
                } else {
                    cell_nodes.push(vec![n00, n10, n11, n01]);
                }
            }
        }

        let kind = if self.triangles {
            CellKind::Triangle
        } else {
            CellKind::Quad
        };
        let mut cells = Vec::with_capacity(cell_nodes.len());
        // 边 (min, max) → 相邻单元
        let mut edges: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for (c, ids) in cell_nodes.iter().enumerate() {
            let corners: Vec<Point> = ids.iter().map(|&n| points[n]).collect();
            let idx: Vec<NodeIndex> = ids.iter().map(|&n| nodes[n]).collect();
            cells.push(b.add_cell(kind, &idx, Shape::from_polygon(&corners)));
            for k in 0..ids.len() {
                let a = ids[k];
                let z = ids[(k + 1) % ids.len()];
                edges.entry((a.min(z), a.max(z))).or_default().push(c);
            }
        }

        // 边界按固定顺序登记，保证边界索引稳定
        let bottom = b.add_boundary("bottom");
        let right = b.add_boundary("right");
        let top = b.add_boundary("top");
        let left = b.add_boundary("left");

        let grid = |n: usize| (n % (self.nx + 1), n / (self.nx + 1));

        for (&(a, z), adjacent) in &edges {
            let surface = Surface::from_edge(points[a], points[z]);
            let face_nodes = [nodes[a], nodes[z]];
            match adjacent.as_slice() {
                &[l, r] => b.add_interior_face(&face_nodes, surface, cells[l], cells[r]),
                &[l] => {
                    let ((ia, ja), (iz, jz)) = (grid(a), grid(z));
                    let boundary = if ja == 0 && jz == 0 {
                        bottom
                    } else if ia == self.nx && iz == self.nx {
                        right
                    } else if ja == self.ny && jz == self.ny {
                        top
                    } else if ia == 0 && iz == 0 {
                        left
                    } else {
                        return Err(PfError::internal(format!(
                            "边 ({}, {}) 只有一个相邻单元但不在域边界上",
                            a, z
                        )));
                    };
                    b.add_boundary_face(boundary, &face_nodes, surface, cells[l]);
                }
                _ => {
                    return Err(PfError::internal(format!(
                        "边 ({}, {}) 有 {} 个相邻单元",
                        a,
                        z,
                        adjacent.len()
                    )))
                }
            }
        }

        b.build(num_vars)
    }
}
