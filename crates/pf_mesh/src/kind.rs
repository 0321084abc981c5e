// crates/pf_mesh/src/kind.rs

//! 单元拓扑标签
//!
//! 使用 VTK 单元类型编号，决定单元的节点数和面数。

use serde::{Deserialize, Serialize};

/// 单元拓扑类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// 顶点（1D 网格的面）
    Vertex,
    /// 线段
    Line,
    /// 三角形
    Triangle,
    /// 四边形
    Quad,
    /// 四面体
    Tetra,
    /// 六面体
    Hexahedron,
    /// 三棱柱
    Wedge,
    /// 四棱锥
    Pyramid,
}

impl CellKind {
    /// VTK 类型编号
    pub const fn vtk_id(self) -> u8 {
        match self {
            Self::Vertex => 1,
            Self::Line => 3,
            Self::Triangle => 5,
            Self::Quad => 9,
            Self::Tetra => 10,
            Self::Hexahedron => 12,
            Self::Wedge => 13,
            Self::Pyramid => 14,
        }
    }

    /// 从 VTK 类型编号解析
    pub const fn from_vtk_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Vertex),
            3 => Some(Self::Line),
            5 => Some(Self::Triangle),
            9 => Some(Self::Quad),
            10 => Some(Self::Tetra),
            12 => Some(Self::Hexahedron),
            13 => Some(Self::Wedge),
            14 => Some(Self::Pyramid),
            _ => None,
        }
    }

    /// 节点数
    pub const fn num_nodes(self) -> usize {
        match self {
            Self::Vertex => 1,
            Self::Line => 2,
            Self::Triangle => 3,
            Self::Quad => 4,
            Self::Tetra => 4,
            Self::Hexahedron => 8,
            Self::Wedge => 6,
            Self::Pyramid => 5,
        }
    }

    /// 面数
    pub const fn num_faces(self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Line => 2,
            Self::Triangle => 3,
            Self::Quad => 4,
            Self::Tetra => 4,
            Self::Hexahedron => 6,
            Self::Wedge => 5,
            Self::Pyramid => 5,
        }
    }

    /// 拓扑维度
    pub const fn dimension(self) -> u8 {
        match self {
            Self::Vertex => 0,
            Self::Line => 1,
            Self::Triangle | Self::Quad => 2,
            Self::Tetra | Self::Hexahedron | Self::Wedge | Self::Pyramid => 3,
        }
    }
}
