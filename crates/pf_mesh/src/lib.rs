// crates/pf_mesh/src/lib.rs

//! PolyFlux 网格层
//!
//! 非结构多面体网格的几何与拓扑：
//!
//! - [`geometry`]: 点、向量、单元形状与面几何
//! - [`kind`]: 单元拓扑标签
//! - [`entities`]: 节点、单元、面（携带求解状态）
//! - [`boundary`]: 具名边界与边界条件接口
//! - [`ghost`]: 幽灵单元镜像构造
//! - [`mesh`]: 网格容器
//! - [`builder`]: 校验并组装网格
//! - [`generator`]: 结构化测试网格

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod builder;
pub mod entities;
pub mod generator;
pub mod geometry;
pub mod ghost;
pub mod kind;
pub mod mesh;

pub use boundary::{Boundary, BoundaryCondition};
pub use builder::MeshBuilder;
pub use entities::{Cell, Face, Node};
pub use generator::{LineMeshGenerator, RectMeshGenerator};
pub use geometry::{Point, Shape, Surface, Vector};
pub use kind::CellKind;
pub use mesh::{BoundaryStateMut, Mesh};
