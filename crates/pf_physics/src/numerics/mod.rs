// crates/pf_physics/src/numerics/mod.rs

//! 数值方法
//!
//! - [`neighbors`]: 梯度模板
//! - [`gradient`]: 最小二乘梯度
//! - [`residual`]: 对流/扩散/源项残差与面通量收集
//! - [`space_discretization`]: 边界条件 → 残差清零 → 残差累加
//! - [`parallel`]: 并行粒度

pub mod gradient;
pub mod neighbors;
pub mod parallel;
pub mod residual;
pub mod space_discretization;

pub use gradient::{CellGradientCalculator, CellGradients, LeastSquaresGradient};
pub use neighbors::{FaceBasedNeighbors, NeighborsCalculator, Stencil};
pub use parallel::ParallelPolicy;
pub use residual::{
    ConvectionResidual, DiffusionResidual, FaceFluxBuffer, ResidualCalculator, SourceResidual,
};
pub use space_discretization::SpaceDiscretization;
