// crates/pf_physics/src/numerics/gradient/mod.rs

//! 梯度计算模块
//!
//! - [`CellGradientCalculator`]: 单元梯度接口
//! - [`LeastSquaresGradient`]: 预计算伪逆的最小二乘梯度

pub mod least_squares;
pub mod traits;

pub use least_squares::LeastSquaresGradient;
pub use traits::{CellGradientCalculator, CellGradients};
