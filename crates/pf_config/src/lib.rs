// crates/pf_config/src/lib.rs

//! PolyFlux 配置层
//!
//! 求解器参数、范数类型与时间积分器选择。所有配置在构建求解器之前
//! 通过 [`SolverConfig::validate`] 检查，非法值在建立阶段立即报错。
//!
//! # 模块概览
//!
//! - [`kinds`]: [`NormKind`] 与 [`IntegratorKind`]
//! - [`solver_config`]: [`SolverConfig`]（JSON 读写）
//! - [`error`]: 配置错误类型

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod kinds;
pub mod solver_config;

pub use error::ConfigError;
pub use kinds::{IntegratorKind, NormKind};
pub use solver_config::{ConvergenceConfig, ParallelConfig, SolverConfig, TimeConfig};
