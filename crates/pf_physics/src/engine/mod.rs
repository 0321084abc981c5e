// crates/pf_physics/src/engine/mod.rs

//! 时间推进引擎
//!
//! - [`timestep`]: 局部时间步
//! - [`dual_time`]: 物理时间导数项
//! - [`norm`]: 残差范数
//! - [`time_integrator`]: 显式 Euler / SSP-RK2
//! - [`convergence`]: 逐变量收敛判据
//! - [`solver`]: 伪时间求解循环

pub mod convergence;
pub mod dual_time;
pub mod norm;
pub mod solver;
pub mod time_integrator;
pub mod timestep;

pub use convergence::Convergence;
pub use dual_time::{BackwardEulerRealTime, RealTimeDiscretization};
pub use norm::ResidualNorm;
pub use solver::{PseudoTimeSolver, SolveReport};
pub use time_integrator::{
    create_integrator, ExplicitEuler, SspRk2, TimeIntegrator, REAL_DT_SAFETY,
};
pub use timestep::{LocalTimeStep, TimeStepCalculator};
