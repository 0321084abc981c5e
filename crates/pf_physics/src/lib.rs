// crates/pf_physics/src/lib.rs

//! PolyFlux 物理层
//!
//! 在 [`pf_mesh`] 网格上组装有限体积残差并做显式伪时间推进：
//!
//! - [`equations`]: 控制方程接口（通量、特征速度、扩散系数、源项）
//! - [`boundary`]: 常用边界条件
//! - [`initializer`]: 由单元形心初始化解
//! - [`numerics`]: 梯度、残差、空间离散
//! - [`engine`]: 局部时间步、积分器、收敛判断与求解循环
//!
//! 典型装配：
//!
//! ```no_run
//! use pf_config::SolverConfig;
//! use pf_mesh::RectMeshGenerator;
//! use pf_physics::boundary::ExtrapolatedBc;
//! use pf_physics::engine::{LocalTimeStep, PseudoTimeSolver};
//! use pf_physics::equations::LinearTransport;
//! use pf_physics::numerics::{DiffusionResidual, FaceBasedNeighbors, LeastSquaresGradient, SpaceDiscretization};
//! use std::sync::Arc;
//!
//! let mut mesh = RectMeshGenerator::new(16, 16, 1.0, 1.0).build(1)?;
//! mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));
//!
//! let eq = Arc::new(LinearTransport::diffusion(vec![1.0]));
//! let gradient = Arc::new(LeastSquaresGradient::new(&mesh, &FaceBasedNeighbors)?);
//! let space = SpaceDiscretization::new(vec![Box::new(
//!     DiffusionResidual::new(eq.clone()).with_gradient(gradient),
//! )]);
//!
//! let config = SolverConfig::default();
//! let mut solver = PseudoTimeSolver::from_config(&config, &mesh, space, Box::new(LocalTimeStep::new(eq)))?;
//! let report = solver.solve(&mut mesh)?;
//! println!("{} 步, 收敛: {}", report.iterations, report.converged);
//! # Ok::<(), pf_foundation::PfError>(())
//! ```

#![warn(clippy::all)]

pub mod boundary;
pub mod engine;
pub mod equations;
pub mod initializer;
pub mod numerics;

pub use boundary::{DirichletBc, ExtrapolatedBc};
pub use engine::{
    create_integrator, BackwardEulerRealTime, Convergence, ExplicitEuler, LocalTimeStep,
    PseudoTimeSolver, RealTimeDiscretization, ResidualNorm, SolveReport, SspRk2,
    TimeIntegrator, TimeStepCalculator,
};
pub use equations::{GoverningEquations, LinearTransport};
pub use initializer::{
    initialize_cells, ConstantInitializer, FunctionInitializer, LinearFunction,
    SolutionInitializer,
};
pub use numerics::{
    CellGradientCalculator, CellGradients, ConvectionResidual, DiffusionResidual,
    FaceBasedNeighbors, LeastSquaresGradient, NeighborsCalculator, ParallelPolicy,
    ResidualCalculator, SourceResidual, SpaceDiscretization,
};
