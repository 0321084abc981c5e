// crates/pf_physics/src/engine/solver.rs

//! 伪时间求解循环
//!
//! ```text
//! for k in 1..=max_iterations:
//!     integrator.update_cell_averages(mesh)
//!     r = integrator.current_total_residual(mesh, norm)
//!     if convergence.has_converged(r): break
//! ```
//!
//! 迭代次数耗尽不是错误，由调用方检查 [`SolveReport::converged`]。
//! 残差出现 NaN/Inf 视为发散，返回 [`PfError::Numerical`]。

use super::convergence::Convergence;
use super::dual_time::BackwardEulerRealTime;
use super::time_integrator::{create_integrator, TimeIntegrator};
use super::timestep::TimeStepCalculator;
use crate::numerics::parallel::ParallelPolicy;
use crate::numerics::space_discretization::SpaceDiscretization;
use pf_config::{NormKind, SolverConfig};
use pf_foundation::{PfError, PfResult};
use pf_mesh::Mesh;

/// 一次伪时间求解的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// 已执行的伪时间步数
    pub iterations: usize,
    /// 是否满足收敛判据
    pub converged: bool,
    /// 最后一步的归一化残差
    pub residual: Vec<f64>,
}

/// 伪时间求解器
pub struct PseudoTimeSolver {
    integrator: Box<dyn TimeIntegrator>,
    convergence: Convergence,
    norm: NormKind,
    max_iterations: usize,
}

impl PseudoTimeSolver {
    /// 由已构造的组件创建
    pub fn new(
        integrator: Box<dyn TimeIntegrator>,
        convergence: Convergence,
        norm: NormKind,
        max_iterations: usize,
    ) -> Self {
        Self {
            integrator,
            convergence,
            norm,
            max_iterations,
        }
    }

    /// 按配置装配积分器、收敛判据与可选的物理时间离散
    ///
    /// `time.real_dt` 给出时以网格当前解为 Uⁿ 挂接后向 Euler 物理时间项。
    /// 残差计算器或时间步计算器的变量数与网格不一致时返回 [`PfError::SizeMismatch`]。
    pub fn from_config(
        config: &SolverConfig,
        mesh: &Mesh,
        space: SpaceDiscretization,
        time_step: Box<dyn TimeStepCalculator>,
    ) -> PfResult<Self> {
        config.validate()?;
        let num_vars = mesh.num_vars();
        space.check_num_vars(num_vars)?;
        if time_step.num_vars() != num_vars {
            return Err(PfError::size_mismatch("num_vars", num_vars, time_step.num_vars()));
        }
        let policy = ParallelPolicy::from_config(&config.parallel);
        let calculators = space.calculator_names();

        let mut integrator = create_integrator(
            config.time.integrator,
            space.with_policy(policy),
            time_step,
            num_vars,
            policy,
        );
        integrator.set_courant_number(config.time.courant_number);
        if let Some(real_dt) = config.time.real_dt {
            integrator.set_real_time_discretization(Box::new(BackwardEulerRealTime::new(
                mesh, real_dt,
            )?));
        }

        let convergence = Convergence::from_config(&config.convergence, num_vars)?;
        log::info!(
            "伪时间求解器: 积分器 {}, 残差 {:?}, Courant {}, 范数 {}, 最多 {} 步",
            integrator.name(),
            calculators,
            config.time.courant_number,
            config.convergence.norm,
            config.convergence.max_iterations
        );

        Ok(Self::new(
            integrator,
            convergence,
            config.convergence.norm,
            config.convergence.max_iterations,
        ))
    }

    /// 积分器
    pub fn integrator(&self) -> &dyn TimeIntegrator {
        self.integrator.as_ref()
    }

    /// 可变积分器
    pub fn integrator_mut(&mut self) -> &mut dyn TimeIntegrator {
        self.integrator.as_mut()
    }

    /// 收敛判据
    pub fn convergence(&self) -> &Convergence {
        &self.convergence
    }

    /// 伪时间推进到收敛或迭代次数耗尽
    pub fn solve(&mut self, mesh: &mut Mesh) -> PfResult<SolveReport> {
        let mut residual = Vec::new();
        for iteration in 1..=self.max_iterations {
            self.integrator.update_cell_averages(mesh)?;
            residual = self.integrator.current_total_residual(mesh, self.norm)?;
            log::debug!("伪时间步 {}: 残差 {:?}", iteration, residual);

            if residual.iter().any(|r| !r.is_finite()) {
                return Err(PfError::numerical(format!(
                    "第 {} 步残差非有限: {:?}",
                    iteration, residual
                )));
            }
            if self.convergence.has_converged(&residual) {
                log::info!("伪时间迭代在第 {} 步收敛", iteration);
                return Ok(SolveReport {
                    iterations: iteration,
                    converged: true,
                    residual,
                });
            }
        }

        log::warn!(
            "伪时间迭代 {} 步后未收敛，残差 {:?}",
            self.max_iterations,
            residual
        );
        Ok(SolveReport {
            iterations: self.max_iterations,
            converged: false,
            residual,
        })
    }

    /// 双时间步推进 `steps` 个物理时间层
    ///
    /// 每层内伪时间迭代后把当前解移入 Uⁿ。未挂接物理时间离散时返回配置错误。
    pub fn run_real_time(&mut self, mesh: &mut Mesh, steps: usize) -> PfResult<Vec<SolveReport>> {
        if self.integrator.real_time_discretization().is_none() {
            return Err(PfError::config("未设置物理时间步 (time.real_dt)，无法进行双时间步推进"));
        }
        let mut reports = Vec::with_capacity(steps);
        for _ in 0..steps {
            let report = self.solve(mesh)?;
            self.integrator.advance_real_time(mesh);
            reports.push(report);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::ExtrapolatedBc;
    use crate::engine::timestep::LocalTimeStep;
    use crate::equations::LinearTransport;
    use crate::numerics::residual::DiffusionResidual;
    use pf_mesh::LineMeshGenerator;
    use std::sync::Arc;

    fn diffusion_problem(config: &SolverConfig) -> (Mesh, PseudoTimeSolver) {
        let mut mesh = LineMeshGenerator::new(2, 0.0, 1.0).build(1).unwrap();
        mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));
        mesh.cells_mut()[0].u[0] = 1.0;
        mesh.cells_mut()[1].u[0] = 3.0;

        let eq = Arc::new(LinearTransport::diffusion(vec![1.0]));
        let space = SpaceDiscretization::new(vec![Box::new(DiffusionResidual::new(eq.clone()))]);
        let solver =
            PseudoTimeSolver::from_config(config, &mesh, space, Box::new(LocalTimeStep::new(eq)))
                .unwrap();
        (mesh, solver)
    }

    #[test]
    fn test_converges_to_mean() {
        let config = SolverConfig::default();
        let (mut mesh, mut solver) = diffusion_problem(&config);
        let report = solver.solve(&mut mesh).unwrap();
        assert!(report.converged);
        assert!(report.iterations < 100);
        for cell in mesh.cells() {
            assert!((cell.u[0] - 2.0).abs() < 1e-7);
        }
    }

    #[test]
    fn test_budget_exhaustion_is_not_error() {
        let mut config = SolverConfig::default();
        config.convergence.max_iterations = 3;
        let (mut mesh, mut solver) = diffusion_problem(&config);
        let report = solver.solve(&mut mesh).unwrap();
        assert!(!report.converged);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.residual.len(), 1);
    }

    #[test]
    fn test_real_time_requires_dt() {
        let config = SolverConfig::default();
        let (mut mesh, mut solver) = diffusion_problem(&config);
        assert!(matches!(
            solver.run_real_time(&mut mesh, 1),
            Err(PfError::Config { .. })
        ));
    }

    #[test]
    fn test_equation_num_vars_rejected_at_setup() {
        let mut mesh = LineMeshGenerator::new(2, 0.0, 1.0).build(2).unwrap();
        mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));
        let eq = Arc::new(LinearTransport::diffusion(vec![1.0]));
        let space = SpaceDiscretization::new(vec![Box::new(DiffusionResidual::new(eq.clone()))]);
        let err = PseudoTimeSolver::from_config(
            &SolverConfig::default(),
            &mesh,
            space,
            Box::new(LocalTimeStep::new(eq)),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            PfError::SizeMismatch { name: "num_vars", expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_time_step_num_vars_rejected_at_setup() {
        let mut mesh = LineMeshGenerator::new(2, 0.0, 1.0).build(2).unwrap();
        mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));
        let eq2 = Arc::new(LinearTransport::diffusion(vec![1.0, 1.0]));
        let eq1 = Arc::new(LinearTransport::diffusion(vec![1.0]));
        let space = SpaceDiscretization::new(vec![Box::new(DiffusionResidual::new(eq2))]);
        let err = PseudoTimeSolver::from_config(
            &SolverConfig::default(),
            &mesh,
            space,
            Box::new(LocalTimeStep::new(eq1)),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PfError::SizeMismatch { .. }));
    }
}
