// crates/pf_physics/src/engine/convergence.rs

//! 收敛判断：每个变量的残差都严格小于各自容差才算收敛。

use pf_config::ConvergenceConfig;
use pf_foundation::{PfError, PfResult};

/// 逐变量收敛判据
#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    tolerances: Vec<f64>,
}

impl Convergence {
    /// 用逐变量容差创建
    pub fn new(tolerances: Vec<f64>) -> Self {
        Self { tolerances }
    }

    /// 从配置创建
    pub fn from_config(config: &ConvergenceConfig, num_vars: usize) -> PfResult<Self> {
        let tolerances = config.tolerances_for(num_vars)?;
        if let Some(t) = tolerances.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
            return Err(PfError::config(format!("收敛容差必须为有限正数: {}", t)));
        }
        Ok(Self::new(tolerances))
    }

    /// 逐变量容差
    pub fn tolerances(&self) -> &[f64] {
        &self.tolerances
    }

    /// 所有分量都严格小于容差
    ///
    /// 长度不一致时视为未收敛。NaN 分量不满足 `<`，同样视为未收敛。
    pub fn has_converged(&self, residual: &[f64]) -> bool {
        residual.len() == self.tolerances.len()
            && residual
                .iter()
                .zip(&self.tolerances)
                .all(|(r, tol)| r < tol)
    }
}
