// crates/pf_config/src/solver_config.rs

//! SolverConfig - 求解器配置
//!
//! 伪时间推进所需的全部参数：Courant 数、积分器、可选的物理时间步、
//! 收敛判据与并行阈值。所有字段都有默认值，JSON 中可以只写需要覆盖的项。
//!
//! ```
//! use pf_config::{NormKind, SolverConfig};
//!
//! let config = SolverConfig::from_json_str(r#"{
//!     "time": { "courant_number": 0.5 },
//!     "convergence": { "norm": "linf", "tolerance": 1e-6 }
//! }"#).unwrap();
//!
//! assert_eq!(config.convergence.norm, NormKind::LInf);
//! assert_eq!(config.convergence.max_iterations, 10_000);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::kinds::{IntegratorKind, NormKind};

/// Courant 数上限
pub const MAX_COURANT_NUMBER: f64 = 10.0;

/// 求解器配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 时间推进
    #[serde(default)]
    pub time: TimeConfig,

    /// 收敛判据
    #[serde(default)]
    pub convergence: ConvergenceConfig,

    /// 并行
    #[serde(default)]
    pub parallel: ParallelConfig,
}

/// 时间推进配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Courant 数
    #[serde(default = "default_courant")]
    pub courant_number: f64,

    /// 伪时间积分器
    #[serde(default)]
    pub integrator: IntegratorKind,

    /// 物理时间步（设置后启用双时间步）
    #[serde(default)]
    pub real_dt: Option<f64>,
}

fn default_courant() -> f64 { 1.0 }

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            courant_number: default_courant(),
            integrator: IntegratorKind::default(),
            real_dt: None,
        }
    }
}

/// 收敛判据配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// 残差范数
    #[serde(default)]
    pub norm: NormKind,

    /// 默认容差（未给出逐变量容差时使用）
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// 逐变量容差
    #[serde(default)]
    pub tolerances: Option<Vec<f64>>,

    /// 最大伪时间迭代次数
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_tolerance() -> f64 { 1e-8 }
fn default_max_iterations() -> usize { 10_000 }

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            norm: NormKind::default(),
            tolerance: default_tolerance(),
            tolerances: None,
            max_iterations: default_max_iterations(),
        }
    }
}

impl ConvergenceConfig {
    /// 展开为逐变量容差
    ///
    /// 给出了 `tolerances` 时长度必须等于 `num_vars`。
    pub fn tolerances_for(&self, num_vars: usize) -> Result<Vec<f64>, ConfigError> {
        match &self.tolerances {
            Some(list) => {
                if list.len() != num_vars {
                    return Err(ConfigError::invalid_value(
                        "convergence.tolerances",
                        format!("{:?}", list),
                        format!("需要 {} 个容差，实际 {}", num_vars, list.len()),
                    ));
                }
                Ok(list.clone())
            }
            None => Ok(vec![self.tolerance; num_vars]),
        }
    }
}

/// 并行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// 低于该单元数时串行执行
    #[serde(default = "default_min_parallel_size")]
    pub min_parallel_size: usize,
}

fn default_min_parallel_size() -> usize { 512 }

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            min_parallel_size: default_min_parallel_size(),
        }
    }
}

impl SolverConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        let config = Self::from_json_str(&content)?;
        log::info!("已加载求解器配置: {}", path.as_ref().display());
        Ok(config)
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cn = self.time.courant_number;
        if !(cn > 0.0 && cn <= MAX_COURANT_NUMBER) {
            return Err(ConfigError::invalid_value(
                "time.courant_number",
                cn,
                format!("Courant 数必须在 (0, {}] 范围内", MAX_COURANT_NUMBER),
            ));
        }

        if let Some(dt) = self.time.real_dt {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(ConfigError::invalid_value(
                    "time.real_dt",
                    dt,
                    "物理时间步必须为有限正数",
                ));
            }
        }

        let tol = self.convergence.tolerance;
        if !(tol.is_finite() && tol > 0.0) {
            return Err(ConfigError::invalid_value(
                "convergence.tolerance",
                tol,
                "容差必须为有限正数",
            ));
        }

        if let Some(list) = &self.convergence.tolerances {
            if list.is_empty() {
                return Err(ConfigError::Missing("convergence.tolerances".to_string()));
            }
            if let Some(bad) = list.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
                return Err(ConfigError::invalid_value(
                    "convergence.tolerances",
                    bad,
                    "容差必须为有限正数",
                ));
            }
        }

        if self.convergence.max_iterations == 0 {
            return Err(ConfigError::invalid_value(
                "convergence.max_iterations",
                0,
                "至少需要一次迭代",
            ));
        }

        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time.courant_number, 1.0);
        assert_eq!(config.time.integrator, IntegratorKind::ExplicitEuler);
        assert_eq!(config.convergence.max_iterations, 10_000);
    }

    #[test]
    fn test_invalid_courant() {
        let mut config = SolverConfig::default();
        config.time.courant_number = 0.0;
        assert!(config.validate().is_err());
        config.time.courant_number = 10.5;
        assert!(config.validate().is_err());
        config.time.courant_number = 10.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_real_dt() {
        let mut config = SolverConfig::default();
        config.time.real_dt = Some(-1.0);
        assert!(config.validate().is_err());
        config.time.real_dt = Some(f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tolerances_for() {
        let mut c = ConvergenceConfig::default();
        assert_eq!(c.tolerances_for(3).unwrap(), vec![1e-8; 3]);
        c.tolerances = Some(vec![1e-3, 1e-4]);
        assert_eq!(c.tolerances_for(2).unwrap(), vec![1e-3, 1e-4]);
        assert!(c.tolerances_for(3).is_err());
    }

    #[test]
    fn test_unknown_norm_rejected() {
        let err = SolverConfig::from_json_str(r#"{"convergence": {"norm": "l3"}}"#);
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut config = SolverConfig::default();
        config.time.real_dt = Some(0.01);
        config.convergence.tolerances = Some(vec![1e-6, 1e-7]);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
