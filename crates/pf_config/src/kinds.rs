// crates/pf_config/src/kinds.rs

//! 范数与时间积分器选择
//!
//! 两个枚举都支持 serde（小写蛇形名）和 `FromStr`。
//! 无法识别的范数名称是建立阶段错误，不会退回默认值。

use pf_foundation::PfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 残差范数类型
///
/// ```
/// use pf_config::NormKind;
///
/// assert_eq!("infinity".parse::<NormKind>().unwrap(), NormKind::LInf);
/// assert!("l3".parse::<NormKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NormKind {
    /// 平均绝对值
    #[serde(rename = "l1")]
    L1,
    /// 均方根
    #[default]
    #[serde(rename = "l2")]
    L2,
    /// 最大绝对值
    #[serde(rename = "linf")]
    LInf,
}

impl NormKind {
    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::L1 => "l1",
            Self::L2 => "l2",
            Self::LInf => "linf",
        }
    }
}

impl fmt::Display for NormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for NormKind {
    type Err = PfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l1" | "one" => Ok(Self::L1),
            "l2" | "two" => Ok(Self::L2),
            "linf" | "l_inf" | "infinity" => Ok(Self::LInf),
            _ => Err(PfError::UnsupportedNorm(s.to_string())),
        }
    }
}

/// 伪时间积分器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// 显式 Euler
    #[default]
    ExplicitEuler,
    /// 两级强稳定保持 Runge-Kutta
    SspRk2,
}

impl IntegratorKind {
    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExplicitEuler => "explicit_euler",
            Self::SspRk2 => "ssp_rk2",
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = PfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "explicit_euler" | "euler" => Ok(Self::ExplicitEuler),
            "ssp_rk2" | "ssprk2" | "rk2" => Ok(Self::SspRk2),
            _ => Err(PfError::config(format!("未知的时间积分器: '{}'", s))),
        }
    }
}
