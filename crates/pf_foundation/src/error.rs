// crates/pf_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `PfError` 枚举和 `PfResult` 类型别名，用于整个项目的错误处理。
//!
//! 显式推进格式是确定性的：缺失边界条件、奇异的最小二乘系统等都是配置缺陷，
//! 在建立阶段立即返回错误，不做重试，也不静默使用默认值。
//!
//! # 示例
//!
//! ```
//! use pf_foundation::error::{PfError, PfResult};
//!
//! fn lookup_bc(name: &str) -> PfResult<()> {
//!     Err(PfError::missing_boundary_condition(name))
//! }
//!
//! assert!(lookup_bc("inlet").is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type PfResult<T> = Result<T, PfError>;

/// PolyFlux 错误类型
#[derive(Error, Debug)]
pub enum PfError {
    // ========================================================================
    // 网格相关错误
    // ========================================================================
    /// 无效网格拓扑
    #[error("无效的网格拓扑: {message}")]
    InvalidMesh {
        /// 具体错误信息
        message: String,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    // ========================================================================
    // 建立阶段错误
    // ========================================================================
    /// 边界未指定边界条件
    #[error("边界 '{boundary}' 未定义边界条件")]
    MissingBoundaryCondition {
        /// 边界名称
        boundary: String,
    },

    /// 最小二乘模板奇异
    #[error("单元 {cell} 的最小二乘法方程奇异 (det = {det:e})，模板独立方向不足 3 个")]
    SingularStencil {
        /// 单元索引
        cell: usize,
        /// 法方程矩阵行列式
        det: f64,
    },

    /// 不支持的范数类型
    #[error("不支持的范数类型: {0}")]
    UnsupportedNorm(String),

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    // ========================================================================
    // 数值错误
    // ========================================================================
    /// 数值错误（NaN/Inf 等）
    #[error("数值错误: {message}")]
    Numerical {
        /// 错误描述
        message: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

impl PfError {
    /// 创建网格拓扑错误
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 创建索引越界错误
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 创建大小不匹配错误
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 创建缺失边界条件错误
    pub fn missing_boundary_condition(boundary: impl Into<String>) -> Self {
        Self::MissingBoundaryCondition {
            boundary: boundary.into(),
        }
    }

    /// 创建奇异模板错误
    pub fn singular_stencil(cell: usize, det: f64) -> Self {
        Self::SingularStencil { cell, det }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 创建数值错误
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 是否为建立阶段（配置类）错误
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::MissingBoundaryCondition { .. }
                | Self::SingularStencil { .. }
                | Self::UnsupportedNorm(_)
                | Self::Config { .. }
                | Self::InvalidMesh { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bc_message() {
        let err = PfError::missing_boundary_condition("inlet");
        let msg = err.to_string();
        assert!(msg.contains("inlet"));
        assert!(err.is_setup_error());
    }

    #[test]
    fn test_singular_stencil_message() {
        let err = PfError::singular_stencil(7, 0.0);
        assert!(err.to_string().contains('7'));
        assert!(err.is_setup_error());
    }

    #[test]
    fn test_numerical_is_not_setup() {
        let err = PfError::numerical("dt = NaN");
        assert!(!err.is_setup_error());
    }

    #[test]
    fn test_size_mismatch_message() {
        let err = PfError::size_mismatch("U", 3, 2);
        let msg = err.to_string();
        assert!(msg.contains('3') && msg.contains('2'));
    }
}
