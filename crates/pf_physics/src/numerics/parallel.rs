// crates/pf_physics/src/numerics/parallel.rs

//! 并行粒度控制
//!
//! 所有逐单元/逐面循环都用 rayon 执行，`min_len` 作为 `with_min_len` 的参数：
//! 规模小于该值的循环不会被拆分，等价于串行执行。

use pf_config::ParallelConfig;

/// 默认最小并行规模
pub const DEFAULT_MIN_PARALLEL_SIZE: usize = 512;

/// 并行粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelPolicy {
    /// 每个任务最少处理的元素数
    pub min_len: usize,
}

impl ParallelPolicy {
    /// 指定最小并行规模
    pub fn new(min_len: usize) -> Self {
        Self {
            min_len: min_len.max(1),
        }
    }

    /// 完全串行
    pub fn serial() -> Self {
        Self { min_len: usize::MAX }
    }

    /// 从配置创建
    pub fn from_config(config: &ParallelConfig) -> Self {
        Self::new(config.min_parallel_size)
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PARALLEL_SIZE)
    }
}
