// crates/pf_foundation/src/kahan.rs

//! Kahan 求和算法
//!
//! 残差范数和网格平均量需要对大量单元求和，使用补偿求和降低舍入误差累积。

/// Kahan 补偿求和器
///
/// # 示例
///
/// ```rust
/// use pf_foundation::KahanSum;
///
/// let total = KahanSum::sum_iter([0.1; 10]);
/// assert!((total - 1.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum {
    sum: f64,
    compensation: f64,
}

impl KahanSum {
    /// 创建新的求和器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个值
    #[inline]
    pub fn add(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// 获取当前求和值
    #[inline]
    pub fn value(&self) -> f64 {
        self.sum
    }

    /// 合并另一个求和器（用于并行归约）
    #[inline]
    pub fn merge(mut self, other: Self) -> Self {
        self.add(other.sum);
        self.add(-other.compensation);
        self
    }

    /// 从迭代器求和
    pub fn sum_iter<I: IntoIterator<Item = f64>>(iter: I) -> f64 {
        let mut kahan = Self::new();
        for v in iter {
            kahan.add(v);
        }
        kahan.value()
    }
}
