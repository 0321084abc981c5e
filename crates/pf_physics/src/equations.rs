// crates/pf_physics/src/equations.rs

//! 控制方程接口
//!
//! 求解核心不关心具体物理模型，只通过 [`GoverningEquations`] 查询：
//! 变量数、法向对流通量、最大特征速度、扩散系数与源项。
//! 所有方法都是纯函数，可以在多个线程中同时调用。

use pf_mesh::Vector;
use smallvec::SmallVec;

/// 单个状态的逐变量临时量，常见变量数下不分配堆内存
pub type VarBuffer = SmallVec<[f64; 8]>;

/// 控制方程
///
/// 输出参数 `out` 的长度总是 [`num_vars`](Self::num_vars)。
pub trait GoverningEquations: Send + Sync {
    /// 变量数
    fn num_vars(&self) -> usize;

    /// 模型描述
    fn description(&self) -> &str {
        "governing equations"
    }

    /// 法向对流通量 `F(u)·n`
    fn convective_flux(&self, u: &[f64], normal: Vector, out: &mut [f64]);

    /// 沿 `normal` 的最大特征速度绝对值
    fn max_abs_eigenvalue(&self, u: &[f64], normal: Vector) -> f64;

    /// 逐变量扩散系数
    fn diffusivity(&self, u: &[f64], out: &mut [f64]);

    /// 最大扩散系数（时间步估计使用）
    fn max_diffusivity(&self, u: &[f64]) -> f64 {
        let mut d = VarBuffer::from_elem(0.0, self.num_vars());
        self.diffusivity(u, &mut d);
        d.into_iter().fold(0.0, f64::max)
    }

    /// 源项 `S(u, ∇u)`（单位体积）
    fn source(&self, u: &[f64], gradients: &[Vector], out: &mut [f64]);
}

/// 线性输运模型
///
/// ```text
/// ∂u_k/∂t + ∇·(a u_k) = ∇·(D_k ∇u_k) − λ_k u_k
/// ```
///
/// 常速度 `a`、逐变量扩散系数 `D_k` 与衰减率 `λ_k`。
#[derive(Debug, Clone)]
pub struct LinearTransport {
    velocity: Vector,
    diffusivity: Vec<f64>,
    decay: Vec<f64>,
}

impl LinearTransport {
    /// 创建 `num_vars` 个变量的纯对流模型
    pub fn new(num_vars: usize, velocity: Vector) -> Self {
        Self {
            velocity,
            diffusivity: vec![0.0; num_vars],
            decay: vec![0.0; num_vars],
        }
    }

    /// 纯扩散模型
    pub fn diffusion(diffusivity: Vec<f64>) -> Self {
        let n = diffusivity.len();
        Self {
            velocity: Vector::ZERO,
            diffusivity,
            decay: vec![0.0; n],
        }
    }

    /// 设置扩散系数
    ///
    /// # Panics
    /// 长度与变量数不一致时 panic。
    pub fn with_diffusivity(mut self, diffusivity: Vec<f64>) -> Self {
        assert_eq!(diffusivity.len(), self.diffusivity.len(), "扩散系数个数与变量数不一致");
        self.diffusivity = diffusivity;
        self
    }

    /// 设置衰减率
    ///
    /// # Panics
    /// 长度与变量数不一致时 panic。
    pub fn with_decay(mut self, decay: Vec<f64>) -> Self {
        assert_eq!(decay.len(), self.decay.len(), "衰减率个数与变量数不一致");
        self.decay = decay;
        self
    }

    /// 输运速度
    pub fn velocity(&self) -> Vector {
        self.velocity
    }
}

impl GoverningEquations for LinearTransport {
    fn num_vars(&self) -> usize {
        self.diffusivity.len()
    }

    fn description(&self) -> &str {
        "linear advection-diffusion-decay"
    }

    fn convective_flux(&self, u: &[f64], normal: Vector, out: &mut [f64]) {
        let un = self.velocity.dot(normal);
        for (o, &v) in out.iter_mut().zip(u) {
            *o = un * v;
        }
    }

    fn max_abs_eigenvalue(&self, _u: &[f64], normal: Vector) -> f64 {
        self.velocity.dot(normal).abs()
    }

    fn diffusivity(&self, _u: &[f64], out: &mut [f64]) {
        out.copy_from_slice(&self.diffusivity);
    }

    fn max_diffusivity(&self, _u: &[f64]) -> f64 {
        self.diffusivity.iter().copied().fold(0.0, f64::max)
    }

    fn source(&self, u: &[f64], _gradients: &[Vector], out: &mut [f64]) {
        for ((o, &v), &k) in out.iter_mut().zip(u).zip(&self.decay) {
            *o = -k * v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_transport_flux() {
        let eq = LinearTransport::new(2, Vector::new(2.0, -1.0, 0.0));
        let mut f = [0.0; 2];
        eq.convective_flux(&[1.0, 3.0], Vector::X, &mut f);
        assert_eq!(f, [2.0, 6.0]);
        assert_eq!(eq.max_abs_eigenvalue(&[1.0, 3.0], Vector::Y), 1.0);
    }

    #[test]
    fn test_diffusivity_and_source() {
        let eq = LinearTransport::diffusion(vec![0.5, 2.0]).with_decay(vec![1.0, 0.0]);
        assert_eq!(eq.num_vars(), 2);
        assert_eq!(eq.max_diffusivity(&[0.0, 0.0]), 2.0);
        let mut s = [0.0; 2];
        eq.source(&[4.0, 4.0], &[Vector::ZERO; 2], &mut s);
        assert_eq!(s, [-4.0, 0.0]);
    }
}
