// crates/pf_physics/src/initializer.rs

//! 初始场
//!
//! 在单元形心处取值，对每个内部单元的 U 赋值一次。

use pf_foundation::{PfError, PfResult};
use pf_mesh::{Mesh, Point, Vector};
use rayon::prelude::*;

/// 初始场
pub trait SolutionInitializer: Send + Sync {
    /// 点 `p` 处的状态向量
    fn value_at(&self, p: &Point) -> Vec<f64>;
}

/// 常数初始场
#[derive(Debug, Clone)]
pub struct ConstantInitializer {
    values: Vec<f64>,
}

impl ConstantInitializer {
    /// 创建常数初始场
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl SolutionInitializer for ConstantInitializer {
    fn value_at(&self, _p: &Point) -> Vec<f64> {
        self.values.clone()
    }
}

/// 闭包初始场
pub struct FunctionInitializer<F> {
    f: F,
}

impl<F> FunctionInitializer<F>
where
    F: Fn(&Point) -> Vec<f64> + Send + Sync,
{
    /// 包装闭包
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SolutionInitializer for FunctionInitializer<F>
where
    F: Fn(&Point) -> Vec<f64> + Send + Sync,
{
    fn value_at(&self, p: &Point) -> Vec<f64> {
        (self.f)(p)
    }
}

/// 线性函数 `φ(p) = value + gradient · (p − point)`
///
/// ```
/// use pf_mesh::{Point, Vector};
/// use pf_physics::initializer::LinearFunction;
///
/// let f = LinearFunction::new(Point::new(1.0, 0.0, 0.0), 2.0, Vector::new(3.0, 0.0, 1.0));
/// assert_eq!(f.value_at(&Point::new(2.0, 5.0, 1.0)), 6.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFunction {
    point: Point,
    value: f64,
    gradient: Vector,
}

impl LinearFunction {
    /// 创建线性函数
    pub fn new(point: Point, value: f64, gradient: Vector) -> Self {
        Self {
            point,
            value,
            gradient,
        }
    }

    /// 梯度
    pub fn gradient(&self) -> Vector {
        self.gradient
    }

    /// 在 `p` 处取值
    pub fn value_at(&self, p: &Point) -> f64 {
        self.value + self.gradient.dot(self.point.vector_to(p))
    }
}

/// 每个变量一个线性函数
impl SolutionInitializer for Vec<LinearFunction> {
    fn value_at(&self, p: &Point) -> Vec<f64> {
        self.iter().map(|f| f.value_at(p)).collect()
    }
}

/// 用初始场为所有内部单元赋值
///
/// 返回值长度与网格变量数不一致时报错，网格状态不被修改。
pub fn initialize_cells(mesh: &mut Mesh, init: &dyn SolutionInitializer) -> PfResult<()> {
    let num_vars = mesh.num_vars();
    let values: Vec<Vec<f64>> = mesh
        .cells()
        .par_iter()
        .map(|cell| init.value_at(&cell.centroid()))
        .collect();

    if let Some(bad) = values.iter().find(|v| v.len() != num_vars) {
        return Err(PfError::size_mismatch("initial values", num_vars, bad.len()));
    }

    mesh.cells_mut()
        .par_iter_mut()
        .zip(values.into_par_iter())
        .for_each(|(cell, v)| cell.u = v);

    log::info!("初始化 {} 个单元 ({} 变量)", mesh.n_cells(), num_vars);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_mesh::LineMeshGenerator;

    #[test]
    fn test_function_initializer() {
        let mut mesh = LineMeshGenerator::new(4, 0.0, 1.0).build(1).unwrap();
        let init = FunctionInitializer::new(|p: &Point| vec![p.x * 2.0]);
        initialize_cells(&mut mesh, &init).unwrap();
        let u: Vec<f64> = mesh.cells().iter().map(|c| c.u[0]).collect();
        assert_eq!(u, vec![0.25, 0.75, 1.25, 1.75]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let mut mesh = LineMeshGenerator::new(2, 0.0, 1.0).build(2).unwrap();
        let err = initialize_cells(&mut mesh, &ConstantInitializer::new(vec![1.0])).unwrap_err();
        assert!(matches!(err, PfError::SizeMismatch { expected: 2, actual: 1, .. }));
        assert!(mesh.cells().iter().all(|c| c.u == vec![0.0, 0.0]));
    }

    #[test]
    fn test_linear_function() {
        let f = LinearFunction::new(
            Point::new(58.0, 7.0, -8.0),
            2.0,
            Vector::new(12.0, 87.0, 36.0),
        );
        let expected = 2.0 + 12.0 * (25.0 - 58.0) + 87.0 * 0.0 + 36.0 * (3.0 + 8.0);
        assert!((f.value_at(&Point::new(25.0, 7.0, 3.0)) - expected).abs() < 1e-12);
        assert_eq!(f.gradient(), Vector::new(12.0, 87.0, 36.0));
    }
}
