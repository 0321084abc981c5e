// crates/pf_physics/src/engine/norm.rs

//! 残差范数
//!
//! 输入为逐单元、逐变量的非负值（扁平行主序 `[n_cells × num_vars]`），
//! 对每个变量独立聚合：
//!
//! | 范数 | 定义 |
//! |------|------|
//! | L1   | 平均值 |
//! | L2   | 均方根 |
//! | L∞   | 最大值 |
//!
//! 对任意输入都有 L∞ ≥ L2 ≥ L1；所有值相同时三者相等。

use pf_config::NormKind;
use pf_foundation::KahanSum;
use pf_mesh::Mesh;

/// 归一化量级下限，低于该值用 1.0 代替
pub const MIN_MAGNITUDE: f64 = 1e-12;

/// 残差范数聚合
pub struct ResidualNorm;

impl ResidualNorm {
    /// 逐变量聚合
    ///
    /// `values` 长度应为 `num_vars` 的整数倍；没有单元时返回全零。
    pub fn aggregate(kind: NormKind, num_vars: usize, values: &[f64]) -> Vec<f64> {
        if num_vars == 0 {
            return Vec::new();
        }
        let n_cells = values.len() / num_vars;
        if n_cells == 0 {
            return vec![0.0; num_vars];
        }
        let column = |var: usize| values.chunks_exact(num_vars).map(move |row| row[var]);

        (0..num_vars)
            .map(|var| match kind {
                NormKind::L1 => KahanSum::sum_iter(column(var)) / n_cells as f64,
                NormKind::L2 => {
                    (KahanSum::sum_iter(column(var).map(|v| v * v)) / n_cells as f64).sqrt()
                }
                NormKind::LInf => column(var).fold(0.0, f64::max),
            })
            .collect()
    }

    /// 按网格平均 |U| 归一化
    pub fn normalize(norm: &mut [f64], mesh: &Mesh) {
        let magnitude = mesh.mean_abs_u();
        for (r, m) in norm.iter_mut().zip(magnitude) {
            *r /= if m < MIN_MAGNITUDE { 1.0 } else { m };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_mesh::LineMeshGenerator;

    #[test]
    fn test_constant_field_norms_agree() {
        let values = vec![0.25; 7 * 3];
        for kind in [NormKind::L1, NormKind::L2, NormKind::LInf] {
            let n = ResidualNorm::aggregate(kind, 3, &values);
            for v in n {
                assert!((v - 0.25).abs() < 1e-15, "{kind}: {v}");
            }
        }
    }

    #[test]
    fn test_norm_ordering() {
        let values = [0.1, 3.0, 0.0, 2.0, 7.5, 1.0, 0.3, 0.0];
        let l1 = ResidualNorm::aggregate(NormKind::L1, 2, &values);
        let l2 = ResidualNorm::aggregate(NormKind::L2, 2, &values);
        let li = ResidualNorm::aggregate(NormKind::LInf, 2, &values);
        for var in 0..2 {
            assert!(li[var] >= l2[var]);
            assert!(l2[var] >= l1[var]);
        }
        assert_eq!(li, vec![7.5, 3.0]);
        assert!((l1[0] - 7.9 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize() {
        let mut mesh = LineMeshGenerator::new(2, 0.0, 1.0).build(2).unwrap();
        mesh.cells_mut()[0].u.copy_from_slice(&[2.0, 0.0]);
        mesh.cells_mut()[1].u.copy_from_slice(&[-4.0, 0.0]);
        let mut norm = vec![1.5, 0.5];
        ResidualNorm::normalize(&mut norm, &mesh);
        assert!((norm[0] - 0.5).abs() < 1e-15);
        assert_eq!(norm[1], 0.5);
    }
}
