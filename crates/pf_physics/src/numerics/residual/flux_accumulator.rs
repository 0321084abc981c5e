// crates/pf_physics/src/numerics/residual/flux_accumulator.rs

//! 面通量缓冲与单元收集
//!
//! 面并行计算通量时，同一单元的两个面可能在不同线程上同时处理，
//! 直接写单元残差会产生数据竞争。这里分两阶段完成累加：
//!
//! 1. **计算**：逐面并行，把每个面的通量（已乘面积，left → right 为正）
//!    写入扁平缓冲 `[n_faces × num_vars]` 的对应行，每行只有一个写者
//! 2. **收集**：逐单元并行，每个单元遍历自己的面，`left` 侧加、`right` 侧减
//!
//! 每个残差累加器只被它所属的单元任务写入，结果与线程数无关。
//! 边界面的 `right` 是幽灵单元，不在收集范围内。

use crate::numerics::parallel::ParallelPolicy;
use pf_foundation::FaceIndex;
use pf_mesh::{Face, Mesh};
use rayon::prelude::*;

/// 面通量缓冲
#[derive(Debug, Clone)]
pub struct FaceFluxBuffer {
    num_vars: usize,
    data: Vec<f64>,
}

impl FaceFluxBuffer {
    /// 创建全零缓冲
    pub fn new(n_faces: usize, num_vars: usize) -> Self {
        Self {
            num_vars,
            data: vec![0.0; n_faces * num_vars],
        }
    }

    /// 按网格调整大小，尺寸不变时保留已有分配
    pub fn resize_for(&mut self, mesh: &Mesh) {
        let len = mesh.n_faces() * mesh.num_vars();
        self.num_vars = mesh.num_vars();
        if self.data.len() != len {
            self.data.resize(len, 0.0);
        }
    }

    /// 变量数
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// 面通量
    #[inline]
    pub fn face(&self, face: FaceIndex) -> &[f64] {
        let start = face.get() * self.num_vars;
        &self.data[start..start + self.num_vars]
    }

    /// 面通量（可写）
    #[inline]
    pub fn face_mut(&mut self, face: FaceIndex) -> &mut [f64] {
        let start = face.get() * self.num_vars;
        &mut self.data[start..start + self.num_vars]
    }

    /// 逐面并行计算通量
    ///
    /// `flux(face, out)` 写入面 `face` 的通量，`out` 进入时为零。
    pub fn evaluate<F>(&mut self, mesh: &Mesh, policy: ParallelPolicy, flux: F)
    where
        F: Fn(&Face, &mut [f64]) + Sync + Send,
    {
        debug_assert_eq!(self.data.len(), mesh.n_faces() * self.num_vars);
        if self.num_vars == 0 {
            return;
        }
        self.data
            .par_chunks_mut(self.num_vars)
            .with_min_len(policy.min_len)
            .zip(mesh.faces().par_iter())
            .for_each(|(out, face)| {
                out.fill(0.0);
                flux(face, out);
            });
    }
}

/// 把面通量收集到内部单元残差
///
/// 单元是面的 `left` 时残差加通量，是 `right` 时减通量。
pub fn gather_face_fluxes(mesh: &mut Mesh, buffer: &FaceFluxBuffer, policy: ParallelPolicy) {
    let (cells, faces) = mesh.cells_and_faces_mut();
    cells
        .par_iter_mut()
        .with_min_len(policy.min_len)
        .for_each(|cell| {
            let index = cell.index();
            let (cell_faces, residual) = cell.faces_and_residual_mut();
            for &f in cell_faces {
                let flux = buffer.face(f);
                if faces[f.get()].left() == index {
                    for (r, &v) in residual.iter_mut().zip(flux) {
                        *r += v;
                    }
                } else {
                    for (r, &v) in residual.iter_mut().zip(flux) {
                        *r -= v;
                    }
                }
            }
        });
}
