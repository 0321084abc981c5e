// crates/pf_physics/src/numerics/residual/mod.rs

//! 残差计算
//!
//! 约定：单元残差 R 满足 `U_new = U_old − R · dt / V`。
//!
//! - 面通量项：面上从 left 流向 right 的通量乘面积，left 加、right 减
//! - 源项：`R −= S · V`
//!
//! 各计算器在 [`SpaceDiscretization`](crate::numerics::SpaceDiscretization)
//! 中按登记顺序依次累加。

pub mod convection;
pub mod diffusion;
pub mod flux_accumulator;
pub mod source;

pub use convection::ConvectionResidual;
pub use diffusion::DiffusionResidual;
pub use flux_accumulator::{gather_face_fluxes, FaceFluxBuffer};
pub use source::SourceResidual;

use pf_foundation::PfResult;
use pf_mesh::Mesh;

/// 残差计算器
pub trait ResidualCalculator: Send + Sync {
    /// 名称
    fn name(&self) -> &'static str;

    /// 控制方程的变量数，必须与网格一致
    fn num_vars(&self) -> usize;

    /// 把本项贡献累加到内部单元残差
    ///
    /// 调用时边界条件已施加、残差已清零（或已含前序计算器的贡献）。
    /// 面通量缓冲由计算器持有，跨迭代复用。
    fn update_cell_residuals(&mut self, mesh: &mut Mesh) -> PfResult<()>;
}
