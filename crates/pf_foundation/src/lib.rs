// crates/pf_foundation/src/lib.rs

//! PolyFlux Foundation Layer
//!
//! 基础层，为网格、配置和物理求解层提供公共抽象。
//!
//! # 模块概览
//!
//! - [`index`]: 强类型索引（单元、面、节点、边界）
//! - [`error`]: 统一错误类型 `PfError` / `PfResult`
//! - [`kahan`]: Kahan 补偿求和
//! - [`logging`]: 日志初始化
//!
//! # 示例
//!
//! ```
//! use pf_foundation::{CellIndex, PfError, PfResult};
//!
//! fn check(cell: CellIndex, n_cells: usize) -> PfResult<()> {
//!     if cell.get() >= n_cells {
//!         return Err(PfError::index_out_of_bounds("Cell", cell.get(), n_cells));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(CellIndex::new(3), 2).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod kahan;
pub mod logging;

// 重导出常用类型
pub use error::{PfError, PfResult};
pub use index::{BoundaryIndex, CellIndex, FaceIndex, NodeIndex, INVALID_INDEX};
pub use kahan::KahanSum;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{PfError, PfResult};
    pub use crate::index::{BoundaryIndex, CellIndex, FaceIndex, NodeIndex};
    pub use crate::kahan::KahanSum;
}
