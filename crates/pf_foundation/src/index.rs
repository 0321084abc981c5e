// crates/pf_foundation/src/index.rs

//! 强类型计算索引
//!
//! 提供类型安全的索引类型，用于网格单元、面、节点和边界的引用。
//! 网格构建完成后索引只分配一次，之后保持冻结。
//!
//! # 示例
//!
//! ```rust
//! use pf_foundation::index::{CellIndex, FaceIndex};
//!
//! let c = CellIndex::new(0);
//! let f = FaceIndex::from(5);
//!
//! assert!(c.is_valid());
//! assert_eq!(f.get(), 5);
//! assert!(CellIndex::INVALID.is_invalid());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// 无效索引标记
pub const INVALID_INDEX: usize = usize::MAX;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// 无效索引常量
            pub const INVALID: Self = Self(INVALID_INDEX);

            /// 创建新索引
            #[inline]
            pub const fn new(idx: usize) -> Self {
                Self(idx)
            }

            /// 获取索引值
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// 检查是否有效
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != INVALID_INDEX
            }

            /// 检查是否无效
            #[inline]
            pub const fn is_invalid(self) -> bool {
                self.0 == INVALID_INDEX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(idx: usize) -> Self {
                Self::new(idx)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.get()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $label, self.0)
                } else {
                    write!(f, "{}(INVALID)", $label)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_index!(
    /// 单元索引。内部单元占 `0..N`，幽灵单元占 `N..N+G`。
    CellIndex,
    "Cell"
);

define_index!(
    /// 面索引。内部面在前，边界面按边界顺序在后。
    FaceIndex,
    "Face"
);

define_index!(
    /// 节点索引。真实节点在前，镜像（幽灵）节点在后。
    NodeIndex,
    "Node"
);

define_index!(
    /// 边界索引
    BoundaryIndex,
    "Boundary"
);
