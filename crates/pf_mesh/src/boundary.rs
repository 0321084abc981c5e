// crates/pf_mesh/src/boundary.rs

//! 边界与边界条件接口
//!
//! 边界是具名的边界面集合，每个边界必须绑定一个边界条件策略。
//! 边界条件只负责一件事：根据内部单元状态设置边界面和幽灵单元的状态。

use crate::entities::{Cell, Face};
use pf_foundation::{BoundaryIndex, FaceIndex, PfError, PfResult};
use std::fmt;
use std::sync::Arc;

/// 边界条件策略
///
/// 每个边界面调用一次 [`set_ghost_cell_values`](Self::set_ghost_cell_values)。
/// 不同边界面互不依赖，可以并行调用。
pub trait BoundaryCondition: Send + Sync {
    /// 边界条件名称
    fn name(&self) -> &'static str;

    /// 设置边界面与幽灵单元状态
    ///
    /// # 参数
    /// - `face`: 边界面（可写 `face.u`）
    /// - `inside`: 面内侧的真实单元
    /// - `ghost`: 面外侧的幽灵单元（可写 `ghost.u`）
    fn set_ghost_cell_values(&self, face: &mut Face, inside: &Cell, ghost: &mut Cell);

    /// 边界条件自带的变量数（如固定值个数），不依赖变量数的返回 `None`
    fn num_vars(&self) -> Option<usize> {
        None
    }
}

/// 具名边界
#[derive(Clone)]
pub struct Boundary {
    pub(crate) index: BoundaryIndex,
    pub(crate) name: String,
    pub(crate) faces: Vec<FaceIndex>,
    pub(crate) bc: Option<Arc<dyn BoundaryCondition>>,
}

impl Boundary {
    /// 边界索引
    pub fn index(&self) -> BoundaryIndex {
        self.index
    }

    /// 边界名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 边界面索引
    pub fn faces(&self) -> &[FaceIndex] {
        &self.faces
    }

    /// 已绑定的边界条件
    pub fn bc(&self) -> Option<&Arc<dyn BoundaryCondition>> {
        self.bc.as_ref()
    }

    /// 获取边界条件，未绑定时返回错误
    pub fn require_bc(&self) -> PfResult<&Arc<dyn BoundaryCondition>> {
        self.bc
            .as_ref()
            .ok_or_else(|| PfError::missing_boundary_condition(self.name.clone()))
    }

    /// 检查已绑定边界条件的变量数与网格一致
    pub fn check_bc_num_vars(&self, num_vars: usize) -> PfResult<()> {
        match self.bc.as_ref().and_then(|bc| bc.num_vars()) {
            Some(n) if n != num_vars => Err(PfError::size_mismatch("num_vars", num_vars, n)),
            _ => Ok(()),
        }
    }

    /// 绑定边界条件
    pub fn set_bc(&mut self, bc: Arc<dyn BoundaryCondition>) {
        self.bc = Some(bc);
    }
}

impl fmt::Debug for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Boundary")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("n_faces", &self.faces.len())
            .field("bc", &self.bc.as_ref().map(|bc| bc.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_bc_missing() {
        let b = Boundary {
            index: BoundaryIndex::new(0),
            name: "wall".to_string(),
            faces: Vec::new(),
            bc: None,
        };
        let err = b.require_bc().err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("wall"));
        assert!(format!("{:?}", b).contains("wall"));
    }

    struct Fixed(usize);

    impl BoundaryCondition for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn set_ghost_cell_values(&self, _face: &mut Face, _inside: &Cell, _ghost: &mut Cell) {}

        fn num_vars(&self) -> Option<usize> {
            Some(self.0)
        }
    }

    #[test]
    fn test_check_bc_num_vars() {
        let mut b = Boundary {
            index: BoundaryIndex::new(0),
            name: "inlet".to_string(),
            faces: Vec::new(),
            bc: None,
        };
        assert!(b.check_bc_num_vars(2).is_ok());
        b.set_bc(Arc::new(Fixed(2)));
        assert!(b.check_bc_num_vars(2).is_ok());
        assert!(matches!(
            b.check_bc_num_vars(3),
            Err(PfError::SizeMismatch { expected: 3, actual: 2, .. })
        ));
    }
}
