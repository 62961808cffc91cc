//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - `IoBuf` 只有一种可恢复的失败：`reserve` 的扩容步骤拿不到内存；
//! - 越界的 `fill`/`drain` 属于调用方违约，直接 panic，不进入本模块的错误域。
//!
//! ## 设计要求（What）
//! - 错误类型实现 `thiserror::Error`，兼容 `core::error::Error`；
//! - 变体携带失败时的容量上下文，便于调用方决定降级还是放弃本轮读取。

use alloc::collections::TryReserveError;

use thiserror::Error;

/// `IoBuf` 的可恢复错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：[`IoBuf::try_reserve`](crate::IoBuf::try_reserve) 需要把“为什么没有拿到空闲空间”
///   告诉调用方；[`IoBuf::reserve`](crate::IoBuf::reserve) 则吞掉错误、仅保留原状态。
/// - **契约 (What)**：出现任一变体时，缓冲容量保持调用前的值，未读内容不受影响。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum IoBufError {
    /// 目标容量超出 `usize` 表示范围。
    #[error("iobuf capacity overflow: capacity {capacity} + {additional} does not fit in usize")]
    CapacityOverflow { capacity: usize, additional: usize },

    /// 分配器拒绝了扩容请求。
    ///
    /// - `requested`：本次尝试扩到的总容量；
    /// - `capacity`：失败后仍然保持的原容量。
    #[error("iobuf allocation failed: requested capacity {requested}, current capacity {capacity}")]
    AllocationFailed {
        requested: usize,
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

impl IoBufError {
    /// 失败时缓冲仍然持有的容量。
    pub fn capacity(&self) -> usize {
        match self {
            IoBufError::CapacityOverflow { capacity, .. } => *capacity,
            IoBufError::AllocationFailed { capacity, .. } => *capacity,
        }
    }
}

#[cfg(feature = "std")]
impl From<IoBufError> for std::io::Error {
    fn from(err: IoBufError) -> Self {
        std::io::Error::new(std::io::ErrorKind::OutOfMemory, err)
    }
}
