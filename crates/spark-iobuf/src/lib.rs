#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! `spark-iobuf` 提供读写共用一块连续内存的单所有者可增长字节缓冲。
//!
//! # 模块定位（Why）
//! - 传输层与编解码器之间反复执行“接收进缓冲 → 从缓冲解析”的循环，
//!   `IoBuf` 让两侧在同一块内存上原地推进游标，而不是每轮复制一次；
//! - 空间不足时优先把未读区压缩回偏移 0，只有压缩仍不够时才扩容，避免无界增长。
//!
//! # 设计概要（How）
//! - `io_buf` 模块实现 [`IoBuf`] 本体：`reserve`/`writable_span`/`fill`/`readable_span`/`drain`；
//! - `config` 模块提供可反序列化的 [`IoBufConfig`] 与 [`GrowthPolicy`]；
//! - `error` 模块定义扩容失败时的 [`IoBufError`]；
//! - `buf` 模块实现 `bytes::Buf`/`bytes::BufMut`，`io` 模块（`std` 特性）实现 `std::io` 读写接口。
//!
//! # 使用示例
//! ```
//! use spark_iobuf::IoBuf;
//!
//! let mut buf = IoBuf::new();
//! buf.reserve(5);
//! buf.writable_span()[..5].copy_from_slice(b"hello");
//! buf.fill(5);
//!
//! assert_eq!(buf.readable_span(), b"hello");
//! buf.drain(5);
//! assert_eq!(buf.rsize(), 0);
//! assert_eq!(buf.wsize(), 5);
//! ```
//!
//! # 并发约束
//! `IoBuf` 不做任何内部同步。所有修改都要求 `&mut self`，
//! 需要跨线程时请转移所有权，或由调用方自行加锁。

extern crate alloc;

mod buf;
mod config;
mod error;
#[cfg(feature = "std")]
mod io;
mod io_buf;

pub use buf::MIN_CHUNK_MUT;
pub use config::{GrowthPolicy, IoBufConfig};
pub use error::IoBufError;
pub use io_buf::{IoBuf, IoBufStats};
