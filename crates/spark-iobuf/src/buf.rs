//! `bytes::Buf` / `bytes::BufMut` 适配。
//!
//! # 设计概要（How）
//! - `Buf` 直接映射到未读区：`chunk` 即 `readable_span`，`advance` 即 `drain`；
//! - `BufMut` 映射到空闲区，并像 `Vec<u8>` 一样按需扩容：空闲区为空时 `chunk_mut` 至少预留
//!   [`MIN_CHUNK_MUT`] 字节，`put_slice`/`put_bytes` 一次性预留整段长度后再拷贝；
//! - 读写两侧共享游标语义，因此编解码器可以在同一个 `IoBuf` 上交替 `put_*` 与 `get_*`。

use bytes::{Buf, BufMut, buf::UninitSlice};

use crate::IoBuf;

/// 空闲区耗尽时 `chunk_mut` 的最小预留量，与 `Vec<u8>` 的 `BufMut` 实现保持一致。
pub const MIN_CHUNK_MUT: usize = 64;

impl Buf for IoBuf {
    #[inline]
    fn remaining(&self) -> usize {
        self.rsize()
    }

    #[inline]
    fn chunk(&self) -> &[u8] {
        self.readable_span()
    }

    #[inline]
    fn advance(&mut self, cnt: usize) {
        self.drain(cnt);
    }
}

unsafe impl BufMut for IoBuf {
    #[inline]
    fn remaining_mut(&self) -> usize {
        isize::MAX as usize - self.rsize()
    }

    #[inline]
    unsafe fn advance_mut(&mut self, cnt: usize) {
        self.fill(cnt);
    }

    fn chunk_mut(&mut self) -> &mut UninitSlice {
        if self.wsize() == 0 {
            self.reserve(MIN_CHUNK_MUT);
            assert!(self.wsize() > 0, "IoBuf::chunk_mut 扩容失败");
        }
        UninitSlice::new(self.writable_span())
    }

    fn put_slice(&mut self, src: &[u8]) {
        let len = src.len();
        self.reserve(len);
        assert!(
            self.wsize() >= len,
            "IoBuf::put_slice 扩容失败：需要 {len}，实际 {}",
            self.wsize()
        );
        self.writable_span()[..len].copy_from_slice(src);
        self.fill(len);
    }

    fn put_bytes(&mut self, val: u8, cnt: usize) {
        self.reserve(cnt);
        assert!(
            self.wsize() >= cnt,
            "IoBuf::put_bytes 扩容失败：需要 {cnt}，实际 {}",
            self.wsize()
        );
        self.writable_span()[..cnt].fill(val);
        self.fill(cnt);
    }
}
