//! `std::io` 集成。
//!
//! # 模块定位（Why）
//! - 典型的驱动循环是 `reserve(N)` → 接收方写入空闲区 → `fill(n)` → 解析方读取未读区 → `drain(n)`；
//!   [`IoBuf::fill_from`] 与 [`IoBuf::drain_into`] 把这两半各自收敛成一次调用；
//! - 同时实现 `Read`/`Write`/`BufRead`，让任意基于 `std::io` 的编解码器直接复用同一块内存。
//!
//! # 契约说明（What）
//! - 扩容失败以 `ErrorKind::OutOfMemory` 返回，缓冲容量不变；
//! - 读写端返回的字节数原样提交到游标，不做重试；`WouldBlock`/`Interrupted` 交由调用方处理。

use std::io;

use crate::IoBuf;

impl IoBuf {
    /// 从 `reader` 读取至多 `max` 字节追加到未读区，返回实际读取的字节数。
    ///
    /// 返回 `Ok(0)` 表示对端已到 EOF（或 `max == 0`）。
    pub fn fill_from<R>(&mut self, reader: &mut R, max: usize) -> io::Result<usize>
    where
        R: io::Read + ?Sized,
    {
        self.try_reserve(max)?;
        let n = reader.read(&mut self.writable_span()[..max])?;
        if n > max {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "reader reported more bytes than the span it was given",
            ));
        }
        self.fill(n);
        Ok(n)
    }

    /// 把未读区写入 `writer` 一次，按实际写出的字节数消费，返回该字节数。
    pub fn drain_into<W>(&mut self, writer: &mut W) -> io::Result<usize>
    where
        W: io::Write + ?Sized,
    {
        if self.is_empty() {
            return Ok(0);
        }
        let n = writer.write(self.readable_span())?;
        if n > self.rsize() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "writer reported more bytes than the span it was given",
            ));
        }
        self.drain(n);
        Ok(n)
    }
}

impl io::Write for IoBuf {
    fn write(&mut self, src: &[u8]) -> io::Result<usize> {
        self.try_reserve(src.len())?;
        self.writable_span()[..src.len()].copy_from_slice(src);
        self.fill(src.len());
        Ok(src.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for IoBuf {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let n = dst.len().min(self.rsize());
        dst[..n].copy_from_slice(&self.readable_span()[..n]);
        self.drain(n);
        Ok(n)
    }
}

impl io::BufRead for IoBuf {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.readable_span())
    }

    fn consume(&mut self, amt: usize) {
        self.drain(amt);
    }
}
