use alloc::vec::Vec;
use core::fmt;

use crate::{GrowthPolicy, IoBufConfig, IoBufError};

/// `IoBufStats` 记录一个缓冲实例在生命周期内的布局变化次数。
///
/// - `reallocations`：扩容（可能移动底层内存块）的次数；
/// - `compactions`：把未读区搬回偏移 0 的次数；
/// - `cursor_resets`：`drain` 读空后游标归零的次数，这条路径不拷贝任何字节。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IoBufStats {
    pub reallocations: usize,
    pub compactions: usize,
    pub cursor_resets: usize,
}

/// `IoBuf` 是读写共用一块连续内存的可增长字节缓冲。
///
/// ```text
///      <--------------- capacity -------------->
///     +-----------------------------------------+
///     | | | | | | | | | |D|D|D|D|D| | | | | | | |
///     +^-----------------^---------^------------+
///      |                 |         |
///   storage          read_start  write_start
/// ```
///
/// # 设计动机（Why）
/// - 网络/文件 I/O 代码通常交替执行“接收到缓冲”与“从缓冲解析”，
///   分离的读写缓冲会在每一轮都复制一次数据；
/// - `IoBuf` 用两个游标把同一块内存划分为“已消费区 / 未读区 / 空闲区”，
///   写入与读取都在原地完成，只在空间不足时才压缩或扩容。
///
/// # 使用方式（How）
/// 1. [`reserve`](Self::reserve) 确保空闲区至少有 N 字节；
/// 2. 把 [`writable_span`](Self::writable_span) 交给接收方写入；
/// 3. [`fill`](Self::fill) 提交实际写入的字节数；
/// 4. 把 [`readable_span`](Self::readable_span) 交给解析方；
/// 5. [`drain`](Self::drain) 标记已消费的字节数。
///
/// # 契约说明（What）
/// - 任意公开调用前后都满足 `read_start <= write_start <= capacity`；
/// - 容量为 0 时不持有任何堆内存，两个游标均为 0；
/// - 读写视图都是借用，借用检查器保证它们不会跨越下一次 `reserve`/`fill`/`drain` 存活；
/// - 单一所有者：所有修改操作都需要 `&mut self`，跨线程传递需要转移所有权或外部同步。
///
/// # 风险与取舍（Trade-offs）
/// - 底层存储总是初始化过的字节（扩容时补零），换来完全安全的 `&mut [u8]` 写视图；
/// - 默认扩容策略只补足缺口，单调增长时每次都会重新分配，见 [`GrowthPolicy`]。
pub struct IoBuf {
    storage: Vec<u8>,
    read_start: usize,
    write_start: usize,
    growth: GrowthPolicy,
    stats: IoBufStats,
}

impl IoBuf {
    /// 创建容量为 0 的空缓冲，不分配内存。
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            read_start: 0,
            write_start: 0,
            growth: GrowthPolicy::default(),
            stats: IoBufStats::default(),
        }
    }

    /// 创建空缓冲并立即预留 `initial` 字节空闲空间。
    ///
    /// 分配失败不会在这里报告，调用方可通过 [`wsize`](Self::wsize) 观察。
    pub fn with_capacity(initial: usize) -> Self {
        Self::with_config(IoBufConfig::new().with_initial_capacity(initial))
    }

    /// 按配置创建缓冲。
    pub fn with_config(config: IoBufConfig) -> Self {
        let mut buf = Self::new();
        buf.growth = config.growth;
        buf.reserve(config.initial_capacity);
        buf
    }

    /// 当前生效的配置；`initial_capacity` 反映当前容量。
    pub fn config(&self) -> IoBufConfig {
        IoBufConfig::new()
            .with_initial_capacity(self.capacity())
            .with_growth(self.growth)
    }

    /// 底层内存块的总字节数。
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// 未读字节数。
    #[inline]
    pub fn rsize(&self) -> usize {
        self.write_start - self.read_start
    }

    /// 空闲字节数，即 `writable_span` 的长度。
    #[inline]
    pub fn wsize(&self) -> usize {
        self.capacity() - self.write_start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read_start == self.write_start
    }

    pub fn stats(&self) -> IoBufStats {
        self.stats
    }

    /// 确保 `write_start` 之后至少有 `min_free` 字节连续空闲空间。
    ///
    /// # 执行步骤（How）
    /// 1. `min_free == 0` 或空闲空间已足够时直接返回，游标与容量都不变；
    /// 2. 若前部存在已消费区，先把未读区搬到偏移 0；搬完足够则返回；
    /// 3. 否则按 [`GrowthPolicy`] 扩容；
    /// 4. 扩容失败时容量不变并记录告警，调用方需自行比较 `wsize()` 与 `min_free`。
    ///
    /// 压缩与扩容都会使之前取得的读写视图失效，借用规则已在编译期排除这种用法。
    pub fn reserve(&mut self, min_free: usize) {
        if let Err(err) = self.try_reserve(min_free) {
            tracing::warn!(
                min_free,
                capacity = err.capacity(),
                error = %err,
                "iobuf reserve failed, capacity unchanged"
            );
        }
    }

    /// 与 [`reserve`](Self::reserve) 相同的策略，但把扩容失败作为错误返回。
    ///
    /// 返回 `Err` 时容量不变；若压缩步骤已执行，游标停在压缩后的位置，未读内容不变。
    pub fn try_reserve(&mut self, min_free: usize) -> Result<(), IoBufError> {
        if min_free == 0 || min_free <= self.wsize() {
            return Ok(());
        }

        if self.read_start != 0 {
            self.compact();
            if min_free <= self.wsize() {
                return Ok(());
            }
        }

        let capacity = self.capacity();
        let shortfall = min_free - self.wsize();
        let target = self
            .growth
            .next_capacity(capacity, shortfall)
            .ok_or(IoBufError::CapacityOverflow {
                capacity,
                additional: shortfall,
            })?;
        self.grow(target)
    }

    /// 从 `write_start` 开始的空闲区。
    ///
    /// 调用方最多写入 `wsize()` 字节，随后用 [`fill`](Self::fill) 提交。
    #[inline]
    pub fn writable_span(&mut self) -> &mut [u8] {
        &mut self.storage[self.write_start..]
    }

    /// 把刚写入空闲区的 `n` 字节提交为未读数据。
    ///
    /// # Panics
    /// `n > wsize()` 时 panic：调用方必须先 `reserve`。
    #[inline]
    pub fn fill(&mut self, n: usize) {
        assert!(
            n <= self.wsize(),
            "IoBuf::fill 超出空闲空间：请求 {n}，实际 {}",
            self.wsize()
        );
        self.write_start += n;
    }

    /// 从 `read_start` 开始的未读区。
    #[inline]
    pub fn readable_span(&self) -> &[u8] {
        &self.storage[self.read_start..self.write_start]
    }

    /// 标记未读区前 `n` 字节已消费。读空时两个游标同时归零，整个容量重新变为空闲区。
    ///
    /// # Panics
    /// `n > rsize()` 时 panic。
    #[inline]
    pub fn drain(&mut self, n: usize) {
        assert!(
            n <= self.rsize(),
            "IoBuf::drain 超出未读数据：请求 {n}，实际 {}",
            self.rsize()
        );
        self.read_start += n;
        if self.read_start == self.write_start && self.write_start != 0 {
            self.read_start = 0;
            self.write_start = 0;
            self.stats.cursor_resets += 1;
        }
    }

    /// 把未读区 `[read_start, write_start)` 搬到偏移 0。
    fn compact(&mut self) {
        let unread = self.rsize();
        self.storage.copy_within(self.read_start..self.write_start, 0);
        tracing::trace!(
            moved = unread,
            reclaimed = self.read_start,
            "iobuf compacted"
        );
        self.read_start = 0;
        self.write_start = unread;
        self.stats.compactions += 1;
    }

    /// 把底层内存块扩到 `capacity` 字节；失败时不修改任何字段。
    fn grow(&mut self, capacity: usize) -> Result<(), IoBufError> {
        let old = self.capacity();
        debug_assert!(capacity > old);
        self.storage
            .try_reserve_exact(capacity - old)
            .map_err(|source| IoBufError::AllocationFailed {
                requested: capacity,
                capacity: old,
                source,
            })?;
        self.storage.resize(capacity, 0);
        self.stats.reallocations += 1;
        tracing::trace!(from = old, to = capacity, "iobuf grown");
        Ok(())
    }
}

impl Default for IoBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IoBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoBuf")
            .field("capacity", &self.capacity())
            .field("read_start", &self.read_start)
            .field("write_start", &self.write_start)
            .field("growth", &self.growth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use tracing_test::traced_test;

    use super::*;

    fn cursors(buf: &IoBuf) -> (usize, usize, usize) {
        (buf.read_start, buf.write_start, buf.capacity())
    }

    #[test]
    fn drain_to_empty_resets_cursors_without_copy() {
        let mut buf = IoBuf::with_capacity(16);
        buf.writable_span()[..4].copy_from_slice(b"ping");
        buf.fill(4);
        buf.drain(2);
        assert_eq!(cursors(&buf), (2, 4, 16));
        buf.drain(2);
        assert_eq!(cursors(&buf), (0, 0, 16));
        assert_eq!(buf.stats().cursor_resets, 1);
        assert_eq!(buf.stats().compactions, 0);
    }

    #[test]
    fn zero_drain_on_empty_buffer_is_not_a_reset() {
        let mut buf = IoBuf::new();
        buf.drain(0);
        assert_eq!(buf.stats(), IoBufStats::default());
    }

    #[test]
    fn compaction_moves_unread_region_to_front() {
        let mut buf = IoBuf::with_capacity(8);
        buf.writable_span().copy_from_slice(b"abcdefgh");
        buf.fill(8);
        buf.drain(5);
        buf.reserve(5);
        assert_eq!(cursors(&buf), (0, 3, 8));
        assert_eq!(buf.readable_span(), b"fgh");
        assert_eq!(buf.stats().compactions, 1);
        assert_eq!(buf.stats().reallocations, 1);
    }

    #[test]
    fn compaction_then_growth_when_reclaim_is_not_enough() {
        let mut buf = IoBuf::with_capacity(8);
        buf.writable_span().copy_from_slice(b"abcdefgh");
        buf.fill(8);
        buf.drain(2);
        buf.reserve(4);
        // 压缩后空闲 2 字节，缺口 2 字节由扩容补足
        assert_eq!(cursors(&buf), (0, 6, 10));
        assert_eq!(buf.readable_span(), b"cdefgh");
        assert_eq!(buf.stats().compactions, 1);
        assert_eq!(buf.stats().reallocations, 2);
    }

    #[test]
    fn doubling_policy_overgrows() {
        let mut buf = IoBuf::with_config(
            IoBufConfig::new()
                .with_initial_capacity(8)
                .with_growth(GrowthPolicy::Doubling),
        );
        buf.fill(8);
        buf.reserve(1);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.wsize(), 8);
        assert_eq!(buf.config().growth, GrowthPolicy::Doubling);
    }

    #[test]
    fn overflowing_request_is_reported_and_state_kept() {
        let mut buf = IoBuf::with_capacity(4);
        buf.fill(1);
        let err = buf.try_reserve(usize::MAX).expect_err("容量溢出应当失败");
        assert!(matches!(err, IoBufError::CapacityOverflow { capacity: 4, .. }));
        assert_eq!(cursors(&buf), (0, 1, 4));
    }

    #[test]
    fn allocator_refusal_is_reported_and_state_kept() {
        let mut buf = IoBuf::new();
        let err = buf
            .try_reserve(usize::MAX)
            .expect_err("超出 isize::MAX 的申请必然失败");
        assert!(matches!(
            err,
            IoBufError::AllocationFailed {
                requested: usize::MAX,
                capacity: 0,
                ..
            }
        ));
        assert_eq!(cursors(&buf), (0, 0, 0));
        assert_eq!(buf.stats().reallocations, 0);
    }

    #[traced_test]
    #[test]
    fn failed_reserve_is_a_logged_no_op() {
        let mut buf = IoBuf::with_capacity(32);
        buf.reserve(usize::MAX);
        assert_eq!(buf.wsize(), 32);
        assert!(logs_contain("iobuf reserve failed"));
    }

    #[test]
    #[should_panic(expected = "IoBuf::fill")]
    fn fill_beyond_free_space_panics() {
        let mut buf = IoBuf::with_capacity(4);
        buf.fill(5);
    }

    #[test]
    #[should_panic(expected = "IoBuf::drain")]
    fn drain_beyond_unread_panics() {
        let mut buf = IoBuf::with_capacity(4);
        buf.fill(2);
        buf.drain(3);
    }

    #[test]
    fn debug_output_hides_payload() {
        let mut buf = IoBuf::with_capacity(4);
        buf.writable_span().copy_from_slice(b"\x01\x02\x03\x04");
        buf.fill(4);
        let text = format!("{buf:?}");
        assert!(text.contains("capacity: 4"));
        assert!(text.contains("write_start: 4"));
        assert!(!text.contains("[1, 2"));
    }
}
