//! `IoBuf` 的构造配置。
//!
//! 配置项可以直接嵌入上层服务的 TOML/JSON 配置中反序列化，缺省字段回落到默认值。

use serde::{Deserialize, Serialize};

/// 空闲空间不足且压缩后仍不够时的扩容策略。
///
/// # 设计取舍（Trade-offs）
/// - `Exact`：只补足缺口，容量严格等于历史最大需求，代价是单调增长场景下每次都要重新分配；
/// - `Doubling`：至少翻倍，摊还 O(1)，代价是容量可能超出需求接近一倍。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// 新容量 = 旧容量 + 缺口。
    #[default]
    Exact,
    /// 新容量 = max(旧容量 + 缺口, 2 × 旧容量)。
    Doubling,
}

impl GrowthPolicy {
    /// 计算补足 `shortfall` 字节缺口所需的新容量，溢出时返回 `None`。
    pub(crate) fn next_capacity(self, capacity: usize, shortfall: usize) -> Option<usize> {
        let exact = capacity.checked_add(shortfall)?;
        match self {
            GrowthPolicy::Exact => Some(exact),
            GrowthPolicy::Doubling => Some(exact.max(capacity.saturating_mul(2))),
        }
    }
}

/// `IoBufConfig` 描述一个缓冲实例的初始容量与扩容策略。
///
/// # 契约说明（What）
/// - `initial_capacity`：构造后立即保证的空闲字节数，等价于对空缓冲调用一次 `reserve`；
///   为 0 时不分配内存；
/// - `growth`：见 [`GrowthPolicy`]。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IoBufConfig {
    pub initial_capacity: usize,
    pub growth: GrowthPolicy,
}

impl IoBufConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }
}
