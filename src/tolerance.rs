//! 浮点容差比较
//!
//! 路径权重、流量守恒、割权重的相等性判断都经过这里，不直接用 `==`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 默认容差
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// 带容差的浮点比较器
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceComparator {
    epsilon: f64,
}

impl ToleranceComparator {
    /// 创建比较器，epsilon 必须为非负有限数
    pub fn new(epsilon: f64) -> Result<Self> {
        if epsilon.is_nan() || epsilon < 0.0 || epsilon.is_infinite() {
            return Err(Error::InvalidArgument(format!(
                "容差必须为非负有限数, 实际为 {}",
                epsilon
            )));
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// `|a - b| <= eps` 视为相等；否则按大小排序
    ///
    /// 两个同号无穷大视为相等。任一侧为 NaN 时返回 `Less`，NaN 既不为正也不相等。
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if a.is_nan() || b.is_nan() {
            return Ordering::Less;
        }
        if a == b {
            return Ordering::Equal;
        }
        if (a - b).abs() <= self.epsilon {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    pub fn equals(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    pub fn is_negative(&self, value: f64) -> bool {
        self.compare(value, 0.0) == Ordering::Less
    }

    pub fn is_positive(&self, value: f64) -> bool {
        self.compare(value, 0.0) == Ordering::Greater
    }
}

impl Default for ToleranceComparator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// 优先队列中使用的距离键
///
/// 距离越小优先级越高，`priority_queue` 弹出最大优先级，因此这里反转顺序。
#[derive(Debug, Clone, Copy)]
pub(crate) struct MinDistance(pub f64);

impl PartialEq for MinDistance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MinDistance {}

impl PartialOrd for MinDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}
