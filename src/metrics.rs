//! 算法运行指标
//!
//! 统计各算法的运行次数、松弛/增广/推送/重标记次数和耗时

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 全局算法指标
#[derive(Debug)]
pub struct Metrics {
    /// 最短路统计
    shortest_path_stats: ShortestPathStats,
    /// 最大流统计
    flow_stats: FlowStats,
    /// 创建时间
    start_time: Instant,
}

/// 最短路统计
#[derive(Debug, Default)]
struct ShortestPathStats {
    /// 运行次数
    runs: AtomicU64,
    /// 边松弛次数
    relaxations: AtomicU64,
    /// 检测到的负权环次数
    negative_cycles: AtomicU64,
    /// 总耗时（微秒）
    total_duration_us: AtomicU64,
}

/// 最大流统计
#[derive(Debug, Default)]
struct FlowStats {
    /// 运行次数
    runs: AtomicU64,
    /// 增广路径数
    augmentations: AtomicU64,
    /// 推送次数
    pushes: AtomicU64,
    /// 重标记次数
    relabels: AtomicU64,
    /// 总耗时（微秒）
    total_duration_us: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub shortest_path_runs: u64,
    pub relaxations: u64,
    pub negative_cycles: u64,
    pub avg_shortest_path_duration_ms: f64,

    pub flow_runs: u64,
    pub augmentations: u64,
    pub pushes: u64,
    pub relabels: u64,
    pub avg_flow_duration_ms: f64,

    pub uptime_seconds: u64,
}

/// 运行计时器
pub struct RunTimer {
    start: Instant,
}

impl RunTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            shortest_path_stats: ShortestPathStats::default(),
            flow_stats: FlowStats::default(),
            start_time: Instant::now(),
        }
    }

    /// 记录一次最短路运行开始
    pub fn record_shortest_path_start(&self) -> RunTimer {
        self.shortest_path_stats.runs.fetch_add(1, Ordering::Relaxed);
        RunTimer::new()
    }

    /// 记录一次最短路运行结束
    pub fn record_shortest_path_complete(&self, timer: RunTimer, relaxations: u64) {
        self.shortest_path_stats
            .relaxations
            .fetch_add(relaxations, Ordering::Relaxed);
        self.shortest_path_stats
            .total_duration_us
            .fetch_add(timer.elapsed().as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_negative_cycle(&self) {
        self.shortest_path_stats
            .negative_cycles
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 记录一次最大流运行开始
    pub fn record_flow_start(&self) -> RunTimer {
        self.flow_stats.runs.fetch_add(1, Ordering::Relaxed);
        RunTimer::new()
    }

    /// 记录一次最大流运行结束
    pub fn record_flow_complete(&self, timer: RunTimer) {
        self.flow_stats
            .total_duration_us
            .fetch_add(timer.elapsed().as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_augmentation(&self) {
        self.flow_stats.augmentations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pushes(&self, count: u64) {
        self.flow_stats.pushes.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_relabels(&self, count: u64) {
        self.flow_stats.relabels.fetch_add(count, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let sp_runs = self.shortest_path_stats.runs.load(Ordering::Relaxed);
        let sp_us = self
            .shortest_path_stats
            .total_duration_us
            .load(Ordering::Relaxed);
        let flow_runs = self.flow_stats.runs.load(Ordering::Relaxed);
        let flow_us = self.flow_stats.total_duration_us.load(Ordering::Relaxed);

        let avg_ms = |total_us: u64, runs: u64| {
            if runs > 0 {
                (total_us as f64) / (runs as f64) / 1000.0
            } else {
                0.0
            }
        };

        MetricsSnapshot {
            shortest_path_runs: sp_runs,
            relaxations: self.shortest_path_stats.relaxations.load(Ordering::Relaxed),
            negative_cycles: self
                .shortest_path_stats
                .negative_cycles
                .load(Ordering::Relaxed),
            avg_shortest_path_duration_ms: avg_ms(sp_us, sp_runs),
            flow_runs,
            augmentations: self.flow_stats.augmentations.load(Ordering::Relaxed),
            pushes: self.flow_stats.pushes.load(Ordering::Relaxed),
            relabels: self.flow_stats.relabels.load(Ordering::Relaxed),
            avg_flow_duration_ms: avg_ms(flow_us, flow_runs),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// 重置所有指标
    pub fn reset(&self) {
        self.shortest_path_stats.runs.store(0, Ordering::Relaxed);
        self.shortest_path_stats.relaxations.store(0, Ordering::Relaxed);
        self.shortest_path_stats
            .negative_cycles
            .store(0, Ordering::Relaxed);
        self.shortest_path_stats
            .total_duration_us
            .store(0, Ordering::Relaxed);

        self.flow_stats.runs.store(0, Ordering::Relaxed);
        self.flow_stats.augmentations.store(0, Ordering::Relaxed);
        self.flow_stats.pushes.store(0, Ordering::Relaxed);
        self.flow_stats.relabels.store(0, Ordering::Relaxed);
        self.flow_stats.total_duration_us.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 全局指标实例
static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}
