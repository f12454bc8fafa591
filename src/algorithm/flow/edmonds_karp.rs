//! Edmonds-Karp 最大流
//!
//! 反复在残量网络上 BFS 寻找最短增广路径，沿路径推送瓶颈流量。

use super::residual::{FlowBase, ResidualNetwork};
use super::{MaximumFlow, MaximumFlowAlgorithm, MinimumCut, MinimumCutAlgorithm};
use crate::config::AlgorithmConfig;
use crate::error::Result;
use crate::graph::{EdgeId, VertexId, WeightedGraph};
use crate::metrics::global_metrics;
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// BFS 找一条增广路径，返回到达各顶点的弧
fn find_augmenting_path(
    network: &ResidualNetwork,
    source: usize,
    sink: usize,
) -> Option<Vec<Option<usize>>> {
    let mut parent = vec![None; network.vertex_count()];
    let mut visited = vec![false; network.vertex_count()];
    let mut queue = VecDeque::new();
    visited[source] = true;
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        if u == sink {
            break;
        }
        for &arc in network.arcs_from(u) {
            let v = network.head(arc);
            if !visited[v] && network.has_residual(arc) {
                visited[v] = true;
                parent[v] = Some(arc);
                queue.push_back(v);
            }
        }
    }

    visited[sink].then_some(parent)
}

/// 增广直到不存在增广路径，返回增广次数
pub(crate) fn augment(network: &mut ResidualNetwork, source: usize, sink: usize) -> u64 {
    let metrics = global_metrics();
    let mut augmentations = 0u64;

    while let Some(parent) = find_augmenting_path(network, source, sink) {
        // 计算瓶颈
        let mut bottleneck = f64::INFINITY;
        let mut current = sink;
        while let Some(arc) = parent[current] {
            bottleneck = bottleneck.min(network.residual(arc));
            current = network.tail(arc);
        }

        // 沿路径增广
        let mut current = sink;
        let mut hops = 0;
        while let Some(arc) = parent[current] {
            network.push(arc, bottleneck);
            current = network.tail(arc);
            hops += 1;
        }

        augmentations += 1;
        metrics.record_augmentation();
        trace!("增广路径 #{}: hops={}, bottleneck={}", augmentations, hops, bottleneck);
    }

    augmentations
}

/// Edmonds-Karp 最大流 / 最小割
pub struct EdmondsKarpMaximumFlow<G: WeightedGraph + ?Sized> {
    base: FlowBase<G>,
}

impl<G: WeightedGraph + ?Sized> EdmondsKarpMaximumFlow<G> {
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            base: FlowBase::new(graph),
        }
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Result<Self> {
        self.base.set_config(config)?;
        Ok(self)
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        let config = self.base.config().with_epsilon(epsilon)?;
        self.base.set_config(config)?;
        Ok(self)
    }

    /// 最近一次计算使用的源点
    pub fn current_source(&self) -> Option<VertexId> {
        self.base.current_source()
    }

    /// 最近一次计算使用的汇点
    pub fn current_sink(&self) -> Option<VertexId> {
        self.base.current_sink()
    }
}

impl<G: WeightedGraph + ?Sized> MaximumFlowAlgorithm for EdmondsKarpMaximumFlow<G> {
    fn maximum_flow(&self, source: VertexId, sink: VertexId) -> Result<MaximumFlow> {
        let run = self.base.run("Edmonds-Karp", source, sink, |network, s, t| {
            augment(network, s, t);
        })?;
        Ok(run.flow.clone())
    }

    fn flow_map(&self) -> Option<IndexMap<EdgeId, f64>> {
        self.base.flow_map()
    }

    fn flow_direction(&self, edge: EdgeId) -> Result<VertexId> {
        self.base.flow_direction(edge)
    }
}

impl<G: WeightedGraph + ?Sized> MinimumCutAlgorithm for EdmondsKarpMaximumFlow<G> {
    fn minimum_cut(&self, source: VertexId, sink: VertexId) -> Result<MinimumCut> {
        let run = self.base.run("Edmonds-Karp", source, sink, |network, s, t| {
            augment(network, s, t);
        })?;
        Ok(run.cut.clone())
    }
}
