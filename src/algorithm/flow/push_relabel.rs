//! 推送-重标记最大流
//!
//! 源点高度为 |V|，初始饱和源点所有出弧形成预流；
//! 活跃顶点按 FIFO 顺序 discharge，直到除源汇外没有顶点带超额流量。
//! 初始高度由汇点出发的反向 BFS 给出。

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

struct Preflow<'a> {
    network: &'a mut ResidualNetwork,
    source: usize,
    sink: usize,
    height: Vec<usize>,
    excess: Vec<f64>,
    /// 当前弧指针
    current: Vec<usize>,
    active: VecDeque<usize>,
    queued: Vec<bool>,
    pushes: u64,
    relabels: u64,
}

impl<'a> Preflow<'a> {
    fn new(network: &'a mut ResidualNetwork, source: usize, sink: usize) -> Self {
        let n = network.vertex_count();
        Self {
            network,
            source,
            sink,
            height: vec![0; n],
            excess: vec![0.0; n],
            current: vec![0; n],
            active: VecDeque::new(),
            queued: vec![false; n],
            pushes: 0,
            relabels: 0,
        }
    }

    /// 按到汇点的残量距离设置初始高度
    fn global_relabel(&mut self) {
        let n = self.network.vertex_count();
        self.height.fill(n);
        self.height[self.sink] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(self.sink);
        while let Some(v) = queue.pop_front() {
            for &arc in self.network.arcs_from(v) {
                // arc ^ 1 是进入 v 的弧
                let u = self.network.head(arc);
                if u != self.source && self.height[u] == n && self.network.has_residual(arc ^ 1) {
                    self.height[u] = self.height[v] + 1;
                    queue.push_back(u);
                }
            }
        }
        self.height[self.source] = n;
    }

    fn initialize(&mut self) {
        self.global_relabel();
        let arcs: Vec<usize> = self.network.arcs_from(self.source).to_vec();
        for arc in arcs {
            let amount = self.network.residual(arc);
            if self.network.comparator().is_positive(amount) {
                let v = self.network.head(arc);
                self.network.push(arc, amount);
                self.excess[self.source] -= amount;
                self.excess[v] += amount;
                self.activate(v);
            }
        }
    }

    fn activate(&mut self, vertex: usize) {
        if vertex != self.source && vertex != self.sink && !self.queued[vertex] {
            self.queued[vertex] = true;
            self.active.push_back(vertex);
        }
    }

    fn relabel(&mut self, vertex: usize) -> bool {
        let lowest = self
            .network
            .arcs_from(vertex)
            .iter()
            .filter(|&&arc| self.network.has_residual(arc))
            .map(|&arc| self.height[self.network.head(arc)])
            .min();
        self.relabels += 1;
        match lowest {
            Some(h) => {
                self.height[vertex] = h + 1;
                true
            }
            None => false,
        }
    }

    fn discharge(&mut self, vertex: usize) {
        while self.network.comparator().is_positive(self.excess[vertex]) {
            let arcs = self.network.arcs_from(vertex);
            if self.current[vertex] == arcs.len() {
                if !self.relabel(vertex) {
                    // 剩余超额在容差以内，无处可推
                    break;
                }
                self.current[vertex] = 0;
                continue;
            }

            let arc = arcs[self.current[vertex]];
            let v = self.network.head(arc);
            if self.network.has_residual(arc) && self.height[vertex] == self.height[v] + 1 {
                let amount = self.excess[vertex].min(self.network.residual(arc));
                self.network.push(arc, amount);
                self.excess[vertex] -= amount;
                self.excess[v] += amount;
                self.pushes += 1;
                self.activate(v);
            } else {
                self.current[vertex] += 1;
            }
        }
    }

    fn run(mut self) -> (u64, u64) {
        self.initialize();
        while let Some(vertex) = self.active.pop_front() {
            self.queued[vertex] = false;
            self.discharge(vertex);
        }
        trace!(
            "推送-重标记结束: pushes={}, relabels={}, sink_excess={}",
            self.pushes,
            self.relabels,
            self.excess[self.sink]
        );
        (self.pushes, self.relabels)
    }
}

/// 在残量网络上运行推送-重标记
pub(crate) fn push_relabel(network: &mut ResidualNetwork, source: usize, sink: usize) {
    let (pushes, relabels) = Preflow::new(network, source, sink).run();
    let metrics = global_metrics();
    metrics.record_pushes(pushes);
    metrics.record_relabels(relabels);
}

/// 推送-重标记最大流 / 最小割
pub struct PushRelabelMaximumFlow<G: WeightedGraph + ?Sized> {
    base: FlowBase<G>,
}

impl<G: WeightedGraph + ?Sized> PushRelabelMaximumFlow<G> {
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

    pub fn current_source(&self) -> Option<VertexId> {
        self.base.current_source()
    }

    pub fn current_sink(&self) -> Option<VertexId> {
        self.base.current_sink()
    }
}

impl<G: WeightedGraph + ?Sized> MaximumFlowAlgorithm for PushRelabelMaximumFlow<G> {
    fn maximum_flow(&self, source: VertexId, sink: VertexId) -> Result<MaximumFlow> {
        let run = self
            .base
            .run("推送-重标记", source, sink, push_relabel)?;
        Ok(run.flow.clone())
    }

    fn flow_map(&self) -> Option<IndexMap<EdgeId, f64>> {
        self.base.flow_map()
    }

    fn flow_direction(&self, edge: EdgeId) -> Result<VertexId> {
        self.base.flow_direction(edge)
    }
}

impl<G: WeightedGraph + ?Sized> MinimumCutAlgorithm for PushRelabelMaximumFlow<G> {
    fn minimum_cut(&self, source: VertexId, sink: VertexId) -> Result<MinimumCut> {
        let run = self
            .base
            .run("推送-重标记", source, sink, push_relabel)?;
        Ok(run.cut.clone())
    }
}
