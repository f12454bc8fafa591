//! 残量网络与最大流公共部分
//!
//! 每条非自环边对应一对弧 `a` 与 `a ^ 1`：
//! - 有向边：正向容量 w，反向容量 0
//! - 无向边：两个方向容量都是 w，共享同一份流量，流量取值在 [-w, w]
//!
//! 弧上的流量满足 `flow[a] == -flow[a ^ 1]`，残量为 `capacity - flow`。

use super::{MaximumFlow, MinimumCut};
use crate::algorithm::indexed::IndexedGraph;
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, VertexId, WeightedGraph};
use crate::metrics::global_metrics;
use crate::tolerance::ToleranceComparator;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct ResidualArc {
    pub to: usize,
    pub capacity: f64,
    pub flow: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct ResidualNetwork {
    arcs: Vec<ResidualArc>,
    adjacency: Vec<Vec<usize>>,
    /// 快照边下标 -> 正向弧，自环为 None
    edge_arc: Vec<Option<usize>>,
    comparator: ToleranceComparator,
}

impl ResidualNetwork {
    pub fn build(index: &IndexedGraph, comparator: ToleranceComparator) -> Result<Self> {
        let n = index.vertex_count();
        let mut arcs = Vec::with_capacity(index.edge_count() * 2);
        let mut adjacency = vec![Vec::new(); n];
        let mut edge_arc = Vec::with_capacity(index.edge_count());

        for e in index.edges() {
            if !e.weight.is_finite() {
                return Err(Error::InvalidArgument(format!(
                    "边 {} 的容量必须为有限数 ({})",
                    e.id, e.weight
                )));
            }
            if comparator.is_negative(e.weight) {
                return Err(Error::InvalidArgument(format!(
                    "边 {} 的容量为负数 ({})",
                    e.id, e.weight
                )));
            }
            if e.is_loop() {
                edge_arc.push(None);
                continue;
            }
            let capacity = e.weight.max(0.0);
            let forward = arcs.len();
            arcs.push(ResidualArc {
                to: e.target,
                capacity,
                flow: 0.0,
            });
            arcs.push(ResidualArc {
                to: e.source,
                capacity: if index.is_directed() { 0.0 } else { capacity },
                flow: 0.0,
            });
            adjacency[e.source].push(forward);
            adjacency[e.target].push(forward + 1);
            edge_arc.push(Some(forward));
        }

        Ok(Self {
            arcs,
            adjacency,
            edge_arc,
            comparator,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn arcs_from(&self, vertex: usize) -> &[usize] {
        &self.adjacency[vertex]
    }

    pub fn head(&self, arc: usize) -> usize {
        self.arcs[arc].to
    }

    pub fn tail(&self, arc: usize) -> usize {
        self.arcs[arc ^ 1].to
    }

    pub fn residual(&self, arc: usize) -> f64 {
        self.arcs[arc].capacity - self.arcs[arc].flow
    }

    /// 残量严格为正（超过容差）
    pub fn has_residual(&self, arc: usize) -> bool {
        self.comparator.is_positive(self.residual(arc))
    }

    pub fn comparator(&self) -> &ToleranceComparator {
        &self.comparator
    }

    /// 沿弧推送流量，反向弧同步扣减
    pub fn push(&mut self, arc: usize, amount: f64) {
        self.arcs[arc].flow += amount;
        self.arcs[arc ^ 1].flow -= amount;
    }

    /// 顶点的净流出量
    pub fn net_outflow(&self, vertex: usize) -> f64 {
        self.adjacency[vertex]
            .iter()
            .map(|&a| self.arcs[a].flow)
            .sum()
    }

    /// 快照边上的有符号流量，正数表示从 source 流向 target
    pub fn edge_flow(&self, edge: usize) -> f64 {
        self.edge_arc[edge]
            .map(|a| self.arcs[a].flow)
            .unwrap_or(0.0)
    }

    /// 沿正残量可达的顶点
    pub fn reachable_from(&self, source: usize) -> Vec<bool> {
        let mut visited = vec![false; self.vertex_count()];
        let mut queue = VecDeque::new();
        visited[source] = true;
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            for &a in &self.adjacency[u] {
                let v = self.arcs[a].to;
                if !visited[v] && self.has_residual(a) {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
        visited
    }
}

/// 一次完整运行的结果
#[derive(Debug, Clone)]
pub(crate) struct FlowRun {
    pub flow: MaximumFlow,
    pub cut: MinimumCut,
}

impl FlowRun {
    fn extract(index: &IndexedGraph, network: &ResidualNetwork, source: usize, sink: usize) -> Self {
        let mut flow = IndexMap::with_capacity(index.edge_count());
        let mut directions = IndexMap::with_capacity(index.edge_count());
        for (k, e) in index.edges().iter().enumerate() {
            let f = network.edge_flow(k);
            flow.insert(e.id, f.abs());
            let receiver = if f >= 0.0 { e.target } else { e.source };
            directions.insert(e.id, index.vertex(receiver));
        }

        let reachable = network.reachable_from(source);
        let mut source_partition = IndexSet::new();
        let mut sink_partition = IndexSet::new();
        for (v, &inside) in reachable.iter().enumerate() {
            if inside {
                source_partition.insert(index.vertex(v));
            } else {
                sink_partition.insert(index.vertex(v));
            }
        }

        let mut cut_edges = IndexSet::new();
        let mut weight = 0.0;
        for e in index.edges() {
            let (from, to) = (reachable[e.source], reachable[e.target]);
            let crossing = if index.is_directed() {
                from && !to
            } else {
                from != to
            };
            if crossing {
                cut_edges.insert(e.id);
                weight += e.weight;
            }
        }

        let (s, t) = (index.vertex(source), index.vertex(sink));
        Self {
            flow: MaximumFlow {
                source: s,
                sink: t,
                value: network.net_outflow(source),
                flow,
                directions,
            },
            cut: MinimumCut {
                source: s,
                sink: t,
                weight,
                source_partition,
                sink_partition,
                cut_edges,
            },
        }
    }
}

/// 两种最大流算法共用的状态：图快照、配置和上一次 (source, sink) 的结果
pub(crate) struct FlowBase<G: WeightedGraph + ?Sized> {
    graph: Arc<G>,
    config: AlgorithmConfig,
    index: OnceCell<IndexedGraph>,
    last: RwLock<Option<Arc<FlowRun>>>,
}

impl<G: WeightedGraph + ?Sized> FlowBase<G> {
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            graph,
            config: AlgorithmConfig::default(),
            index: OnceCell::new(),
            last: RwLock::new(None),
        }
    }

    pub fn set_config(&mut self, config: AlgorithmConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        *self.last.get_mut() = None;
        Ok(())
    }

    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    fn index(&self) -> &IndexedGraph {
        self.index
            .get_or_init(|| IndexedGraph::from_graph(self.graph.as_ref()))
    }

    /// 取缓存结果，(source, sink) 不同时重新计算
    pub fn run<F>(&self, name: &str, source: VertexId, sink: VertexId, solve: F) -> Result<Arc<FlowRun>>
    where
        F: FnOnce(&mut ResidualNetwork, usize, usize),
    {
        if let Some(run) = self.last.read().as_ref() {
            if run.flow.source == source && run.flow.sink == sink {
                return Ok(run.clone());
            }
        }

        let index = self.index();
        let s = index.require(source, "源点")?;
        let t = index.require(sink, "汇点")?;
        if s == t {
            return Err(Error::InvalidArgument(format!(
                "源点和汇点不能相同: {}",
                source
            )));
        }

        let mut network = ResidualNetwork::build(index, self.config.comparator())?;
        let metrics = global_metrics();
        let timer = metrics.record_flow_start();
        debug!(
            "{} 开始: {} -> {}, vertices={}, edges={}",
            name,
            source,
            sink,
            index.vertex_count(),
            index.edge_count()
        );

        solve(&mut network, s, t);

        let run = Arc::new(FlowRun::extract(index, &network, s, t));
        metrics.record_flow_complete(timer);
        debug!(
            "{} 完成: flow={}, cut={}, cut_edges={}",
            name,
            run.flow.value,
            run.cut.weight,
            run.cut.cut_edges.len()
        );

        *self.last.write() = Some(run.clone());
        Ok(run)
    }

    pub fn last(&self) -> Option<Arc<FlowRun>> {
        self.last.read().clone()
    }

    pub fn current_source(&self) -> Option<VertexId> {
        self.last().map(|run| run.flow.source)
    }

    pub fn current_sink(&self) -> Option<VertexId> {
        self.last().map(|run| run.flow.sink)
    }

    pub fn flow_map(&self) -> Option<IndexMap<EdgeId, f64>> {
        self.last().map(|run| run.flow.flow.clone())
    }

    pub fn flow_direction(&self, edge: EdgeId) -> Result<VertexId> {
        let run = self
            .last()
            .ok_or_else(|| Error::InvalidArgument("尚未计算最大流".to_string()))?;
        run.flow
            .direction(edge)
            .ok_or_else(|| Error::EdgeNotFound(format!("边 {} 不在图中", edge)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_arc_pairs() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 4.0).unwrap();
        let index = IndexedGraph::from_graph(graph.as_ref());
        let mut network = ResidualNetwork::build(&index, ToleranceComparator::default()).unwrap();

        let a = network.arcs_from(0)[0];
        assert_eq!(network.head(a), 1);
        assert_eq!(network.tail(a), 0);
        assert_eq!(network.residual(a), 4.0);
        assert!(!network.has_residual(a ^ 1));

        network.push(a, 3.0);
        assert_eq!(network.residual(a), 1.0);
        assert_eq!(network.residual(a ^ 1), 3.0);
        assert_eq!(network.net_outflow(0), 3.0);
        assert_eq!(network.net_outflow(1), -3.0);
        assert_eq!(network.edge_flow(0), 3.0);
    }

    #[test]
    fn test_undirected_shared_capacity() {
        let graph = Graph::undirected();
        graph.add_edge_with_vertices(1, 2, 5.0).unwrap();
        graph.add_edge_with_vertices(2, 2, 9.0).unwrap();
        let index = IndexedGraph::from_graph(graph.as_ref());
        let mut network = ResidualNetwork::build(&index, ToleranceComparator::default()).unwrap();

        let back = network.arcs_from(1)[0];
        network.push(back, 2.0);
        assert_eq!(network.residual(back), 3.0);
        assert_eq!(network.residual(back ^ 1), 7.0);
        assert_eq!(network.edge_flow(0), -2.0);
        assert_eq!(network.edge_flow(1), 0.0);
        assert_eq!(network.arcs_from(1).len(), 1);
    }

    #[test]
    fn test_negative_capacity() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, -1.0).unwrap();
        let index = IndexedGraph::from_graph(graph.as_ref());
        assert!(matches!(
            ResidualNetwork::build(&index, ToleranceComparator::default()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_infinite_capacity() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, f64::INFINITY).unwrap();
        let index = IndexedGraph::from_graph(graph.as_ref());
        assert!(matches!(
            ResidualNetwork::build(&index, ToleranceComparator::default()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_reachable() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_edge_with_vertices(2, 3, 1.0).unwrap();
        let index = IndexedGraph::from_graph(graph.as_ref());
        let mut network = ResidualNetwork::build(&index, ToleranceComparator::default()).unwrap();
        assert_eq!(network.reachable_from(0), vec![true, true, true]);

        let a = network.arcs_from(1)[1];
        assert_eq!(network.head(a), 2);
        network.push(a, 1.0);
        assert_eq!(network.reachable_from(0), vec![true, true, false]);
    }
}
