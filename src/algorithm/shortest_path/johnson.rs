//! Johnson 全源最短路
//!
//! 有向图：Bellman-Ford 求势函数 h，边重赋权为 w + h(u) - h(v) 后从每个顶点跑 Dijkstra，
//! 最后还原 d(u, v) = d'(u, v) - h(u) + h(v)。
//! 无向图：任何负权边本身即负权环，直接报错；否则各顶点直接跑 Dijkstra。
//! 全部结果在第一次查询时计算并缓存。

use super::bellman_ford::relax_all;
use super::dijkstra::search;
use super::ShortestPathAlgorithm;
use crate::algorithm::indexed::IndexedGraph;
use crate::algorithm::path::{GraphPath, SingleSourcePaths};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{VertexId, WeightedGraph};
use crate::metrics::global_metrics;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Johnson 全源最短路
pub struct JohnsonShortestPaths<G: WeightedGraph + ?Sized> {
    graph: Arc<G>,
    config: AlgorithmConfig,
    index: OnceCell<IndexedGraph>,
    table: OnceCell<Vec<SingleSourcePaths>>,
}

impl<G: WeightedGraph + ?Sized> JohnsonShortestPaths<G> {
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            graph,
            config: AlgorithmConfig::default(),
            index: OnceCell::new(),
            table: OnceCell::new(),
        }
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        self.config = self.config.with_epsilon(epsilon)?;
        Ok(self)
    }

    fn index(&self) -> &IndexedGraph {
        self.index
            .get_or_init(|| IndexedGraph::from_graph(self.graph.as_ref()))
    }

    fn table(&self) -> Result<&Vec<SingleSourcePaths>> {
        self.table.get_or_try_init(|| self.compute())
    }

    /// 势函数；无向图全为 0
    fn potentials(&self, index: &IndexedGraph) -> Result<(Vec<f64>, u64)> {
        let n = index.vertex_count();
        let comparator = self.config.comparator();
        if index.is_directed() {
            let state = relax_all(index, vec![0.0; n], n, &comparator)?;
            return Ok((state.distance, state.relaxations));
        }
        if let Some(e) = index
            .edges()
            .iter()
            .find(|e| comparator.is_negative(e.weight))
        {
            warn!("无向图中边 {} 权重为负 ({}), 构成负权环", e.id, e.weight);
            global_metrics().record_negative_cycle();
            return Err(Error::NegativeCycle);
        }
        Ok((vec![0.0; n], 0))
    }

    fn compute(&self) -> Result<Vec<SingleSourcePaths>> {
        let index = self.index();
        let n = index.vertex_count();
        let metrics = global_metrics();
        let timer = metrics.record_shortest_path_start();
        debug!(
            "Johnson 开始: vertices={}, edges={}, directed={}",
            n,
            index.edge_count(),
            index.is_directed()
        );

        let (h, mut relaxations) = self.potentials(index)?;
        // 舍入误差可能产生极小的负数
        let reweighted: Vec<f64> = index
            .edges()
            .iter()
            .map(|e| (e.weight + h[e.source] - h[e.target]).max(0.0))
            .collect();
        trace!("Johnson 重赋权完成: potentials={:?}", h);

        let mut table = Vec::with_capacity(n);
        for s in 0..n {
            let tree = search(index, s, None, f64::INFINITY, |e| reweighted[e])?;
            relaxations += tree.relaxations;
            table.push(tree.into_paths(index, |v, d| d - h[s] + h[v]));
        }

        metrics.record_shortest_path_complete(timer, relaxations);
        debug!("Johnson 完成: relaxations={}", relaxations);
        Ok(table)
    }

    fn source_paths(&self, source: VertexId) -> Result<&SingleSourcePaths> {
        let s = self.index().require(source, "源点")?;
        Ok(&self.table()?[s])
    }
}

impl<G: WeightedGraph + ?Sized> ShortestPathAlgorithm for JohnsonShortestPaths<G> {
    fn path(&self, source: VertexId, sink: VertexId) -> Result<Option<GraphPath>> {
        self.index().require(sink, "目标点")?;
        Ok(self.source_paths(source)?.path(sink))
    }

    fn path_weight(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        self.index().require(sink, "目标点")?;
        Ok(self.source_paths(source)?.weight(sink))
    }

    fn paths(&self, source: VertexId) -> Result<SingleSourcePaths> {
        Ok(self.source_paths(source)?.clone())
    }
}
