//! Bellman-Ford 单源最短路
//!
//! 允许负权边。做 |V|-1 轮全边松弛后再检查一遍，仍能松弛说明源点可达负权环。
//! 无向边按两个方向分别松弛，因此任何可达的负权无向边都构成负权环。

use super::ShortestPathAlgorithm;
use crate::algorithm::indexed::IndexedGraph;
use crate::algorithm::path::{GraphPath, SingleSourcePaths};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{VertexId, WeightedGraph};
use crate::metrics::global_metrics;
use crate::tolerance::ToleranceComparator;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 松弛结果
#[derive(Debug, Clone)]
pub(crate) struct Relaxation {
    pub distance: Vec<f64>,
    pub predecessor: Vec<Option<usize>>,
    pub relaxations: u64,
}

/// 对边 `edge` 按 from -> to 方向尝试松弛
fn relax_arc(
    index: &IndexedGraph,
    state: &mut Relaxation,
    comparator: &ToleranceComparator,
    edge: usize,
    from: usize,
    to: usize,
) -> bool {
    let base = state.distance[from];
    if !base.is_finite() {
        return false;
    }
    state.relaxations += 1;
    let candidate = base + index.edge(edge).weight;
    if comparator.compare(candidate, state.distance[to]) == std::cmp::Ordering::Less {
        state.distance[to] = candidate;
        state.predecessor[to] = Some(edge);
        true
    } else {
        false
    }
}

/// 一轮全边松弛，返回是否有更新
fn relax_round(
    index: &IndexedGraph,
    state: &mut Relaxation,
    comparator: &ToleranceComparator,
) -> bool {
    let mut updated = false;
    for (edge, e) in index.edges().iter().enumerate() {
        updated |= relax_arc(index, state, comparator, edge, e.source, e.target);
        if !index.is_directed() && !e.is_loop() {
            updated |= relax_arc(index, state, comparator, edge, e.target, e.source);
        }
    }
    updated
}

/// 从给定初始距离出发做至多 `rounds` 轮松弛，并检查负权环
///
/// Johnson 的虚拟源点等价于所有顶点初始距离为 0、轮数为 |V|。
pub(crate) fn relax_all(
    index: &IndexedGraph,
    initial: Vec<f64>,
    rounds: usize,
    comparator: &ToleranceComparator,
) -> Result<Relaxation> {
    let n = initial.len();
    let mut state = Relaxation {
        distance: initial,
        predecessor: vec![None; n],
        relaxations: 0,
    };

    for round in 0..rounds {
        if !relax_round(index, &mut state, comparator) {
            trace!("Bellman-Ford 第 {} 轮无更新, 提前结束", round + 1);
            return Ok(state);
        }
    }

    if relax_round(index, &mut state, comparator) {
        warn!("Bellman-Ford 检测到负权环");
        global_metrics().record_negative_cycle();
        return Err(Error::NegativeCycle);
    }
    Ok(state)
}

/// Bellman-Ford 最短路
///
/// 每个源点的结果计算一次后缓存。
pub struct BellmanFordShortestPath<G: WeightedGraph + ?Sized> {
    graph: Arc<G>,
    config: AlgorithmConfig,
    index: OnceCell<IndexedGraph>,
    cache: RwLock<HashMap<VertexId, Arc<SingleSourcePaths>>>,
}

impl<G: WeightedGraph + ?Sized> BellmanFordShortestPath<G> {
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            graph,
            config: AlgorithmConfig::default(),
            index: OnceCell::new(),
            cache: RwLock::new(HashMap::new()),
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

    fn compute(&self, source: VertexId) -> Result<Arc<SingleSourcePaths>> {
        if let Some(paths) = self.cache.read().get(&source) {
            return Ok(paths.clone());
        }

        let index = self.index();
        let s = index.require(source, "源点")?;
        let n = index.vertex_count();
        let metrics = global_metrics();
        let timer = metrics.record_shortest_path_start();
        debug!(
            "Bellman-Ford 开始: source={}, vertices={}, edges={}",
            source,
            n,
            index.edge_count()
        );

        let mut initial = vec![f64::INFINITY; n];
        initial[s] = 0.0;
        let state = relax_all(
            index,
            initial,
            n.saturating_sub(1),
            &self.config.comparator(),
        )?;
        metrics.record_shortest_path_complete(timer, state.relaxations);

        let mut distances = HashMap::new();
        let mut predecessors = HashMap::new();
        for (v, &d) in state.distance.iter().enumerate() {
            if !d.is_finite() {
                continue;
            }
            distances.insert(index.vertex(v), d);
            if v == s {
                continue;
            }
            if let Some(edge) = state.predecessor[v] {
                let previous = index.opposite(edge, v);
                predecessors.insert(
                    index.vertex(v),
                    (index.edge(edge).id, index.vertex(previous)),
                );
            }
        }
        debug!(
            "Bellman-Ford 完成: reachable={}, relaxations={}",
            distances.len(),
            state.relaxations
        );

        let paths = Arc::new(SingleSourcePaths::from_predecessors(
            source,
            distances,
            predecessors,
        ));
        self.cache.write().insert(source, paths.clone());
        Ok(paths)
    }
}

impl<G: WeightedGraph + ?Sized> ShortestPathAlgorithm for BellmanFordShortestPath<G> {
    fn path(&self, source: VertexId, sink: VertexId) -> Result<Option<GraphPath>> {
        self.index().require(sink, "目标点")?;
        Ok(self.compute(source)?.path(sink))
    }

    fn path_weight(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        self.index().require(sink, "目标点")?;
        Ok(self.compute(source)?.weight(sink))
    }

    fn paths(&self, source: VertexId) -> Result<SingleSourcePaths> {
        Ok(self.compute(source)?.as_ref().clone())
    }
}
