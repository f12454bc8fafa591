//! 最大流与最小 s-t 割
//!
//! 边权即容量。无向边视为容量共享的一对反向弧。
//! 两种算法共用 `residual` 中的残量网络与结果缓存，
//! 同一实例对同一 (source, sink) 只计算一次。

mod edmonds_karp;
mod push_relabel;
mod residual;

pub use edmonds_karp::EdmondsKarpMaximumFlow;
pub use push_relabel::PushRelabelMaximumFlow;

use crate::config::AlgorithmConfig;
use crate::error::Result;
use crate::graph::{EdgeId, VertexId, WeightedGraph};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 最大流结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaximumFlow {
    pub source: VertexId,
    pub sink: VertexId,
    /// 最大流量值
    pub value: f64,
    /// 每条边上的流量（绝对值）
    pub flow: IndexMap<EdgeId, f64>,
    /// 每条边上流量进入的端点
    pub directions: IndexMap<EdgeId, VertexId>,
}

impl MaximumFlow {
    pub fn flow_on(&self, edge: EdgeId) -> Option<f64> {
        self.flow.get(&edge).copied()
    }

    pub fn direction(&self, edge: EdgeId) -> Option<VertexId> {
        self.directions.get(&edge).copied()
    }
}

/// 最小 s-t 割
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumCut {
    pub source: VertexId,
    pub sink: VertexId,
    /// 割边权重之和
    pub weight: f64,
    /// 残量网络中从源点可达的顶点
    pub source_partition: IndexSet<VertexId>,
    pub sink_partition: IndexSet<VertexId>,
    pub cut_edges: IndexSet<EdgeId>,
}

pub trait MaximumFlowAlgorithm {
    fn maximum_flow(&self, source: VertexId, sink: VertexId) -> Result<MaximumFlow>;

    fn maximum_flow_value(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        Ok(self.maximum_flow(source, sink)?.value)
    }

    /// 最近一次计算的流量分配
    fn flow_map(&self) -> Option<IndexMap<EdgeId, f64>>;

    /// 最近一次计算中边上流量进入的端点
    fn flow_direction(&self, edge: EdgeId) -> Result<VertexId>;
}

pub trait MinimumCutAlgorithm {
    fn minimum_cut(&self, source: VertexId, sink: VertexId) -> Result<MinimumCut>;

    fn minimum_cut_weight(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        Ok(self.minimum_cut(source, sink)?.weight)
    }
}

/// 可选的最大流算法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaximumFlowStrategy {
    #[default]
    EdmondsKarp,
    PushRelabel,
}

impl MaximumFlowStrategy {
    pub fn build<G: WeightedGraph + ?Sized>(
        self,
        graph: Arc<G>,
        config: AlgorithmConfig,
    ) -> Result<MaximumFlowEngine<G>> {
        Ok(match self {
            MaximumFlowStrategy::EdmondsKarp => {
                MaximumFlowEngine::EdmondsKarp(EdmondsKarpMaximumFlow::new(graph).with_config(config)?)
            }
            MaximumFlowStrategy::PushRelabel => {
                MaximumFlowEngine::PushRelabel(PushRelabelMaximumFlow::new(graph).with_config(config)?)
            }
        })
    }
}

/// 已选定的最大流算法实例
pub enum MaximumFlowEngine<G: WeightedGraph + ?Sized> {
    EdmondsKarp(EdmondsKarpMaximumFlow<G>),
    PushRelabel(PushRelabelMaximumFlow<G>),
}

impl<G: WeightedGraph + ?Sized> MaximumFlowEngine<G> {
    pub fn current_source(&self) -> Option<VertexId> {
        match self {
            MaximumFlowEngine::EdmondsKarp(a) => a.current_source(),
            MaximumFlowEngine::PushRelabel(a) => a.current_source(),
        }
    }

    pub fn current_sink(&self) -> Option<VertexId> {
        match self {
            MaximumFlowEngine::EdmondsKarp(a) => a.current_sink(),
            MaximumFlowEngine::PushRelabel(a) => a.current_sink(),
        }
    }
}

impl<G: WeightedGraph + ?Sized> MaximumFlowAlgorithm for MaximumFlowEngine<G> {
    fn maximum_flow(&self, source: VertexId, sink: VertexId) -> Result<MaximumFlow> {
        match self {
            MaximumFlowEngine::EdmondsKarp(a) => a.maximum_flow(source, sink),
            MaximumFlowEngine::PushRelabel(a) => a.maximum_flow(source, sink),
        }
    }

    fn flow_map(&self) -> Option<IndexMap<EdgeId, f64>> {
        match self {
            MaximumFlowEngine::EdmondsKarp(a) => a.flow_map(),
            MaximumFlowEngine::PushRelabel(a) => a.flow_map(),
        }
    }

    fn flow_direction(&self, edge: EdgeId) -> Result<VertexId> {
        match self {
            MaximumFlowEngine::EdmondsKarp(a) => a.flow_direction(edge),
            MaximumFlowEngine::PushRelabel(a) => a.flow_direction(edge),
        }
    }
}

impl<G: WeightedGraph + ?Sized> MinimumCutAlgorithm for MaximumFlowEngine<G> {
    fn minimum_cut(&self, source: VertexId, sink: VertexId) -> Result<MinimumCut> {
        match self {
            MaximumFlowEngine::EdmondsKarp(a) => a.minimum_cut(source, sink),
            MaximumFlowEngine::PushRelabel(a) => a.minimum_cut(source, sink),
        }
    }
}
