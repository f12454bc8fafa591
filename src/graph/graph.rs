//! 内存图
//!
//! 算法层的默认图实现：顶点按插入顺序保存，边支持权重、自环和多重边（取决于图类型）

use super::edge::{Edge, EdgeId};
use super::index::EdgeIndex;
use super::types::GraphType;
use super::vertex::VertexId;
use super::view::WeightedGraph;
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 带权图
pub struct Graph {
    /// 图类型
    graph_type: GraphType,
    /// 邻接索引
    edge_index: EdgeIndex,
    /// 下一个顶点 ID
    next_vertex_id: AtomicU64,
    /// 下一个边 ID
    next_edge_id: AtomicU64,
    /// 顶点集合（保持插入顺序）
    vertices: RwLock<IndexSet<VertexId>>,
    /// 边表（保持插入顺序）
    edges: RwLock<IndexMap<EdgeId, Edge>>,
}

impl Graph {
    /// 创建空图
    pub fn new(graph_type: GraphType) -> Arc<Self> {
        Arc::new(Self {
            graph_type,
            edge_index: EdgeIndex::new(),
            next_vertex_id: AtomicU64::new(1),
            next_edge_id: AtomicU64::new(1),
            vertices: RwLock::new(IndexSet::new()),
            edges: RwLock::new(IndexMap::new()),
        })
    }

    /// 创建有向伪图
    pub fn directed() -> Arc<Self> {
        Self::new(GraphType::directed_pseudograph())
    }

    /// 创建无向伪图
    pub fn undirected() -> Arc<Self> {
        Self::new(GraphType::pseudograph())
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点，自动分配 ID
    pub fn add_vertex(&self) -> VertexId {
        let mut vertices = self.vertices.write();
        loop {
            let id = VertexId::new(self.next_vertex_id.fetch_add(1, Ordering::SeqCst));
            if vertices.insert(id) {
                return id;
            }
        }
    }

    /// 以指定 ID 添加顶点
    pub fn add_vertex_with_id(&self, id: VertexId) -> Result<VertexId> {
        if !self.vertices.write().insert(id) {
            return Err(Error::VertexAlreadyExists(id.to_string()));
        }
        self.next_vertex_id
            .fetch_max(id.as_u64().saturating_add(1), Ordering::SeqCst);
        Ok(id)
    }

    /// 批量添加顶点，已存在的顶点被忽略
    pub fn add_vertices<I>(&self, ids: I)
    where
        I: IntoIterator<Item = u64>,
    {
        for id in ids {
            let _ = self.add_vertex_with_id(VertexId::new(id));
        }
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.read().len()
    }

    // ==================== 边操作 ====================

    /// 添加权重为 1 的边
    pub fn add_edge(&self, src: VertexId, dst: VertexId) -> Result<EdgeId> {
        self.add_weighted_edge(src, dst, 1.0)
    }

    /// 添加带权边
    pub fn add_weighted_edge(&self, src: VertexId, dst: VertexId, weight: f64) -> Result<EdgeId> {
        if weight.is_nan() {
            return Err(Error::InvalidArgument("边权重不能为 NaN".to_string()));
        }
        {
            let vertices = self.vertices.read();
            if !vertices.contains(&src) {
                return Err(Error::VertexNotFound(format!("源顶点 {} 不存在", src)));
            }
            if !vertices.contains(&dst) {
                return Err(Error::VertexNotFound(format!("目标顶点 {} 不存在", dst)));
            }
        }

        if src == dst && !self.graph_type.is_allowing_self_loops() {
            return Err(Error::LoopsNotAllowed(src.to_string()));
        }
        if !self.graph_type.is_allowing_multiple_edges() && self.contains_edge_between(src, dst) {
            return Err(Error::MultipleEdgesNotAllowed(format!("{} -> {}", src, dst)));
        }

        let id = EdgeId::new(self.next_edge_id.fetch_add(1, Ordering::SeqCst));
        let edge = Edge::new(id, src, dst, weight);

        self.edge_index.add_edge(id, src, dst);
        self.edges.write().insert(id, edge);

        Ok(id)
    }

    /// 添加带权边，端点不存在时先创建
    pub fn add_edge_with_vertices(&self, src: u64, dst: u64, weight: f64) -> Result<EdgeId> {
        self.add_vertices([src, dst]);
        self.add_weighted_edge(VertexId::new(src), VertexId::new(dst), weight)
    }

    /// 修改边权重
    pub fn set_edge_weight(&self, id: EdgeId, weight: f64) -> Result<()> {
        if !self.graph_type.is_weighted() {
            return Err(Error::InvalidArgument("不带权的图不能设置边权重".to_string()));
        }
        if weight.is_nan() {
            return Err(Error::InvalidArgument("边权重不能为 NaN".to_string()));
        }
        match self.edges.write().get_mut(&id) {
            Some(edge) => {
                edge.set_weight(weight);
                Ok(())
            }
            None => Err(Error::EdgeNotFound(id.to_string())),
        }
    }

    /// 获取边
    pub fn get_edge(&self, id: EdgeId) -> Option<Edge> {
        self.edges.read().get(&id).cloned()
    }

    /// 获取两点之间的所有边（无向图忽略方向）
    pub fn get_edges_between(&self, src: VertexId, dst: VertexId) -> Vec<EdgeId> {
        let mut edges = self.edge_index.get_edges_between(src, dst);
        if self.graph_type.is_undirected() && src != dst {
            edges.extend(self.edge_index.get_edges_between(dst, src));
        }
        edges
    }

    /// 两点之间是否存在边（无向图忽略方向）
    pub fn contains_edge_between(&self, src: VertexId, dst: VertexId) -> bool {
        !self.get_edges_between(src, dst).is_empty()
    }

    /// 删除边
    pub fn remove_edge(&self, id: EdgeId) -> Result<()> {
        let edge = self
            .edges
            .write()
            .shift_remove(&id)
            .ok_or_else(|| Error::EdgeNotFound(id.to_string()))?;
        self.edge_index.remove(id, edge.src(), edge.dst());
        Ok(())
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.read().len()
    }

    /// 获取顶点的出度（无向图为度数）
    pub fn out_degree(&self, vertex_id: VertexId) -> usize {
        self.outgoing_edges_of(vertex_id).len()
    }

    /// 获取顶点的入度（无向图为度数）
    pub fn in_degree(&self, vertex_id: VertexId) -> usize {
        self.incoming_edges_of(vertex_id).len()
    }

    fn incident_edges(&self, vertex: VertexId) -> Vec<EdgeId> {
        let mut edges = self.edge_index.get_outgoing(vertex);
        // 自环同时出现在出边和入边中，只保留一次
        edges.extend(
            self.edge_index
                .get_incoming(vertex)
                .into_iter()
                .filter(|&e| self.edge_source(e) != Some(vertex)),
        );
        edges
    }
}

impl WeightedGraph for Graph {
    fn graph_type(&self) -> GraphType {
        self.graph_type
    }

    fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.read().contains(&vertex)
    }

    fn vertices(&self) -> Vec<VertexId> {
        self.vertices.read().iter().copied().collect()
    }

    fn edges(&self) -> Vec<EdgeId> {
        self.edges.read().keys().copied().collect()
    }

    fn edge_source(&self, edge: EdgeId) -> Option<VertexId> {
        self.edges.read().get(&edge).map(Edge::src)
    }

    fn edge_target(&self, edge: EdgeId) -> Option<VertexId> {
        self.edges.read().get(&edge).map(Edge::dst)
    }

    fn edge_weight(&self, edge: EdgeId) -> f64 {
        if !self.graph_type.is_weighted() {
            return 1.0;
        }
        self.edges.read().get(&edge).map(Edge::weight).unwrap_or(1.0)
    }

    fn edges_of(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.incident_edges(vertex)
    }

    fn outgoing_edges_of(&self, vertex: VertexId) -> Vec<EdgeId> {
        if self.graph_type.is_directed() {
            self.edge_index.get_outgoing(vertex)
        } else {
            self.incident_edges(vertex)
        }
    }

    fn incoming_edges_of(&self, vertex: VertexId) -> Vec<EdgeId> {
        if self.graph_type.is_directed() {
            self.edge_index.get_incoming(vertex)
        } else {
            self.incident_edges(vertex)
        }
    }

    fn vertex_count(&self) -> usize {
        Graph::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        Graph::edge_count(self)
    }
}
