//! 邻接索引
//!
//! 维护每个顶点的出边/入边列表以及点对到边的映射（支持多重边）

use crate::graph::edge::EdgeId;
use crate::graph::vertex::VertexId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// 边索引
pub struct EdgeIndex {
    /// 源顶点到出边的映射
    outgoing: RwLock<HashMap<VertexId, Vec<EdgeId>>>,
    /// 目标顶点到入边的映射
    incoming: RwLock<HashMap<VertexId, Vec<EdgeId>>>,
    /// (src, dst) 到边 ID 列表的映射
    pair_to_edges: RwLock<HashMap<(VertexId, VertexId), Vec<EdgeId>>>,
}

impl EdgeIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self {
            outgoing: RwLock::new(HashMap::new()),
            incoming: RwLock::new(HashMap::new()),
            pair_to_edges: RwLock::new(HashMap::new()),
        }
    }

    /// 添加边
    pub fn add_edge(&self, edge_id: EdgeId, src: VertexId, dst: VertexId) {
        self.outgoing.write().entry(src).or_default().push(edge_id);
        self.incoming.write().entry(dst).or_default().push(edge_id);
        self.pair_to_edges
            .write()
            .entry((src, dst))
            .or_default()
            .push(edge_id);
    }

    /// 获取顶点的出边
    pub fn get_outgoing(&self, vertex_id: VertexId) -> Vec<EdgeId> {
        self.outgoing
            .read()
            .get(&vertex_id)
            .cloned()
            .unwrap_or_default()
    }

    /// 获取顶点的入边
    pub fn get_incoming(&self, vertex_id: VertexId) -> Vec<EdgeId> {
        self.incoming
            .read()
            .get(&vertex_id)
            .cloned()
            .unwrap_or_default()
    }

    /// 获取两点之间（按 src -> dst 方向）的所有边
    pub fn get_edges_between(&self, src: VertexId, dst: VertexId) -> Vec<EdgeId> {
        self.pair_to_edges
            .read()
            .get(&(src, dst))
            .cloned()
            .unwrap_or_default()
    }

    /// 移除边
    pub fn remove(&self, edge_id: EdgeId, src: VertexId, dst: VertexId) {
        if let Some(edges) = self.outgoing.write().get_mut(&src) {
            edges.retain(|&id| id != edge_id);
        }
        if let Some(edges) = self.incoming.write().get_mut(&dst) {
            edges.retain(|&id| id != edge_id);
        }
        if let Some(edges) = self.pair_to_edges.write().get_mut(&(src, dst)) {
            edges.retain(|&id| id != edge_id);
        }
    }
}

impl Default for EdgeIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_index() {
        let index = EdgeIndex::new();
        let eid = EdgeId::new(1);
        let src = VertexId::new(100);
        let dst = VertexId::new(200);

        index.add_edge(eid, src, dst);

        assert_eq!(index.get_outgoing(src), vec![eid]);
        assert_eq!(index.get_incoming(dst), vec![eid]);
        assert_eq!(index.get_edges_between(src, dst), vec![eid]);
        assert!(index.get_edges_between(dst, src).is_empty());
    }

    #[test]
    fn test_edge_index_remove() {
        let index = EdgeIndex::new();
        let (a, b) = (VertexId::new(1), VertexId::new(2));
        index.add_edge(EdgeId::new(1), a, b);
        index.add_edge(EdgeId::new(2), a, b);

        assert_eq!(index.get_edges_between(a, b).len(), 2);
        index.remove(EdgeId::new(1), a, b);
        assert_eq!(index.get_edges_between(a, b), vec![EdgeId::new(2)]);
        assert_eq!(index.get_outgoing(a), vec![EdgeId::new(2)]);
        assert_eq!(index.get_incoming(b), vec![EdgeId::new(2)]);
    }
}
