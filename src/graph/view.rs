//! 算法所依赖的只读图接口
//!
//! 算法只通过该 trait 读取图：顶点/边枚举、端点、权重和方向感知的邻接查询。
//! 单次算法运行期间图必须保持不变，并发修改由调用方负责避免。

use crate::graph::edge::EdgeId;
use crate::graph::types::GraphType;
use crate::graph::vertex::VertexId;

pub trait WeightedGraph {
    /// 图的结构类型
    fn graph_type(&self) -> GraphType;

    fn contains_vertex(&self, vertex: VertexId) -> bool;

    /// 所有顶点，顺序在图不变时保持稳定
    fn vertices(&self) -> Vec<VertexId>;

    /// 所有边，顺序在图不变时保持稳定
    fn edges(&self) -> Vec<EdgeId>;

    fn edge_source(&self, edge: EdgeId) -> Option<VertexId>;

    fn edge_target(&self, edge: EdgeId) -> Option<VertexId>;

    /// 边权重；不带权的图恒为 1.0
    fn edge_weight(&self, edge: EdgeId) -> f64;

    /// 与顶点关联的所有边（有向图为出边加入边，自环只出现一次）
    fn edges_of(&self, vertex: VertexId) -> Vec<EdgeId>;

    /// 出边；无向图等同于 `edges_of`
    fn outgoing_edges_of(&self, vertex: VertexId) -> Vec<EdgeId>;

    /// 入边；无向图等同于 `edges_of`
    fn incoming_edges_of(&self, vertex: VertexId) -> Vec<EdgeId>;

    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// 给定边的一个端点，返回另一个端点
    fn opposite_vertex(&self, edge: EdgeId, vertex: VertexId) -> Option<VertexId> {
        let src = self.edge_source(edge)?;
        let dst = self.edge_target(edge)?;
        if vertex == src {
            Some(dst)
        } else if vertex == dst {
            Some(src)
        } else {
            None
        }
    }
}
