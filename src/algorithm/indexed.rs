//! 图的稠密索引快照
//!
//! 算法运行前把 `WeightedGraph` 转成以 `usize` 下标寻址的邻接表，
//! 之后的松弛、增广都在下标上进行，不再反复查询图。

use crate::error::{Error, Result};
use crate::graph::{EdgeId, VertexId, WeightedGraph};
use indexmap::IndexSet;
use std::collections::HashMap;

/// 快照中的边
#[derive(Debug, Clone)]
pub(crate) struct IndexedEdge {
    pub id: EdgeId,
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl IndexedEdge {
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Clone)]
pub(crate) struct IndexedGraph {
    directed: bool,
    vertices: IndexSet<VertexId>,
    edges: Vec<IndexedEdge>,
    /// 可以离开顶点的边（无向图为全部关联边）
    outgoing: Vec<Vec<usize>>,
    /// 可以进入顶点的边（无向图为全部关联边）
    incoming: Vec<Vec<usize>>,
}

impl IndexedGraph {
    pub fn from_graph<G: WeightedGraph + ?Sized>(graph: &G) -> Self {
        let directed = graph.graph_type().is_directed();
        let vertices: IndexSet<VertexId> = graph.vertices().into_iter().collect();

        let mut edges = Vec::new();
        let mut edge_positions = HashMap::new();
        for id in graph.edges() {
            let endpoints = graph
                .edge_source(id)
                .zip(graph.edge_target(id))
                .and_then(|(s, t)| Some((vertices.get_index_of(&s)?, vertices.get_index_of(&t)?)));
            if let Some((source, target)) = endpoints {
                edge_positions.insert(id, edges.len());
                edges.push(IndexedEdge {
                    id,
                    source,
                    target,
                    weight: graph.edge_weight(id),
                });
            }
        }

        let adjacency = |lists: Vec<Vec<EdgeId>>| -> Vec<Vec<usize>> {
            lists
                .into_iter()
                .map(|ids| {
                    ids.into_iter()
                        .filter_map(|id| edge_positions.get(&id).copied())
                        .collect()
                })
                .collect()
        };
        let outgoing = adjacency(
            vertices
                .iter()
                .map(|&v| graph.outgoing_edges_of(v))
                .collect(),
        );
        let incoming = adjacency(
            vertices
                .iter()
                .map(|&v| graph.incoming_edges_of(v))
                .collect(),
        );

        Self {
            directed,
            vertices,
            edges,
            outgoing,
            incoming,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &IndexSet<VertexId> {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> VertexId {
        self.vertices[index]
    }

    pub fn index_of(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.get_index_of(&vertex)
    }

    /// 查找顶点下标，不存在时返回 `VertexNotFound`
    pub fn require(&self, vertex: VertexId, role: &str) -> Result<usize> {
        self.index_of(vertex)
            .ok_or_else(|| Error::VertexNotFound(format!("{} {} 不在图中", role, vertex)))
    }

    pub fn edges(&self) -> &[IndexedEdge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> &IndexedEdge {
        &self.edges[index]
    }

    pub fn outgoing(&self, vertex: usize) -> &[usize] {
        &self.outgoing[vertex]
    }

    pub fn incoming(&self, vertex: usize) -> &[usize] {
        &self.incoming[vertex]
    }

    /// 边的另一个端点
    pub fn opposite(&self, edge: usize, vertex: usize) -> usize {
        let e = &self.edges[edge];
        if e.source == vertex {
            e.target
        } else {
            e.source
        }
    }
}
