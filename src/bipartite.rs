//! Bipartite graph of matrix rows and columns.

use crate::error::Result;
use crate::mapping::Mapping;
use crate::matrix::Matrix;
use crate::palette::{self, Color};
use log::info;
use rayon::prelude::*;

/// Entries with a smaller magnitude are treated as no connection.
pub const EDGE_EPSILON: f64 = 1e-10;

/// Which side of the bipartition a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    Circle,
}

impl Shape {
    pub fn tag(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Circle => "circle",
        }
    }
}

/// Drawing attributes of one vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub side: Side,
    pub shape: Shape,
    pub color: Color,
    pub label: String,
}

/// Undirected bipartite graph. Vertices `[0, height)` are rows,
/// `[height, height + width)` are columns. Each edge is stored once as
/// `(row vertex, column vertex)`.
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    height: usize,
    width: usize,
    vertices: Vec<Vertex>,
    edges: Vec<(usize, usize)>,
    groups: Option<Vec<i64>>,
}

impl BipartiteGraph {
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        false
    }

    pub fn row_vertex(&self, row: usize) -> usize {
        row
    }

    pub fn column_vertex(&self, column: usize) -> usize {
        self.height + column
    }

    /// Cluster id of every column vertex, present only when built with a mapping.
    pub fn groups(&self) -> Option<&[i64]> {
        self.groups.as_deref()
    }
}

/// Build the bipartite graph of `matrix`, colouring columns by `mapping`.
pub fn build_bipartite(matrix: &Matrix, mapping: Option<&Mapping>) -> Result<BipartiteGraph> {
    let height = matrix.height();
    let width = matrix.width();
    if let Some(mapping) = mapping {
        mapping.check_columns(width)?;
    }

    let mut vertices = Vec::with_capacity(height + width);
    for i in 0..height {
        vertices.push(Vertex {
            side: Side::Row,
            shape: Shape::Square,
            color: palette::ROW_COLOR,
            label: i.to_string(),
        });
    }
    for j in 0..width {
        let color = match mapping {
            Some(m) => palette::cluster_color(m.cluster_of(j)),
            None => palette::default_column_color(),
        };
        vertices.push(Vertex {
            side: Side::Column,
            shape: Shape::Circle,
            color,
            label: j.to_string(),
        });
    }

    let edges: Vec<(usize, usize)> = matrix
        .rows()
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| v.abs() >= EDGE_EPSILON)
                .map(move |(j, _)| (i, height + j))
        })
        .collect();

    info!(
        "Built bipartite graph: {} row vertices, {} column vertices, {} edges",
        height,
        width,
        edges.len()
    );

    Ok(BipartiteGraph {
        height,
        width,
        vertices,
        edges,
        groups: mapping.map(|m| m.ids().to_vec()),
    })
}
