//! Turn a dense matrix into a bipartite graph of rows and columns, optionally
//! collapsing column clusters into a smaller cluster-connectivity graph.

pub mod bipartite;
pub mod error;
pub mod mapping;
pub mod matrix;
pub mod merge;
pub mod palette;
pub mod render;

pub use bipartite::{build_bipartite, BipartiteGraph, Shape, Side, Vertex, EDGE_EPSILON};
pub use error::{Error, MappingDefect, MatrixDefect, Result};
pub use mapping::{parse_mapping, Mapping};
pub use matrix::{parse_matrix, parse_matrix_lines, Matrix};
pub use merge::{check_merge_request, cluster_set, merge_clusters, Quotient, CLUSTER_EPSILON};
