//! Per-column cluster mapping.

use crate::error::{Error, MappingDefect, Result};
use log::debug;

/// One cluster id per matrix column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    ids: Vec<i64>,
}

impl Mapping {
    pub fn new(ids: Vec<i64>) -> Self {
        Mapping { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub(crate) fn cluster_of(&self, column: usize) -> i64 {
        self.ids[column]
    }

    /// Distinct cluster ids in ascending order.
    pub fn clusters(&self) -> Vec<i64> {
        let mut clusters = self.ids.clone();
        clusters.sort_unstable();
        clusters.dedup();
        clusters
    }

    /// Fails unless there is exactly one id per column of a `width`-wide matrix.
    pub fn check_columns(&self, width: usize) -> Result<()> {
        if self.ids.len() != width {
            return Err(MappingDefect::ColumnCount {
                expected: width,
                actual: self.ids.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Write the mapping in the format `parse_mapping` reads, optionally
    /// preceded by a `<height> <width>` header.
    pub fn to_text(&self, header: Option<(usize, usize)>) -> String {
        let mut out = String::new();
        if let Some((height, width)) = header {
            out.push_str(&format!("{} {}\n", height, width));
        }
        let ids: Vec<String> = self.ids.iter().map(|id| id.to_string()).collect();
        out.push_str(&ids.join(" "));
        out.push('\n');
        out
    }
}

/// Parse a whitespace separated list of cluster ids.
///
/// With `has_size` the first two tokens are a `<height> <width>` header; the
/// remaining count must equal one of them.
pub fn parse_mapping(content: &str, has_size: bool) -> Result<Mapping> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(Error::empty_input("mapping"));
    }

    let values = if has_size {
        let header = || MappingDefect::Header {
            tokens: tokens.iter().take(2).map(|t| t.to_string()).collect(),
        };
        if tokens.len() < 2 {
            return Err(header().into());
        }
        let height = tokens[0].parse::<usize>().map_err(|_| header())?;
        let width = tokens[1].parse::<usize>().map_err(|_| header())?;
        let values = &tokens[2..];
        if values.len() != height && values.len() != width {
            return Err(MappingDefect::Length {
                height,
                width,
                actual: values.len(),
            }
            .into());
        }
        values
    } else {
        &tokens[..]
    };

    let ids = values
        .iter()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<i64>().map_err(|_| {
                Error::from(MappingDefect::Value {
                    index,
                    token: token.to_string(),
                })
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed mapping with {} entries", ids.len());
    Ok(Mapping::new(ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let m = parse_mapping("3 2\n0 1", true).unwrap();
        assert_eq!(m.ids(), &[0, 1]);
    }

    #[test]
    fn test_header_may_match_height() {
        let m = parse_mapping("3 2\n4 4 5", true).unwrap();
        assert_eq!(m.ids(), &[4, 4, 5]);
    }

    #[test]
    fn test_parse_without_header_takes_everything() {
        let m = parse_mapping("3 2 0 1\n", false).unwrap();
        assert_eq!(m.ids(), &[3, 2, 0, 1]);
    }

    #[test]
    fn test_length_matching_neither_dimension() {
        let err = parse_mapping("3 2\n0 1 2 3", true).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedMapping(MappingDefect::Length {
                height: 3,
                width: 2,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_empty_and_bad_tokens() {
        assert!(matches!(
            parse_mapping("  \n", true),
            Err(Error::EmptyInput { source_name: "mapping" })
        ));
        assert!(matches!(
            parse_mapping("5", true),
            Err(Error::MalformedMapping(MappingDefect::Header { .. }))
        ));
        assert!(matches!(
            parse_mapping("0 a 2", false),
            Err(Error::MalformedMapping(MappingDefect::Value { index: 1, .. }))
        ));
    }

    #[test]
    fn test_clusters_and_column_check() {
        let m = Mapping::new(vec![3, 1, 3, 0]);
        assert_eq!(m.clusters(), vec![0, 1, 3]);
        assert!(m.check_columns(4).is_ok());
        assert!(matches!(
            m.check_columns(3),
            Err(Error::MalformedMapping(MappingDefect::ColumnCount {
                expected: 3,
                actual: 4
            }))
        ));
    }
}
