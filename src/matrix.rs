//! Dense matrix input: parsing, validation and the text format.

use crate::error::{Error, MatrixDefect, Result};
use log::debug;

/// A dense, row-major matrix of weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    height: usize,
    width: usize,
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Build a matrix from rows, checking that every row has the width of the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(MatrixDefect::ZeroDimension {
                height: rows.len(),
                width,
            }
            .into());
        }
        check_dimensions(&rows, None, width)?;
        Ok(Matrix {
            height: rows.len(),
            width,
            rows,
        })
    }

    /// Matrix with a known width that may have no rows at all.
    pub(crate) fn with_width(width: usize, rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Matrix {
            height: rows.len(),
            width,
            rows,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    #[cfg(test)]
    fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    /// Number of entries whose magnitude reaches `threshold`.
    pub fn count_at_least(&self, threshold: f64) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|v| v.abs() >= threshold)
            .count()
    }

    /// Write the matrix in the format `parse_matrix` reads.
    pub fn to_text(&self, with_size: bool) -> String {
        let mut out = String::new();
        if with_size {
            out.push_str(&format!("{} {}\n", self.height, self.width));
        }
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

fn check_dimensions(rows: &[Vec<f64>], height: Option<usize>, width: usize) -> Result<()> {
    if let Some(expected) = height {
        if expected != rows.len() {
            return Err(MatrixDefect::Height {
                expected,
                actual: rows.len(),
            }
            .into());
        }
    }
    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(MatrixDefect::Width {
                row,
                expected: width,
                actual: values.len(),
            }
            .into());
        }
    }
    Ok(())
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let bad = || MatrixDefect::Header {
        line: line.to_string(),
    };
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(bad().into());
    }
    let height = parts[0].parse::<usize>().map_err(|_| bad())?;
    let width = parts[1].parse::<usize>().map_err(|_| bad())?;
    if height == 0 || width == 0 {
        return Err(MatrixDefect::ZeroDimension { height, width }.into());
    }
    Ok((height, width))
}

fn parse_row(row: usize, line: &str) -> Result<Vec<f64>> {
    line.split_whitespace()
        .enumerate()
        .map(|(column, token)| {
            token.parse::<f64>().map_err(|_| {
                Error::from(MatrixDefect::Value {
                    row,
                    column,
                    token: token.to_string(),
                })
            })
        })
        .collect()
}

/// Parse a matrix from text lines.
///
/// With `has_size` the first non-blank line must be `<height> <width>` and the
/// remaining rows are checked against it. Without it, the dimensions come from
/// the row count and the length of the first row. Blank lines are skipped.
pub fn parse_matrix_lines<'a, I>(lines: I, has_size: bool) -> Result<Matrix>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lines = lines.into_iter().filter(|l| !l.trim().is_empty()).peekable();
    if lines.peek().is_none() {
        return Err(Error::empty_input("matrix"));
    }

    let declared = if has_size {
        lines.next().map(parse_header).transpose()?
    } else {
        None
    };

    let rows = lines
        .enumerate()
        .map(|(i, line)| parse_row(i, line))
        .collect::<Result<Vec<_>>>()?;

    let (height, width) = match declared {
        Some((height, width)) => (Some(height), width),
        None => {
            let width = rows.first().map(|r| r.len()).unwrap_or(0);
            (None, width)
        }
    };
    check_dimensions(&rows, height, width)?;

    debug!("Parsed {}x{} matrix", rows.len(), width);
    Ok(Matrix::with_width(width, rows))
}

/// Parse a matrix from a whole text blob.
pub fn parse_matrix(content: &str, has_size: bool) -> Result<Matrix> {
    parse_matrix_lines(content.lines(), has_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_size_header() {
        let m = parse_matrix("2 3\n1 0 0.5\n0 -2 0\n", true).unwrap();
        assert_eq!(m.height(), 2);
        assert_eq!(m.width(), 3);
        assert_eq!(m.row(0), &[1.0, 0.0, 0.5]);
        assert_eq!(m.get(1, 1), -2.0);
    }

    #[test]
    fn test_parse_without_size_infers_shape() {
        let m = parse_matrix("1 0\n0 1\n1 1", false).unwrap();
        assert_eq!((m.height(), m.width()), (3, 2));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let m = parse_matrix("\n1 2 3 \n\n4 5 6\n   \n", false).unwrap();
        assert_eq!((m.height(), m.width()), (2, 3));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parse_matrix("", true),
            Err(Error::EmptyInput { source_name: "matrix" })
        ));
        assert!(matches!(
            parse_matrix(" \n\n", false),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_row_width_mismatch_names_row() {
        let err = parse_matrix("1 2\n3 4 5\n", false).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedMatrix(MatrixDefect::Width {
                row: 1,
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_declared_width_is_enforced() {
        let err = parse_matrix("1 3\n1 2\n", true).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedMatrix(MatrixDefect::Width {
                row: 0,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_declared_height_is_enforced() {
        let err = parse_matrix("3 2\n1 2\n3 4\n", true).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedMatrix(MatrixDefect::Height {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_bad_header_and_values() {
        assert!(matches!(
            parse_matrix("2\n1 2\n", true),
            Err(Error::MalformedMatrix(MatrixDefect::Header { .. }))
        ));
        assert!(matches!(
            parse_matrix("0 2\n", true),
            Err(Error::MalformedMatrix(MatrixDefect::ZeroDimension { .. }))
        ));
        let err = parse_matrix("1 2\n1 x\n", true).unwrap_err();
        match err {
            Error::MalformedMatrix(MatrixDefect::Value { row, column, token }) => {
                assert_eq!((row, column), (0, 1));
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_text_round_trip() {
        let m = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.25, -3.0]]).unwrap();
        let back = parse_matrix(&m.to_text(true), true).unwrap();
        assert_eq!(m, back);
        assert_eq!(m.count_at_least(1e-10), 3);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(Matrix::from_rows(Vec::new()).is_err());
    }
}
