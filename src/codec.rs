// src/codec.rs
//
// Text codec for exported weight blobs and feature files. A matrix blob is
// one line per row with single-space separated decimal cells; a vector blob
// is a single such row. Empty lines and empty tokens are ignored.

use ndarray::{Array1, Array2};

use crate::error::ModelError;

fn parse_row(line: &str) -> Result<Vec<f32>, ModelError> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f32>()
                .map_err(|_| ModelError::MalformedWeights(format!("unparseable cell '{}'", tok)))
        })
        .collect()
}

/// Parses a matrix blob and transposes it once. The export writes the
/// declared row dimension first; the transforms expect the opposite
/// orientation, so the row-major N x M block becomes M x N here rather
/// than on every call.
pub fn matrix_from_blob(blob: &str) -> Result<Array2<f32>, ModelError> {
    let mut flat: Vec<f32> = Vec::new();
    let mut rows = 0usize;
    let mut cols = 0usize;
    for line in blob.lines().filter(|l| !l.trim().is_empty()) {
        let row = parse_row(line)?;
        if rows == 0 {
            cols = row.len();
        } else if row.len() != cols {
            return Err(ModelError::MalformedWeights(format!(
                "row {} has {} columns, expected {}",
                rows, row.len(), cols
            )));
        }
        flat.extend(row);
        rows += 1;
    }
    if rows == 0 || cols == 0 {
        return Err(ModelError::MalformedWeights("empty matrix blob".to_string()));
    }
    let parsed = Array2::from_shape_vec((rows, cols), flat)
        .map_err(|e| ModelError::MalformedWeights(e.to_string()))?;
    Ok(parsed.reversed_axes())
}

/// Parses a vector blob: a single delimited row. A blob spanning several
/// rows is a matrix in the wrong slot, not a vector, and is rejected
/// rather than flattened.
pub fn vector_from_blob(blob: &str) -> Result<Array1<f32>, ModelError> {
    let mut lines = blob.lines().filter(|l| !l.trim().is_empty());
    let row = match lines.next() {
        Some(line) => parse_row(line)?,
        None => return Err(ModelError::MalformedWeights("empty vector blob".to_string())),
    };
    if lines.next().is_some() {
        return Err(ModelError::MalformedWeights(
            "vector blob has more than one row".to_string(),
        ));
    }
    Ok(Array1::from_vec(row))
}

/// Parses a feature file body: one timestep per line, space-separated
/// floats, blank lines skipped. Shares the blob row grammar.
pub fn sequence_from_str(contents: &str) -> Result<Vec<Array1<f32>>, ModelError> {
    let mut sequence = Vec::new();
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        sequence.push(Array1::from_vec(parse_row(line)?));
    }
    Ok(sequence)
}
