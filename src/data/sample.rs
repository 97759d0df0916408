use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{NetworkError, Result},
    math::matrix::Matrix,
};

/// A labeled data point: an input column vector and a scalar target.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    input: Matrix,
    expected: Matrix,
}

impl Sample {
    pub fn new(input: Vec<f64>, expected: f64) -> Sample {
        Sample {
            input: Matrix::column(input),
            expected: Matrix::column(vec![expected]),
        }
    }

    /// Input as an `(n0, 1)` column.
    pub fn input(&self) -> &Matrix {
        &self.input
    }

    /// Target as a `(1, 1)` column.
    pub fn expected(&self) -> &Matrix {
        &self.expected
    }

    pub fn label(&self) -> f64 {
        self.expected.get(0, 0)
    }

    /// Reads a JSON array of `{ "input": [...], "label": ... }` objects.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let raw: Vec<RawSample> = serde_json::from_reader(reader)?;
        let samples = raw
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_sample(index))
            .collect::<Result<Vec<_>>>()?;
        debug!(path = %path.display(), count = samples.len(), "loaded samples");
        Ok(samples)
    }
}

#[derive(Deserialize)]
struct RawSample {
    input: Vec<RawNumber>,
    label: RawNumber,
}

/// Anything the sample files use to spell a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl RawNumber {
    fn to_f64(&self) -> std::result::Result<f64, String> {
        match self {
            RawNumber::Number(x) => Ok(*x),
            RawNumber::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            RawNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("{:?} is not a number", s)),
        }
    }
}

impl RawSample {
    fn into_sample(self, index: usize) -> Result<Sample> {
        let malformed = |reason: String| NetworkError::MalformedSample { index, reason };
        if self.input.is_empty() {
            return Err(malformed("input is empty".into()));
        }
        let input = self
            .input
            .iter()
            .map(RawNumber::to_f64)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(malformed)?;
        let label = self.label.to_f64().map_err(malformed)?;
        Ok(Sample::new(input, label))
    }
}
