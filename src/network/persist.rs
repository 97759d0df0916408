use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{NetworkError, Result},
    layers::dense::Layer,
    math::matrix::Matrix,
    network::network::{validate_shape, Network},
};

/// On-disk layout of a [`Network`].
///
/// Matrices are nested rows, outer index = layer. Biases are `(n, 1)` columns,
/// so each one is written as `n` singleton rows: `[[b0], [b1], ...]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFile {
    pub shape: Vec<usize>,
    pub weights: Vec<Vec<Vec<f64>>>,
    pub biases: Vec<Vec<Vec<f64>>>,
}

impl From<&Network> for NetworkFile {
    fn from(network: &Network) -> Self {
        NetworkFile {
            shape: network.shape.clone(),
            weights: network.weights().map(Matrix::to_rows).collect(),
            biases: network.biases().map(Matrix::to_rows).collect(),
        }
    }
}

impl TryFrom<NetworkFile> for Network {
    type Error = NetworkError;

    fn try_from(file: NetworkFile) -> Result<Network> {
        validate_shape(&file.shape).map_err(|e| NetworkError::Malformed(e.to_string()))?;
        let n_layers = file.shape.len() - 1;
        if file.weights.len() != n_layers {
            return Err(NetworkError::Malformed(format!(
                "expected {} weight matrices, found {}",
                n_layers,
                file.weights.len()
            )));
        }
        if file.biases.len() != n_layers {
            return Err(NetworkError::Malformed(format!(
                "expected {} bias vectors, found {}",
                n_layers,
                file.biases.len()
            )));
        }

        let mut layers = Vec::with_capacity(n_layers);
        for (l, (weights, biases)) in file.weights.into_iter().zip(file.biases).enumerate() {
            let weights = Matrix::from_rows(weights).map_err(in_layer("weights", l))?;
            let biases = Matrix::from_rows(biases).map_err(in_layer("biases", l))?;

            let (rows, cols) = (file.shape[l + 1], file.shape[l]);
            if weights.shape() != (rows, cols) {
                return Err(NetworkError::Malformed(format!(
                    "weights layer {} has shape {:?}, expected {:?}",
                    l,
                    weights.shape(),
                    (rows, cols)
                )));
            }
            if biases.shape() != (rows, 1) {
                return Err(NetworkError::Malformed(format!(
                    "biases layer {} has shape {:?}, expected {:?}",
                    l,
                    biases.shape(),
                    (rows, 1)
                )));
            }
            layers.push(Layer::from_parts(weights, biases));
        }

        Ok(Network {
            shape: file.shape,
            layers,
        })
    }
}

fn in_layer(what: &'static str, l: usize) -> impl Fn(NetworkError) -> NetworkError {
    move |e| match e {
        NetworkError::Malformed(reason) => {
            NetworkError::Malformed(format!("{} layer {}: {}", what, l, reason))
        }
        other => other,
    }
}

impl Serialize for Network {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.check_finite().map_err(serde::ser::Error::custom)?;
        NetworkFile::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let file = NetworkFile::deserialize(deserializer)?;
        Network::try_from(file).map_err(serde::de::Error::custom)
    }
}

impl Network {
    /// Writes the network as pretty-printed JSON (`shape`, `weights`, `biases`).
    ///
    /// A network holding NaN or infinite parameters is refused before the
    /// file is touched, since JSON would store those values as `null`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.check_finite()?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &NetworkFile::from(self))?;
        writer.flush()?;
        debug!(path = %path.display(), shape = ?self.shape, "saved network");
        Ok(())
    }

    fn check_finite(&self) -> Result<()> {
        for (layer, params) in self.layers.iter().enumerate() {
            if !params.weights().iter().all(|x| x.is_finite()) {
                return Err(NetworkError::NonFinite { what: "weights", layer });
            }
            if !params.biases().iter().all(|x| x.is_finite()) {
                return Err(NetworkError::NonFinite { what: "biases", layer });
            }
        }
        Ok(())
    }

    /// Reads a network written by [`Network::save`].
    ///
    /// Returns `Ok(None)` when `path` does not exist so callers can fall back
    /// to a freshly initialised network. Content that does not describe a
    /// consistent network is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Network>> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no saved network");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let raw: NetworkFile = serde_json::from_reader(BufReader::new(file))?;
        let network = Network::try_from(raw)?;
        info!(path = %path.display(), shape = ?network.shape, "loaded network");
        Ok(Some(network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_round_trip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.json");

        let net = Network::new(&[4, 3, 2], 17).unwrap();
        net.save(&path).unwrap();
        let loaded = Network::load(&path).unwrap().unwrap();

        assert_eq!(loaded.shape(), net.shape());
        assert_eq!(loaded, net);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(Network::load(dir.path().join("missing.json")).unwrap().is_none());
    }

    #[test]
    fn test_saved_layout_uses_singleton_bias_rows() {
        let net = Network::new(&[2, 3, 1], 1).unwrap();
        let value = serde_json::to_value(&net).unwrap();

        assert_eq!(value["shape"], serde_json::json!([2, 3, 1]));
        assert_eq!(value["weights"][0].as_array().unwrap().len(), 3);
        assert_eq!(value["weights"][0][0].as_array().unwrap().len(), 2);
        assert_eq!(value["biases"][0].as_array().unwrap().len(), 3);
        assert_eq!(value["biases"][0][0].as_array().unwrap().len(), 1);
        assert_eq!(value["biases"][1][0][0], serde_json::json!(net.layers()[1].biases().get(0, 0)));
    }

    #[test]
    fn test_load_uses_literal_values() {
        let json = r#"{
            "shape": [2, 1],
            "weights": [[[0.5, -0.25]]],
            "biases": [[[2.0]]]
        }"#;
        let net: Network = serde_json::from_str(json).unwrap();
        assert_eq!(net.layers()[0].weights().to_rows(), vec![vec![0.5, -0.25]]);
        assert_eq!(net.layers()[0].biases().get(0, 0), 2.0);
    }

    fn parse(json: &str) -> Result<Network> {
        let file: NetworkFile = serde_json::from_str(json)?;
        Network::try_from(file)
    }

    #[test]
    fn test_rejects_malformed_content() {
        // ragged weight rows
        assert!(matches!(
            parse(r#"{"shape": [2, 2], "weights": [[[1, 2], [3]]], "biases": [[[0], [0]]]}"#),
            Err(NetworkError::Malformed(_))
        ));
        // weights disagree with shape
        assert!(matches!(
            parse(r#"{"shape": [3, 1], "weights": [[[1, 2]]], "biases": [[[0]]]}"#),
            Err(NetworkError::Malformed(_))
        ));
        // flat biases instead of singleton rows
        assert!(parse(r#"{"shape": [2, 1], "weights": [[[1, 2]]], "biases": [[0]]}"#).is_err());
        // missing layer
        assert!(matches!(
            parse(r#"{"shape": [2, 2, 1], "weights": [[[1, 2], [3, 4]]], "biases": [[[0], [0]]]}"#),
            Err(NetworkError::Malformed(_))
        ));
        // degenerate shape
        assert!(matches!(
            parse(r#"{"shape": [2], "weights": [], "biases": []}"#),
            Err(NetworkError::Malformed(_))
        ));
        // missing field
        assert!(matches!(
            parse(r#"{"shape": [2, 1], "weights": [[[1, 2]]]}"#),
            Err(NetworkError::Json(_))
        ));
    }

    #[test]
    fn test_load_reports_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"shape": [2, 1], "weights": [[[1, 2, 3]]], "biases": [[[0]]]}"#)
            .unwrap();
        assert!(matches!(Network::load(&path), Err(NetworkError::Malformed(_))));
    }

    #[test]
    fn test_save_refuses_diverged_network() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diverged.json");

        let mut net = Network::new(&[1, 1], 1).unwrap();
        let batch = vec![crate::Sample::new(vec![1.0], 1e308)];
        for _ in 0..3 {
            net.train_batch(&batch, 3.0).unwrap();
        }
        assert!(!net.layers()[0].weights().get(0, 0).is_finite());

        assert!(matches!(
            net.save(&path),
            Err(NetworkError::NonFinite { what: "weights", layer: 0 })
        ));
        assert!(!path.exists());
        assert!(serde_json::to_string(&net).is_err());
    }

    #[test]
    fn test_save_refuses_non_finite_bias() {
        let dir = tempdir().unwrap();
        let mut net = Network::new(&[2, 2, 1], 1).unwrap();
        net.layers[1].biases.set(0, 0, f64::NAN);

        assert!(matches!(
            net.save(dir.path().join("nan.json")),
            Err(NetworkError::NonFinite { what: "biases", layer: 1 })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_failed_flush() {
        // Small enough to sit entirely in the write buffer until the flush.
        let net = Network::new(&[1, 1], 1).unwrap();
        assert!(matches!(net.save("/dev/full"), Err(NetworkError::Io(_))));
    }
}
