use crate::dataset::Sketch;
use crate::error::{Result, SketchretError};
use crate::model::{Autoencoder, Decoder, Encoder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Element-wise activation applied after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Tanh,
    Sigmoid,
    Linear,
}

impl Activation {
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Linear => x,
        }
    }
}

/// Fully connected layer: `out = act(W x + b)`, `W` is `out_dim` rows of `in_dim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    fn validate(&self, name: &str, in_dim: usize, out_dim: usize) -> Result<()> {
        if self.weights.len() != out_dim || self.bias.len() != out_dim {
            return Err(SketchretError::Checkpoint(format!(
                "{} expects {} output units, found {} weight rows and {} biases",
                name,
                out_dim,
                self.weights.len(),
                self.bias.len()
            )));
        }
        if let Some((i, row)) = self.weights.iter().enumerate().find(|(_, r)| r.len() != in_dim) {
            return Err(SketchretError::Checkpoint(format!(
                "{} weight row {} has {} inputs, expected {}",
                name,
                i,
                row.len(),
                in_dim
            )));
        }
        Ok(())
    }

    fn forward(&self, input: &[f32], activation: Activation) -> Vec<f32> {
        self.weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, b)| {
                let z: f32 = row.iter().zip(input.iter()).map(|(w, x)| w * x).sum::<f32>() + b;
                activation.apply(z)
            })
            .collect()
    }
}

/// On-disk checkpoint holding both encoder and decoder weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub input_dim: usize,
    pub latent_dim: usize,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub output_activation: Activation,
    pub encoder: DenseLayer,
    pub decoder: DenseLayer,
}

/// Single-layer dense autoencoder loaded from a JSON checkpoint.
#[derive(Debug, Clone)]
pub struct DenseAutoencoder {
    checkpoint: Checkpoint,
    fingerprint: String,
}

impl DenseAutoencoder {
    /// Read and validate a checkpoint file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let checkpoint: Checkpoint = serde_json::from_slice(&bytes)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let fingerprint = format!("{:x}", hasher.finalize());

        let model = Self::from_checkpoint(checkpoint, fingerprint)?;
        log::info!(
            "Loaded checkpoint {} (input {}, features {}, sha256 {})",
            path.display(),
            model.checkpoint.input_dim,
            model.checkpoint.latent_dim,
            &model.fingerprint[..12]
        );
        Ok(model)
    }

    pub fn from_checkpoint(checkpoint: Checkpoint, fingerprint: String) -> Result<Self> {
        if checkpoint.input_dim == 0 || checkpoint.latent_dim == 0 {
            return Err(SketchretError::Checkpoint(
                "input_dim and latent_dim must be greater than 0".to_string(),
            ));
        }
        checkpoint
            .encoder
            .validate("encoder", checkpoint.input_dim, checkpoint.latent_dim)?;
        checkpoint
            .decoder
            .validate("decoder", checkpoint.latent_dim, checkpoint.input_dim)?;
        Ok(Self {
            checkpoint,
            fingerprint,
        })
    }

    /// SHA-256 of the checkpoint bytes, lowercase hex.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl Encoder for DenseAutoencoder {
    fn input_dim(&self) -> usize {
        self.checkpoint.input_dim
    }

    fn feature_dim(&self) -> usize {
        self.checkpoint.latent_dim
    }

    fn encode(&self, batch: &[Sketch]) -> Result<Vec<Vec<f32>>> {
        batch
            .iter()
            .map(|sketch| {
                if sketch.data().len() != self.checkpoint.input_dim {
                    return Err(SketchretError::DimensionMismatch {
                        expected: self.checkpoint.input_dim,
                        actual: sketch.data().len(),
                    });
                }
                Ok(self
                    .checkpoint
                    .encoder
                    .forward(sketch.data(), self.checkpoint.activation))
            })
            .collect()
    }
}

impl Decoder for DenseAutoencoder {
    fn decode(&self, features: &[Vec<f32>], width: u32, height: u32) -> Result<Vec<Sketch>> {
        features
            .iter()
            .map(|f| {
                if f.len() != self.checkpoint.latent_dim {
                    return Err(SketchretError::DimensionMismatch {
                        expected: self.checkpoint.latent_dim,
                        actual: f.len(),
                    });
                }
                let pixels = self
                    .checkpoint
                    .decoder
                    .forward(f, self.checkpoint.output_activation);
                Sketch::new(width, height, pixels)
            })
            .collect()
    }
}

impl Autoencoder for DenseAutoencoder {}
