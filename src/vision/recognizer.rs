// lbph face recognition, training and the match policy

use opencv::{
    core::{Mat, Ptr, Vector},
    face::LBPHFaceRecognizer,
    imgcodecs::{imread, IMREAD_GRAYSCALE},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// lbph tuning; the defaults are the library's own
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecognizerParams {
    pub radius: i32,
    pub neighbours: i32,
    pub grid_x: i32,
    pub grid_y: i32,
    pub threshold: f64,
}

impl Default for RecognizerParams {
    fn default() -> Self {
        Self {
            radius: 1,
            neighbours: 8,
            grid_x: 8,
            grid_y: 8,
            threshold: f64::MAX,
        }
    }
}

fn create(params: RecognizerParams) -> Result<Ptr<LBPHFaceRecognizer>> {
    Ok(LBPHFaceRecognizer::create(
        params.radius,
        params.neighbours,
        params.grid_x,
        params.grid_y,
        params.threshold,
    )?)
}

/// Rebuilds the model over every sample in the manifest and overwrites the
/// serialized model at `model_path`.
///
/// A sample whose image cannot be read is skipped with a warning; zero
/// readable samples is an error and leaves any previous model untouched.
/// Returns the number of samples trained.
pub fn train_model(
    samples: &[(i32, PathBuf)],
    model_path: &Path,
    params: RecognizerParams,
) -> Result<usize> {
    let mut images: Vector<Mat> = Vector::new();
    let mut labels: Vector<i32> = Vector::new();
    for (label, path) in samples {
        match imread(&path.to_string_lossy(), IMREAD_GRAYSCALE) {
            Ok(image) if !image.empty() => {
                images.push(image);
                labels.push(*label);
            }
            Ok(_) => tracing::warn!("skipping unreadable sample {}", path.display()),
            Err(error) => tracing::warn!("skipping sample {}, {}", path.display(), error),
        }
    }
    if images.is_empty() {
        return Err(Error::NoTrainingData);
    }

    let mut model = create(params)?;
    model.train(&images, &labels)?;
    if let Some(parent) = model_path.parent() {
        crate::utils::ensure_dir(parent)?;
    }
    model.write(&model_path.to_string_lossy())?;
    tracing::info!("model rebuilt over {} samples", images.len());
    Ok(images.len())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: i32,
    /// lower is more similar
    pub distance: f64,
}

/// a trained model, deserialized and ready to score face regions
pub struct FaceRecognizer {
    model: Ptr<LBPHFaceRecognizer>,
}

impl FaceRecognizer {
    /// fails with ModelNotTrained when no serialized model exists yet
    pub fn load(model_path: &Path, params: RecognizerParams) -> Result<Self> {
        if !model_path.exists() {
            return Err(Error::ModelNotTrained);
        }
        let mut model = create(params)?;
        model.read(&model_path.to_string_lossy())?;
        Ok(Self { model })
    }

    pub fn predict(&self, face: &Mat) -> Result<Prediction> {
        let mut label: i32 = -1;
        let mut distance: f64 = 0.0;
        self.model.predict(face, &mut label, &mut distance)?;
        Ok(Prediction { label, distance })
    }
}

/// An accepted match needs a confidence distance strictly below the
/// threshold and a label that resolves to a registered name.
#[derive(Debug, Clone, Copy)]
pub struct MatchPolicy {
    pub max_distance: f64,
}

impl MatchPolicy {
    pub fn accepts(&self, prediction: Prediction, name: Option<&str>) -> bool {
        prediction.distance < self.max_distance && name.is_some()
    }
}
