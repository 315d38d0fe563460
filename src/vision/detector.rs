// haar cascade face detection

use opencv::{
    core::{Mat, Rect, Size, Vector},
    objdetect::CascadeClassifier,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// detect_multi_scale tuning, one preset per kind of camera session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectParams {
    pub scale_factor: f64,
    pub min_neighbours: i32,
    /// smallest accepted face, square, in pixels; 0 disables the floor
    pub min_size: i32,
}

impl DetectParams {
    /// registration wants a close, well-framed face
    pub fn capture() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbours: 4,
            min_size: 100,
        }
    }

    /// recognition accepts smaller regions but demands more neighbours
    pub fn recognition() -> Self {
        Self {
            scale_factor: 1.2,
            min_neighbours: 5,
            min_size: 0,
        }
    }
}

pub struct FaceDetector {
    classifier: CascadeClassifier,
}

impl FaceDetector {
    pub fn from_cascade(path: &Path) -> Result<Self> {
        let classifier = CascadeClassifier::new(&path.to_string_lossy())?;
        Ok(Self { classifier })
    }

    /// face regions found in a grayscale frame
    pub fn detect(&mut self, gray: &Mat, params: DetectParams) -> Result<Vector<Rect>> {
        let mut faces: Vector<Rect> = Vector::new();
        self.classifier.detect_multi_scale(
            gray,
            &mut faces,
            params.scale_factor,
            params.min_neighbours,
            0,
            Size::new(params.min_size, params.min_size),
            Size::new(0, 0),
        )?;
        Ok(faces)
    }
}

#[cfg(test)]
mod test {
    use super::DetectParams;

    #[test]
    fn presets_differ_where_the_sessions_do() {
        let capture = DetectParams::capture();
        let recognition = DetectParams::recognition();
        assert!(capture.min_size > recognition.min_size);
        assert!(capture.scale_factor < recognition.scale_factor);
    }
}
