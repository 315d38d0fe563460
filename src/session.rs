//! The two camera sessions the interface can dispatch.
//!
//! Each session owns the camera for its whole lifetime and produces exactly
//! one result. The loops block, so they run on the blocking thread pool and
//! poll a cancellation flag once per frame.

use opencv::{
    core::{Mat, Vector},
    imgcodecs::imwrite,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    config::Config,
    data::{ledger, store::RecordStore, AttendanceRecord, Registration, Student},
    error::{Error, Result},
    utils,
    vision::{
        detector::FaceDetector,
        recognizer::{self, FaceRecognizer, MatchPolicy},
    },
};

/// what a finished registration reports back to the interface
#[derive(Debug, Clone)]
pub struct CaptureReport {
    pub student: Student,
    pub samples_trained: usize,
}

#[derive(Debug, Clone)]
pub struct RecognitionReport {
    pub record: AttendanceRecord,
}

pub async fn capture(
    config: Config,
    registration: Registration,
    cancel: Arc<AtomicBool>,
) -> Result<CaptureReport> {
    tokio::task::spawn_blocking(move || capture_blocking(&config, &registration, &cancel))
        .await
        .map_err(|error| Error::Session(error.to_string()))?
}

pub async fn recognize(config: Config, cancel: Arc<AtomicBool>) -> Result<RecognitionReport> {
    tokio::task::spawn_blocking(move || recognize_blocking(&config, &cancel))
        .await
        .map_err(|error| Error::Session(error.to_string()))?
}

fn open_camera(index: i32) -> Result<VideoCapture> {
    let camera = VideoCapture::new(index, videoio::CAP_ANY).map_err(|error| {
        tracing::error!("failed to open camera {}, {}", index, error);
        Error::CameraUnavailable
    })?;
    if !camera.is_opened().map_err(|_| Error::CameraUnavailable)? {
        return Err(Error::CameraUnavailable);
    }
    Ok(camera)
}

fn grayscale(frame: &Mat) -> Result<Mat> {
    let mut gray = Mat::default();
    imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;
    Ok(gray)
}

/// Loops until a face is captured or the session is cancelled. On capture the
/// cropped sample is written to disk, the student is ledgered and upserted,
/// and the model is rebuilt. No write happens on any other exit path.
fn capture_blocking(
    config: &Config,
    registration: &Registration,
    cancel: &AtomicBool,
) -> Result<CaptureReport> {
    utils::ensure_dir(&config.training_dir)?;
    let mut detector = FaceDetector::from_cascade(&config.cascade_path)?;
    let mut camera = open_camera(config.camera_index)?;

    let sample_path = registration.sample_path(&config.training_dir);
    let mut captured = false;
    while !cancel.load(Ordering::Relaxed) {
        let mut frame = Mat::default();
        if !camera.read(&mut frame).map_err(|_| Error::CameraUnavailable)? {
            return Err(Error::CameraUnavailable);
        }
        if frame.empty() {
            continue;
        }
        let gray = grayscale(&frame)?;
        let faces = detector.detect(&gray, config.capture_detect)?;
        if let Some(face) = faces.iter().next() {
            let crop = Mat::roi(&gray, face)?.try_clone()?;
            let flags: Vector<i32> = Vector::new();
            imwrite(&sample_path.to_string_lossy(), &crop, &flags)?;
            captured = true;
            break;
        }
    }
    camera.release()?;

    if !captured {
        return Err(Error::NoFaceDetected);
    }

    let student = Student {
        serial: registration.serial,
        id: registration.id,
        name: registration.name.clone(),
        image_path: sample_path.to_string_lossy().into_owned(),
    };
    ledger::append(&config.student_ledger, &student)?;
    let store = RecordStore::new(&config.database_path);
    store.upsert_student(&student)?;
    tracing::info!("registered {} (serial {})", student.name, student.serial);

    let samples_trained =
        recognizer::train_model(&store.sample_manifest()?, &config.model_path, config.recognizer)?;
    Ok(CaptureReport {
        student,
        samples_trained,
    })
}

/// Loops until one detected face scores below the confidence threshold and
/// resolves against the roster snapshot, then writes exactly one attendance
/// row and its ledger line. First match wins.
fn recognize_blocking(config: &Config, cancel: &AtomicBool) -> Result<RecognitionReport> {
    let recognizer = FaceRecognizer::load(&config.model_path, config.recognizer)?;
    let store = RecordStore::new(&config.database_path);
    // snapshot, roster changes during the session are not observed
    let roster = store.roster()?;
    let policy = MatchPolicy {
        max_distance: config.confidence_threshold,
    };
    let mut detector = FaceDetector::from_cascade(&config.cascade_path)?;
    let mut camera = open_camera(config.camera_index)?;

    let mut marked: Option<AttendanceRecord> = None;
    'session: while !cancel.load(Ordering::Relaxed) {
        let mut frame = Mat::default();
        match camera.read(&mut frame) {
            Ok(true) => (),
            // the session ends when frames stop arriving
            Ok(false) | Err(_) => break,
        }
        if frame.empty() {
            continue;
        }
        let gray = grayscale(&frame)?;
        for face in detector.detect(&gray, config.recognition_detect)? {
            let crop = Mat::roi(&gray, face)?.try_clone()?;
            let prediction = recognizer.predict(&crop)?;
            if let Some(name) = roster.get(&prediction.label) {
                if policy.accepts(prediction, Some(name)) {
                    let record =
                        AttendanceRecord::present(prediction.label, name, utils::timestamp());
                    ledger::append(&config.attendance_ledger, &record)?;
                    store.insert_attendance(&record)?;
                    tracing::info!("attendance marked for {} at {}", record.name, record.timestamp);
                    marked = Some(record);
                    break 'session;
                }
            }
        }
    }
    camera.release()?;

    match marked {
        Some(record) => Ok(RecognitionReport { record }),
        None => Err(Error::NoRecognizedFace),
    }
}
