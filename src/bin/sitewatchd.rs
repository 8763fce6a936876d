//! sitewatchd - helmet-compliance watcher daemon
//!
//! 1. Loads configuration and the known-face registry
//! 2. Clears the prior session's status log
//! 3. Spawns the read-only status-log API
//! 4. Streams frames through the fusion pipeline until end-of-stream or
//!    ctrl-c, logging periodic health

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sitewatch::api::{StatusApiConfig, StatusApiServer};
use sitewatch::{
    CameraSource, FramePipeline, KnownFaceSet, ObjectDetector, PipelineContext,
    ScriptedCredentialReader, ScriptedFaceRecognizer, ScriptedObjectDetector, SitewatchConfig,
    SqliteStatusSink, StatusSink,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Override the status log database path.
    #[arg(long)]
    db: Option<String>,
    /// Override the camera source URL.
    #[arg(long)]
    camera: Option<String>,
    /// Override the known-faces directory.
    #[arg(long)]
    faces: Option<String>,
    /// Stop after this many frames (default: stream until ctrl-c).
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = SitewatchConfig::load()?;
    if let Some(db) = args.db {
        cfg.db_path = db;
    }
    if let Some(camera) = args.camera {
        cfg.camera.source = camera;
    }
    if let Some(faces) = args.faces {
        cfg.known_faces_dir = faces.into();
    }
    cfg.camera.frame_limit = args.frames;

    let known_faces = match KnownFaceSet::load_dir(&cfg.known_faces_dir, cfg.match_tolerance) {
        Ok(set) => set,
        Err(e) => {
            log::warn!("known faces unavailable ({}); all faces will be Unknown", e);
            KnownFaceSet::new(cfg.match_tolerance)
        }
    };

    let mut sink = SqliteStatusSink::open(&cfg.db_path)?;
    // Fresh session: prior records are reset once at startup, never
    // mid-stream.
    sink.clear()?;

    let api_handle = StatusApiServer::new(StatusApiConfig {
        addr: cfg.api_addr.clone(),
        db_path: cfg.db_path.clone(),
    })
    .spawn()?;
    log::info!("status api listening on {}", api_handle.addr);

    let mut source = CameraSource::new(cfg.camera.clone())?;
    source.connect()?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_handler = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_handler.store(true, Ordering::SeqCst);
    })?;

    // The in-tree daemon runs the scripted (quiet) detector backends; real
    // model backends plug in through the same traits.
    let mut objects = ScriptedObjectDetector::empty();
    objects.warm_up()?;
    let ctx = PipelineContext {
        source: Box::new(source),
        objects: Box::new(objects),
        faces: Box::new(ScriptedFaceRecognizer::empty()),
        credentials: Box::new(ScriptedCredentialReader::empty()),
        known_faces,
        sink: Box::new(sink),
    };
    let mut pipeline = FramePipeline::new(ctx).with_shutdown_flag(shutdown);

    log::info!(
        "sitewatchd running. camera={} db={}",
        cfg.camera.source,
        cfg.db_path
    );

    let frame_interval = Duration::from_millis(1000 / u64::from(cfg.camera.target_fps.max(1)));
    let mut last_health_log = Instant::now();
    let mut bytes_emitted = 0u64;

    while let Some(encoded) = pipeline.next() {
        bytes_emitted += encoded.len() as u64;

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            log::info!(
                "frames={} verdicts={} camera_healthy={} emitted~{} KB",
                pipeline.frames_processed(),
                pipeline.verdicts_logged(),
                pipeline.source().is_healthy(),
                bytes_emitted / 1024
            );
            last_health_log = Instant::now();
        }

        std::thread::sleep(frame_interval);
    }

    log::info!(
        "stream closed after {} frames, {} verdicts logged",
        pipeline.frames_processed(),
        pipeline.verdicts_logged()
    );
    api_handle.stop()?;
    Ok(())
}
