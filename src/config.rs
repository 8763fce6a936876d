use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::faces::DEFAULT_MATCH_TOLERANCE;
use crate::ingest::CameraConfig;

const DEFAULT_DB_PATH: &str = "helmet_check.db";
const DEFAULT_KNOWN_FACES_DIR: &str = "known_faces";
const DEFAULT_API_ADDR: &str = "127.0.0.1:8790";
const DEFAULT_CAMERA_SOURCE: &str = "stub://site_gate";
const DEFAULT_CAMERA_FPS: u32 = 10;
const DEFAULT_CAMERA_WIDTH: u32 = 1280;
const DEFAULT_CAMERA_HEIGHT: u32 = 720;

#[derive(Debug, Deserialize, Default)]
struct SitewatchConfigFile {
    db_path: Option<String>,
    known_faces_dir: Option<PathBuf>,
    match_tolerance: Option<f32>,
    api: Option<ApiConfigFile>,
    camera: Option<CameraConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiConfigFile {
    addr: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    source: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SitewatchConfig {
    pub db_path: String,
    pub known_faces_dir: PathBuf,
    pub match_tolerance: f32,
    pub api_addr: String,
    pub camera: CameraConfig,
}

impl SitewatchConfig {
    /// Load from the JSON file named by `SITEWATCH_CONFIG` (if set), then
    /// apply `SITEWATCH_*` env overrides, then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SITEWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SitewatchConfigFile) -> Self {
        let db_path = file.db_path.unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let known_faces_dir = file
            .known_faces_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWN_FACES_DIR));
        let match_tolerance = file.match_tolerance.unwrap_or(DEFAULT_MATCH_TOLERANCE);
        let api_addr = file
            .api
            .and_then(|api| api.addr)
            .unwrap_or_else(|| DEFAULT_API_ADDR.to_string());
        let camera = CameraConfig {
            source: file
                .camera
                .as_ref()
                .and_then(|camera| camera.source.clone())
                .unwrap_or_else(|| DEFAULT_CAMERA_SOURCE.to_string()),
            target_fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.target_fps)
                .unwrap_or(DEFAULT_CAMERA_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
            frame_limit: None,
        };
        Self {
            db_path,
            known_faces_dir,
            match_tolerance,
            api_addr,
            camera,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("SITEWATCH_DB_PATH") {
            if !path.trim().is_empty() {
                self.db_path = path;
            }
        }
        if let Ok(dir) = std::env::var("SITEWATCH_KNOWN_FACES_DIR") {
            if !dir.trim().is_empty() {
                self.known_faces_dir = PathBuf::from(dir);
            }
        }
        if let Ok(addr) = std::env::var("SITEWATCH_API_ADDR") {
            if !addr.trim().is_empty() {
                self.api_addr = addr;
            }
        }
        if let Ok(source) = std::env::var("SITEWATCH_CAMERA_URL") {
            if !source.trim().is_empty() {
                self.camera.source = source;
            }
        }
        if let Ok(tolerance) = std::env::var("SITEWATCH_MATCH_TOLERANCE") {
            let parsed: f32 = tolerance
                .parse()
                .map_err(|_| anyhow!("SITEWATCH_MATCH_TOLERANCE must be a number"))?;
            self.match_tolerance = parsed;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera target_fps must be >= 1"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera dimensions must be nonzero"));
        }
        if !(self.match_tolerance > 0.0) {
            return Err(anyhow!("match_tolerance must be > 0"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<SitewatchConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
