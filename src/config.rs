//! Runtime configuration for cgen.
//!
//! Configuration can be loaded from a JSON file or constructed
//! programmatically. Defaults reproduce the stock behavior: a fixed
//! CodeLlama model file next to the executable, a 4096-token context and
//! up to 2048 generated tokens.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "cgen", about = "Offline C code generator")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "cgen.json")]
    pub config: PathBuf,

    /// Override the model file path (default: fixed filename next to the executable).
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model configuration.
    pub model: ModelConfig,

    /// Generation limits.
    pub generation: GenerationConfig,

    /// Window geometry.
    pub window: WindowConfig,
}

/// Model-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model filename, resolved against the executable's directory when
    /// no explicit path override is given.
    pub model_filename: String,

    /// Explicit model path override (takes precedence over the filename).
    pub model_path: Option<PathBuf>,

    /// Context size in tokens.
    pub context_size: u32,

    /// Number of GPU layers to offload (-1 = all).
    pub n_gpu_layers: i32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_filename: "codellama-7b-instruct.Q4_K_M.gguf".to_string(),
            model_path: None,
            context_size: 4096,
            n_gpu_layers: -1,
        }
    }
}

/// Generation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum number of generated tokens per request.
    pub max_tokens: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { max_tokens: 2048 }
    }
}

/// Window geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Initial window width in logical pixels.
    pub width: f32,

    /// Initial window height in logical pixels.
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}
