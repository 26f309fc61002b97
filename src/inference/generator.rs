//! Generation: instruction template and bounded decode loop.
//!
//! A `Generator` owns the loaded model and exposes the one blocking
//! operation the UI needs: wrap the user's request in the fixed
//! CodeLlama instruction template, decode up to `max_tokens`, stop at the
//! end-of-sequence token, and return the trimmed result as one string.

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::inference::llama::{ContextParams, LlamaError, LlamaModel, ModelParams};
use crate::inference::loader::{self, LoaderError};

/// Fixed system directive forcing C-only output.
pub const SYSTEM_PROMPT: &str = "You are a C code generation expert. Your sole purpose is to \
write a complete, correct, and clean C program based on the user's request. You MUST NOT \
provide any explanation, commentary, or text outside of the final C code block. Your entire \
response must be valid C code.";

/// Stop sequence ending generation.
pub const STOP_TOKEN: &str = "</s>";

/// Build the full instruction-wrapped prompt from the user's request.
pub fn build_prompt(user_request: &str) -> String {
    format!("<s>[INST] {SYSTEM_PROMPT}\n\nUser request: {user_request} [/INST]\n")
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Llama(#[from] LlamaError),
}

impl LoadError {
    /// Message shown in the fatal startup dialog.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Loader(LoaderError::FileNotFound(_)) => self.to_string(),
            other => format!("An error occurred while loading the AI model: {other}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("prompt is too long: {tokens} tokens exceeds the {limit}-token context")]
    PromptTooLong { tokens: usize, limit: u32 },

    #[error(transparent)]
    Llama(#[from] LlamaError),
}

/// The loaded inference capability.
///
/// Created once at startup on a background thread, then shared read-only
/// (`Arc`) with each generation worker. Each request gets a fresh llama
/// context, so `generate` needs only `&self`.
#[derive(Debug)]
pub struct Generator {
    model: LlamaModel,
    n_ctx: u32,
    n_threads: u32,
    max_tokens: usize,
}

impl Generator {
    /// Resolve, validate and load the model described by `config`.
    pub fn load(config: &Config) -> Result<Self, LoadError> {
        let path = loader::resolve_model_path(&config.model)?;
        loader::validate_model(&path)?;

        let model = LlamaModel::load(
            &path,
            ModelParams {
                n_gpu_layers: config.model.n_gpu_layers,
                use_mmap: true,
            },
        )?;

        info!(
            path = %path.display(),
            context_size = config.model.context_size,
            max_tokens = config.generation.max_tokens,
            "Model loaded"
        );

        Ok(Self {
            model,
            n_ctx: config.model.context_size,
            n_threads: std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .unwrap_or(4),
            max_tokens: config.generation.max_tokens,
        })
    }

    /// Generate C source for one user request. Blocks until done.
    pub fn generate(&self, user_request: &str) -> Result<String, GenerateError> {
        let prompt = build_prompt(user_request);
        let tokens = self.model.tokenize(&prompt, true)?;

        debug!(prompt_tokens = tokens.len(), "Starting generation");

        if tokens.len() as u32 >= self.n_ctx {
            return Err(GenerateError::PromptTooLong {
                tokens: tokens.len(),
                limit: self.n_ctx,
            });
        }

        let mut ctx = self.model.new_context(ContextParams {
            n_ctx: self.n_ctx,
            n_threads: self.n_threads,
        })?;
        ctx.decode(&tokens)?;

        let mut output = String::new();
        let mut generated = 0;
        while generated < self.max_tokens && (ctx.pos as u32) < self.n_ctx {
            let token = ctx.sample()?;
            if self.model.is_eog_token(token) {
                break;
            }
            output.push_str(&self.model.token_piece(token));
            ctx.decode(&[token])?;
            generated += 1;
        }

        info!(
            prompt_tokens = tokens.len(),
            completion_tokens = generated,
            "Generation complete"
        );

        Ok(output.trim().to_string())
    }
}
