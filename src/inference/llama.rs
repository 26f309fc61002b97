//! llama.cpp-style model and context handles.
//!
//! This module mirrors the shape of the llama.cpp C API: a model handle
//! loaded from a GGUF file, and per-request contexts that decode token
//! batches and sample one token at a time.
//!
//! The current implementation is a mock/stub that simulates llama.cpp
//! behavior, so the application and its tests run without the native
//! library. Swapping in real bindings only touches this file.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlamaError {
    #[error("Failed to load model: {0}")]
    ModelLoadFailed(String),

    #[error("Tokenization failed: {0}")]
    TokenizeFailed(String),

    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Context creation failed: {0}")]
    ContextFailed(String),
}

/// Token ID type.
pub type TokenId = i32;

/// End-of-sequence token ID.
pub const EOS_TOKEN: TokenId = 2;

/// Model parameters (mirrors llama_model_params).
#[derive(Debug, Clone)]
pub struct ModelParams {
    /// Number of GPU layers to offload (-1 = all).
    pub n_gpu_layers: i32,

    /// Use memory mapping for the model file.
    pub use_mmap: bool,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            n_gpu_layers: -1,
            use_mmap: true,
        }
    }
}

/// Context parameters (mirrors llama_context_params).
#[derive(Debug, Clone)]
pub struct ContextParams {
    /// Context size in tokens.
    pub n_ctx: u32,

    /// Number of threads for computation.
    pub n_threads: u32,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            n_ctx: 4096,
            n_threads: 4,
        }
    }
}

/// Loaded model handle.
///
/// In a real implementation, this would wrap `*mut llama_model`.
#[derive(Debug)]
pub struct LlamaModel {
    /// Model file path.
    pub path: PathBuf,

    /// Vocabulary size.
    pub n_vocab: usize,

    /// Context length the model was trained with.
    pub n_ctx_train: u32,
}

/// Per-request context handle.
///
/// In a real implementation, this would wrap `*mut llama_context`.
pub struct LlamaContext {
    /// Context size.
    pub n_ctx: u32,

    /// Current token position.
    pub pos: usize,

    /// Number of tokens sampled so far.
    sampled: usize,
}

/// Token pieces emitted by the stub sampler. Joined in sequence they read
/// like a minimal C translation unit, which keeps manual runs legible.
const STUB_PIECES: &[&str] = &[
    "#include <stdio.h>\n\n",
    "int ",
    "main",
    "(void)",
    " {\n",
    "    printf(\"generated\\n\");\n",
    "    return 0;\n",
    "}\n",
];

/// Number of tokens the stub sampler emits before end-of-sequence.
const STUB_COMPLETION_TOKENS: usize = STUB_PIECES.len();

impl LlamaModel {
    /// Load a model from a GGUF file (stub).
    pub fn load(path: &Path, params: ModelParams) -> Result<Self, LlamaError> {
        // Stub: in a real implementation, calls llama_load_model_from_file.
        if path.as_os_str().is_empty() {
            return Err(LlamaError::ModelLoadFailed("empty model path".to_string()));
        }

        tracing::info!(
            path = %path.display(),
            n_gpu_layers = params.n_gpu_layers,
            "Loading model"
        );

        Ok(Self {
            path: path.to_path_buf(),
            n_vocab: 32000, // CodeLlama vocab size
            n_ctx_train: 16384,
        })
    }

    /// Create a new context for this model (stub).
    pub fn new_context(&self, params: ContextParams) -> Result<LlamaContext, LlamaError> {
        if params.n_ctx == 0 {
            return Err(LlamaError::ContextFailed("context size must be non-zero".to_string()));
        }
        Ok(LlamaContext {
            n_ctx: params.n_ctx,
            pos: 0,
            sampled: 0,
        })
    }

    /// Tokenize a string into token IDs (stub).
    pub fn tokenize(&self, text: &str, add_bos: bool) -> Result<Vec<TokenId>, LlamaError> {
        if text.is_empty() {
            return Err(LlamaError::TokenizeFailed("empty input".to_string()));
        }
        // Stub: produce approximately 1 token per 4 characters.
        let n_tokens = (text.len() / 4).max(1);
        let mut tokens: Vec<TokenId> = (0..n_tokens as TokenId).map(|i| 3 + i).collect();
        if add_bos {
            tokens.insert(0, 1); // BOS token
        }
        Ok(tokens)
    }

    /// Text piece for a sampled token (stub).
    pub fn token_piece(&self, token: TokenId) -> String {
        let index = (token.max(0) as usize) % STUB_PIECES.len();
        STUB_PIECES[index].to_string()
    }

    /// Whether a token ends generation.
    pub fn is_eog_token(&self, token: TokenId) -> bool {
        token == EOS_TOKEN
    }
}

impl LlamaContext {
    /// Process a batch of tokens (stub).
    ///
    /// In a real implementation, this calls llama_decode and fills the KV cache.
    pub fn decode(&mut self, tokens: &[TokenId]) -> Result<(), LlamaError> {
        if self.pos + tokens.len() > self.n_ctx as usize {
            return Err(LlamaError::DecodeFailed(format!(
                "context overflow: {} + {} tokens exceeds n_ctx {}",
                self.pos,
                tokens.len(),
                self.n_ctx
            )));
        }
        self.pos += tokens.len();
        Ok(())
    }

    /// Sample the next token (stub).
    ///
    /// Emits a fixed completion followed by end-of-sequence, so the
    /// decode loop exercises its stop condition deterministically.
    pub fn sample(&mut self) -> Result<TokenId, LlamaError> {
        if self.pos == 0 {
            return Err(LlamaError::DecodeFailed(
                "sample called before decode".to_string(),
            ));
        }
        if self.sampled >= STUB_COMPLETION_TOKENS {
            return Ok(EOS_TOKEN);
        }
        let token = self.sampled as TokenId;
        self.sampled += 1;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_model() -> LlamaModel {
        LlamaModel::load(Path::new("test.gguf"), ModelParams::default()).unwrap()
    }

    #[test]
    fn test_model_load_stub() {
        let model = stub_model();
        assert_eq!(model.n_vocab, 32000);
    }

    #[test]
    fn test_tokenize_stub() {
        let model = stub_model();
        let tokens = model.tokenize("Hello, world!", true).unwrap();
        assert!(!tokens.is_empty());
        assert_eq!(tokens[0], 1); // BOS
    }

    #[test]
    fn test_decode_tracks_position() {
        let model = stub_model();
        let mut ctx = model.new_context(ContextParams::default()).unwrap();

        ctx.decode(&[1, 2, 3]).unwrap();
        assert_eq!(ctx.pos, 3);
    }

    #[test]
    fn test_decode_rejects_context_overflow() {
        let model = stub_model();
        let mut ctx = model
            .new_context(ContextParams {
                n_ctx: 2,
                n_threads: 1,
            })
            .unwrap();

        let err = ctx.decode(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, LlamaError::DecodeFailed(_)));
    }

    #[test]
    fn test_sampler_terminates_with_eos() {
        let model = stub_model();
        let mut ctx = model.new_context(ContextParams::default()).unwrap();
        ctx.decode(&[1, 2, 3]).unwrap();

        let mut sampled = 0;
        loop {
            let token = ctx.sample().unwrap();
            if model.is_eog_token(token) {
                break;
            }
            sampled += 1;
            assert!(sampled <= STUB_COMPLETION_TOKENS, "sampler never stopped");
        }
        assert_eq!(sampled, STUB_COMPLETION_TOKENS);
    }
}
