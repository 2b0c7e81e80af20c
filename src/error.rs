use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sprite generation.
#[derive(Error, Diagnostic, Debug)]
pub enum SpriteError {
    #[error("Palette error for genre '{genre}': {message}")]
    #[diagnostic(
        code(sprite_forge::palette),
        help("Known genres: fantasy, scifi, horror, cyberpunk, postapoc")
    )]
    Palette { genre: String, message: String },

    #[error("Failed to rasterize {shape}: {message}")]
    #[diagnostic(code(sprite_forge::raster))]
    Raster { shape: String, message: String },

    #[error("Invalid composite request: {message}")]
    #[diagnostic(code(sprite_forge::composite))]
    InvalidComposite {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid sprite request: {message}")]
    #[diagnostic(code(sprite_forge::request))]
    InvalidRequest {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(sprite_forge::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(sprite_forge::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },
}

impl SpriteError {
    /// Shorthand for a rasterizer failure.
    pub fn raster(shape: impl std::fmt::Display, message: impl Into<String>) -> Self {
        SpriteError::Raster {
            shape: shape.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error aborts a whole generation (as opposed to a skipped part).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SpriteError::Raster { .. })
    }
}

pub type Result<T> = std::result::Result<T, SpriteError>;
