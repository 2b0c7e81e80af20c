//! Thematic genres.

use serde::{Deserialize, Serialize};

/// A thematic style tag selecting template and palette variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    #[default]
    Fantasy,
    SciFi,
    Horror,
    Cyberpunk,
    PostApocalyptic,
}

impl Genre {
    /// Parse a genre id. The empty string means `Fantasy`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "fantasy" => Some(Genre::Fantasy),
            "scifi" | "sci-fi" | "science-fiction" => Some(Genre::SciFi),
            "horror" => Some(Genre::Horror),
            "cyberpunk" => Some(Genre::Cyberpunk),
            "postapoc" | "post-apocalyptic" => Some(Genre::PostApocalyptic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Fantasy => "fantasy",
            Genre::SciFi => "scifi",
            Genre::Horror => "horror",
            Genre::Cyberpunk => "cyberpunk",
            Genre::PostApocalyptic => "postapoc",
        }
    }
}
