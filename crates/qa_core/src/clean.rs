use serde::Deserialize;

/// Punctuation kept by [`CleanConfig::restricted`].
pub const DEFAULT_ALLOWED_PUNCTUATION: [char; 2] = ['.', ','];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Lowercase the text and drop every character that is not an ASCII
    /// alphanumeric, whitespace, or listed in `allowed_punctuation`.
    ///
    /// This is lossy: dropped characters cannot be recovered.
    pub restrict_charset: bool,
    pub allowed_punctuation: Vec<char>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self::whitespace_only()
    }
}

impl CleanConfig {
    pub fn whitespace_only() -> Self {
        Self {
            restrict_charset: false,
            allowed_punctuation: DEFAULT_ALLOWED_PUNCTUATION.to_vec(),
        }
    }

    pub fn restricted() -> Self {
        Self {
            restrict_charset: true,
            allowed_punctuation: DEFAULT_ALLOWED_PUNCTUATION.to_vec(),
        }
    }
}

/// Pure text normalizer.
///
/// For a fixed configuration `clean(clean(x)) == clean(x)`.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleanConfig,
}

impl Cleaner {
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    pub fn clean(&self, text: &str) -> String {
        if !self.config.restrict_charset {
            return normalize_whitespace(text);
        }
        let restricted: String = text
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| self.is_allowed(*c))
            .collect();
        normalize_whitespace(&restricted)
    }

    fn is_allowed(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || c.is_whitespace() || self.config.allowed_punctuation.contains(&c)
    }
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
