use indexmap::IndexMap;

/// One table body row: header label -> cell text, in header order.
pub type TableRow = IndexMap<String, String>;

/// A bounded span of extracted text fed to pair generation as one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub index: usize,
    pub title: Option<String>,
    pub text: String,
}

impl TextUnit {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            title: None,
            text: text.into(),
        }
    }

    pub fn titled(index: usize, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index,
            title: Some(title.into()),
            text: text.into(),
        }
    }
}
