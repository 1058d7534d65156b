//! Render instructions.

use serde::{Deserialize, Serialize};

/// One visual element, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Error { message: String },
    Warning { message: String },
    Success { message: String },
    Info { message: String },
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Download {
        label: String,
        file_name: String,
        mime: String,
        data: String,
    },
    /// Collapsible panel, closed by default
    Expander {
        title: String,
        heading: String,
        items: Vec<String>,
        callout: Option<String>,
    },
    /// Progress bar value in 0..=100
    Progress { value: u8 },
    Caption { text: String },
    Metric { label: String, value: String },
}

/// Ordered list of blocks produced by one handler call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Render {
    pub blocks: Vec<Block>,
}

impl Render {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn error(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(Block::Error { message: message.into() })
    }

    pub fn warning(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(Block::Warning { message: message.into() })
    }

    pub fn success(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(Block::Success { message: message.into() })
    }

    pub fn info(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(Block::Info { message: message.into() })
    }

    /// True if any block is an error.
    pub fn has_error(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, Block::Error { .. }))
    }

    /// The download block, if present.
    pub fn download(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| matches!(b, Block::Download { .. }))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Format a percentage with two decimals, e.g. `87.50%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}
