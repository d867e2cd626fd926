use crate::header::Strides;
use std::path::PathBuf;

pub mod ants;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Outcome of a mask command, for the UI layer to present.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub output: Option<PathBuf>,
    pub strides: Option<Strides>,
    pub retained_scratch: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_strides(mut self, strides: Strides) -> Self {
        self.strides = Some(strides);
        self
    }

    pub fn with_retained_scratch(mut self, scratch: Option<PathBuf>) -> Self {
        self.retained_scratch = scratch;
        self
    }
}
