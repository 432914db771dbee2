//! Audio analysis job payload and result types

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Identity of one logical analysis job (monotonic per controller, starts at 1)
pub type JobId = u64;

/// What the remote engine should produce from the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Summarize the meeting and extract action items
    #[default]
    Summary,
    /// Return a cleaned-up transcript
    Proofread,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Proofread => "proofread",
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "proofread" => Ok(Self::Proofread),
            other => Err(format!("Unknown mode '{}'. Expected one of: summary, proofread", other)),
        }
    }
}

/// Summary length; only meaningful in [`AnalysisMode::Summary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLevel {
    Short,
    #[default]
    Standard,
    Long,
}

impl SummaryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Standard => "standard",
            Self::Long => "long",
        }
    }
}

impl std::fmt::Display for SummaryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SummaryLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "standard" => Ok(Self::Standard),
            "long" => Ok(Self::Long),
            other => Err(format!(
                "Unknown summary level '{}'. Expected one of: short, standard, long",
                other
            )),
        }
    }
}

/// Binary audio payload picked by the user
#[derive(Clone, PartialEq)]
pub struct AudioInput {
    /// File name sent with the multipart part
    pub file_name: String,

    /// Explicit MIME type; inferred from the extension when `None`
    pub mime_type: Option<String>,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl AudioInput {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    /// Read an audio file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "AudioInput::from_path: called");
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type to send, guessed from the file name when not set
    pub fn mime_type(&self) -> String {
        match &self.mime_type {
            Some(mime) => mime.clone(),
            None => mime_guess::from_path(&self.file_name).first_or_octet_stream().to_string(),
        }
    }
}

// Payloads can be hundreds of MB; never dump them into logs.
impl std::fmt::Debug for AudioInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioInput")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type())
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the gateway needs to run one analysis
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub audio: AudioInput,
    pub mode: AnalysisMode,
    pub summary_level: SummaryLevel,
}

/// Wire response from the analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub filename: String,
    pub transcription: String,
    pub summary: String,
    #[serde(default)]
    pub action_items: Vec<String>,
}

/// Result of a succeeded job as exposed to the UI (read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub transcript: String,
    pub summary: String,
    pub action_items: Vec<String>,
}

impl From<AnalysisResponse> for AnalysisResult {
    fn from(response: AnalysisResponse) -> Self {
        Self {
            transcript: response.transcription,
            summary: response.summary,
            action_items: response.action_items,
        }
    }
}
