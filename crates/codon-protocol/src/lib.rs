//! Machine-readable contracts shared by the optimizer library and its command line.

use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

pub const PROTOCOL_VERSION: &str = "v1";
pub const DEFAULT_END_LENGTH: usize = 24;
pub const MIN_END_LENGTH: usize = 12;
pub const MAX_END_LENGTH: usize = 60;

fn default_end_length() -> usize {
    DEFAULT_END_LENGTH
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// DNA or protein, optionally with a single `>` header line.
    pub sequence: String,
    #[serde(default)]
    pub remove_restriction_sites: bool,
    #[serde(default)]
    pub remove_terminators: bool,
    #[serde(default)]
    pub selected_enzymes: Option<Vec<String>>,
    #[serde(default)]
    pub optimize_ends: bool,
    #[serde(default = "default_end_length")]
    pub end_length: usize,
}

impl OptimizationRequest {
    pub fn new(sequence: &str) -> Self {
        Self {
            sequence: sequence.to_string(),
            remove_restriction_sites: false,
            remove_terminators: false,
            selected_enzymes: None,
            optimize_ends: false,
            end_length: DEFAULT_END_LENGTH,
        }
    }

    pub fn end_length_in_domain(&self) -> bool {
        (MIN_END_LENGTH..=MAX_END_LENGTH).contains(&self.end_length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Dna,
    Protein,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodonChange {
    /// 1-based codon number.
    pub position: usize,
    pub original: String,
    pub optimized: String,
    pub amino_acid: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub input_kind: InputKind,
    pub sequence_name: Option<String>,
    pub organism: String,
    /// Empty for protein input.
    pub original_sequence: String,
    pub optimized_sequence: String,
    pub final_sequence: String,
    pub protein_sequence: String,
    pub original_cai: f64,
    pub optimized_cai: f64,
    pub final_cai: f64,
    pub original_gc: f64,
    pub final_gc: f64,
    pub restriction_sites_found: usize,
    pub restriction_sites_removed: usize,
    pub enzymes_cleared: Vec<String>,
    pub terminators_found: usize,
    pub terminators_removed: usize,
    pub codon_changes: Vec<CodonChange>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidInput,
    SearchExhausted,
    NotFound,
    Io,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineError {
    pub code: ErrorCode,
    pub message: String,
}

impl EngineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for EngineError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub protocol_version: String,
    pub supported_commands: Vec<String>,
    pub organisms: Vec<String>,
    pub deterministic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: OptimizationRequest =
            serde_json::from_str(r#"{"sequence":"MKV"}"#).unwrap();
        assert_eq!(request, OptimizationRequest::new("MKV"));
        assert_eq!(request.end_length, 24);
        assert!(request.end_length_in_domain());
    }

    #[test]
    fn test_end_length_domain() {
        let mut request = OptimizationRequest::new("ATG");
        request.end_length = 11;
        assert!(!request.end_length_in_domain());
        request.end_length = 60;
        assert!(request.end_length_in_domain());
        request.end_length = 61;
        assert!(!request.end_length_in_domain());
    }

    #[test]
    fn test_input_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&InputKind::Protein).unwrap(), "\"protein\"");
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::new(ErrorCode::SearchExhausted, "EcoRI at 12");
        assert_eq!(err.to_string(), "SearchExhausted: EcoRI at 12");
    }
}
