use codon_protocol::{EngineError, ErrorCode};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum OptimizerError {
    EmptySequence,
    InvalidFasta(String),
    InvalidLength {
        length: usize,
    },
    SequenceTooShort {
        codons: usize,
    },
    UnknownCodon {
        codon: String,
        position: usize,
    },
    UnknownAminoAcid {
        residue: char,
        position: usize,
    },
    InvalidEndLength {
        value: usize,
    },
    InvalidCodonTable(String),
    SiteNotRemovable {
        enzyme: String,
        motif: String,
        position: usize,
    },
    SiteRemovalExhausted {
        iterations: usize,
        remaining: usize,
    },
    TerminatorNotRemovable {
        position: usize,
    },
    TerminatorRemovalExhausted {
        iterations: usize,
        remaining: usize,
    },
    ProteinChanged {
        expected: String,
        found: String,
    },
}

impl OptimizerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SiteNotRemovable { .. }
            | Self::SiteRemovalExhausted { .. }
            | Self::TerminatorNotRemovable { .. }
            | Self::TerminatorRemovalExhausted { .. } => ErrorCode::SearchExhausted,
            Self::ProteinChanged { .. } => ErrorCode::Internal,
            _ => ErrorCode::InvalidInput,
        }
    }
}

impl fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "Sequence is empty"),
            Self::InvalidFasta(message) => write!(f, "Could not read FASTA record: {message}"),
            Self::InvalidLength { length } => write!(
                f,
                "Sequence length {length} is not a multiple of 3"
            ),
            Self::SequenceTooShort { codons } => write!(
                f,
                "Sequence has {codons} codon(s), at least 2 are required for scoring"
            ),
            Self::UnknownCodon { codon, position } => {
                write!(f, "Unknown codon '{codon}' at codon {}", position + 1)
            }
            Self::UnknownAminoAcid { residue, position } => write!(
                f,
                "Unknown amino acid '{residue}' at residue {}",
                position + 1
            ),
            Self::InvalidEndLength { value } => write!(
                f,
                "End length {value} is outside {}..={}",
                codon_protocol::MIN_END_LENGTH,
                codon_protocol::MAX_END_LENGTH
            ),
            Self::InvalidCodonTable(message) => write!(f, "Invalid codon usage table: {message}"),
            Self::SiteNotRemovable {
                enzyme,
                motif,
                position,
            } => write!(
                f,
                "Could not remove {enzyme} site {motif} at position {}",
                position + 1
            ),
            Self::SiteRemovalExhausted {
                iterations,
                remaining,
            } => write!(
                f,
                "Restriction site removal stopped after {iterations} iterations with {remaining} site(s) left"
            ),
            Self::TerminatorNotRemovable { position } => write!(
                f,
                "Could not remove terminator at position {}",
                position + 1
            ),
            Self::TerminatorRemovalExhausted {
                iterations,
                remaining,
            } => write!(
                f,
                "Terminator removal stopped after {iterations} iterations with {remaining} terminator(s) left"
            ),
            Self::ProteinChanged { expected, found } => write!(
                f,
                "Protein sequence changed during optimization: expected {expected}, found {found}"
            ),
        }
    }
}

impl Error for OptimizerError {}

impl From<OptimizerError> for EngineError {
    fn from(err: OptimizerError) -> Self {
        EngineError::new(err.code(), err.to_string())
    }
}
