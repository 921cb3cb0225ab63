use crate::error::ArtifactError;
use crate::graph::Graph;
use crate::validate::RuleReport;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A captured flatten-and-validate pass, ready for export or inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedArtifact {
    pub graph: Graph,
    pub reports: Vec<RuleReport>,
}

/// Node `data` is schemaless JSON and bincode is not self-describing, so the
/// graph travels as a JSON string inside the bincode envelope.
#[derive(Serialize, Deserialize)]
struct ArtifactWire {
    graph: String,
    reports: Vec<RuleReport>,
}

impl FlattenedArtifact {
    pub fn new(graph: Graph, reports: Vec<RuleReport>) -> Self {
        Self { graph, reports }
    }

    /// Saves the artifact to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Loads an artifact from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        let wire = ArtifactWire {
            graph: serde_json::to_string(&self.graph)
                .map_err(|e| ArtifactError::Codec(format!("graph serialization failed: {}", e)))?,
            reports: self.reports.clone(),
        };
        encode_to_vec(&wire, standard())
            .map_err(|e| ArtifactError::Codec(format!("artifact encoding failed: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let (wire, _): (ArtifactWire, usize) = decode_from_slice(bytes, standard())
            .map_err(|e| ArtifactError::Codec(format!("artifact decoding failed: {}", e)))?;
        let graph: Graph = serde_json::from_str(&wire.graph)
            .map_err(|e| ArtifactError::Codec(format!("graph deserialization failed: {}", e)))?;
        Ok(Self {
            graph,
            reports: wire.reports,
        })
    }
}
