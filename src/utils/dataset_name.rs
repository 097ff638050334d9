use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Physical,
    Biogeochemical,
}

impl Domain {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "phy" | "physical" => Some(Domain::Physical),
            "bgc" | "biogeochemical" => Some(Domain::Biogeochemical),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Domain::Physical => "phy",
            Domain::Biogeochemical => "bgc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Domain::Physical => "Physical",
            Domain::Biogeochemical => "Biogeochemical",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Identity encoded in a dataset directory name:
/// `{sequence}_{domain}_{source}-{qc_policy}`, e.g. `2_bgc_argo-qc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetName {
    pub sequence: u32,
    pub domain: Domain,
    pub source: String,
    pub qc_policy: String,
}

impl DatasetName {
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = || {
            ProcessingError::InvalidFormat(format!(
                "Invalid dataset name: '{}'. Expected format: '{{sequence}}_{{domain}}_{{source}}-{{qc-policy}}'",
                name
            ))
        };

        let (sequence, rest) = name.split_once('_').ok_or_else(invalid)?;
        let (domain, rest) = rest.split_once('_').ok_or_else(invalid)?;
        let (source, qc_policy) = rest.rsplit_once('-').ok_or_else(invalid)?;

        let sequence = sequence.parse::<u32>().map_err(|_| invalid())?;
        let domain = Domain::from_code(domain).ok_or_else(invalid)?;
        if source.is_empty() || qc_policy.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            sequence,
            domain,
            source: source.to_string(),
            qc_policy: qc_policy.to_string(),
        })
    }

    /// Parse the final component of a dataset path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("No dataset name in {}", path.display()))
            })?;
        Self::parse(name)
    }
}

impl std::fmt::Display for DatasetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}-{}",
            self.sequence,
            self.domain.code(),
            self.source,
            self.qc_policy
        )
    }
}
