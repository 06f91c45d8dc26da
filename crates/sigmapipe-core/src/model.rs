//! Attributes, target modes, and filename derivation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single MISP attribute of type `sigma`.
///
/// The `value` holds the Sigma signature text verbatim. MISP returns
/// many more fields than we read; unknown fields are ignored and the
/// optional ones default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute ID (MISP serializes IDs as strings)
    pub id: String,

    /// The Sigma signature text
    pub value: String,

    /// Owning event ID, if present
    #[serde(default)]
    pub event_id: Option<String>,

    /// Attribute type; always `sigma` for our queries
    #[serde(rename = "type", default)]
    pub attribute_type: Option<String>,

    /// Creation timestamp as reported by MISP (epoch seconds, stringly)
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Attribute {
    pub fn new(id: &str, value: &str) -> Self {
        Self {
            id: id.to_string(),
            value: value.to_string(),
            event_id: None,
            attribute_type: None,
            timestamp: None,
        }
    }

    /// Filename the signature is stored under: `Sigma_<id>.yml`.
    ///
    /// Deterministic per id, so a re-delivered attribute overwrites
    /// its earlier file instead of accumulating duplicates.
    pub fn signature_filename(&self) -> String {
        format!("Sigma_{}.yml", self.id)
    }
}

/// Conversion target for the Sigmac converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetMode {
    /// Elastic SIEM detection rule, imported into Kibana as ndjson
    EsRule,
    /// ElastAlert rule, written to disk only
    Elastalert,
}

impl TargetMode {
    /// Value passed to sigmac's `-t` flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetMode::EsRule => "es-rule",
            TargetMode::Elastalert => "elastalert",
        }
    }

    /// Name of the rule file produced for a given signature file.
    ///
    /// es-rule output is ndjson meant for the Kibana import endpoint,
    /// so it gets the extra extension; elastalert rules keep the
    /// signature filename unchanged.
    pub fn rule_filename(&self, signature_filename: &str) -> String {
        match self {
            TargetMode::EsRule => format!("{}.ndjson", signature_filename),
            TargetMode::Elastalert => signature_filename.to_string(),
        }
    }

    /// Whether rules for this target are uploaded to the SIEM.
    pub fn uploads_to_siem(&self) -> bool {
        matches!(self, TargetMode::EsRule)
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unsupported target string. An unknown target is a
/// hard configuration error, never a silent no-op.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported target mode '{0}', expected 'es-rule' or 'elastalert'")]
pub struct UnknownTargetError(pub String);

impl FromStr for TargetMode {
    type Err = UnknownTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es-rule" => Ok(TargetMode::EsRule),
            "elastalert" => Ok(TargetMode::Elastalert),
            other => Err(UnknownTargetError(other.to_string())),
        }
    }
}
