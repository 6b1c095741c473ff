use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs::File, io::BufReader, path::Path};

use crate::{ChatResult, Error};

/// Top level configuration consumed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub transcript: TranscriptConfig,

    #[serde(default)]
    pub turns: TurnConfig,
}

/// Controls which utterances survive parsing and how they are classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptConfig {
    /// Speaker codes whose utterances are dropped entirely.
    #[serde(default = "default_speaker_ignore")]
    pub speaker_ignore: BTreeSet<String>,

    /// When non-empty, only utterances starting on these source lines are kept.
    #[serde(default)]
    pub line_filter: BTreeSet<usize>,

    /// Keep only utterances addressed to the target child (or to both).
    #[serde(default)]
    pub child_directed_only: bool,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            speaker_ignore: default_speaker_ignore(),
            line_filter: BTreeSet::new(),
            child_directed_only: false,
            classifier: ClassifierConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    /// Count a copula or auxiliary standing on its own as a verb.
    #[serde(default)]
    pub count_copula_and_auxiliary: bool,

    /// Collapse auxiliary/light-verb constructions onto their head verb.
    #[serde(default = "default_true")]
    pub process_light_verbs: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            count_copula_and_auxiliary: false,
            process_light_verbs: default_true(),
        }
    }
}

/// Turn segmentation tolerances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnConfig {
    #[serde(default = "default_child_speaker")]
    pub child_speaker: String,

    /// Pseudo-speaker used for coding lines; never owns a turn.
    #[serde(default = "default_code_speaker")]
    pub code_speaker: String,

    /// Silence (ms) between two bulleted utterances that closes a turn.
    #[serde(default = "default_max_gap_ms")]
    pub max_gap_ms: u64,

    #[serde(default = "default_cds_max_child_interventions")]
    pub cds_max_child_interventions: usize,

    #[serde(default = "default_max_other_interventions")]
    pub cds_max_other_interventions: usize,

    #[serde(default = "default_max_other_interventions")]
    pub ads_max_other_interventions: usize,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            child_speaker: default_child_speaker(),
            code_speaker: default_code_speaker(),
            max_gap_ms: default_max_gap_ms(),
            cds_max_child_interventions: default_cds_max_child_interventions(),
            cds_max_other_interventions: default_max_other_interventions(),
            ads_max_other_interventions: default_max_other_interventions(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ChatResult<Self> {
        from_file(path)
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> ChatResult<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> ChatResult<T> {
    serde_json::from_str(s).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}

fn default_speaker_ignore() -> BTreeSet<String> {
    BTreeSet::from(["SIL".to_string()])
}
fn default_true() -> bool {
    true
}
fn default_child_speaker() -> String {
    "CHI".to_string()
}
fn default_code_speaker() -> String {
    "COD".to_string()
}
fn default_max_gap_ms() -> u64 {
    5000
}
fn default_cds_max_child_interventions() -> usize {
    1
}
fn default_max_other_interventions() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: AnalysisConfig = from_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert!(config.transcript.speaker_ignore.contains("SIL"));
        assert!(config.transcript.classifier.process_light_verbs);
        assert_eq!(config.turns.max_gap_ms, 5000);
        assert_eq!(config.turns.cds_max_child_interventions, 1);
        assert_eq!(config.turns.ads_max_other_interventions, 3);
    }

    #[test]
    fn test_partial_override() {
        let config: AnalysisConfig = from_str(
            r#"{
                "transcript": { "child_directed_only": true, "classifier": { "count_copula_and_auxiliary": true } },
                "turns": { "max_gap_ms": 2000 }
            }"#,
        )
        .unwrap();
        assert!(config.transcript.child_directed_only);
        assert!(config.transcript.classifier.count_copula_and_auxiliary);
        assert!(config.transcript.classifier.process_light_verbs);
        assert_eq!(config.turns.max_gap_ms, 2000);
        assert_eq!(config.turns.child_speaker, "CHI");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "transcript": {{ "line_filter": [3, 7] }} }}"#).unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.transcript.line_filter, BTreeSet::from([3, 7]));
    }

    #[test]
    fn test_missing_file() {
        let result = AnalysisConfig::from_file("/nonexistent/chatfile.json");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_malformed_file() {
        assert!(matches!(
            from_str::<AnalysisConfig>("{ not json"),
            Err(Error::Config(_))
        ));
    }
}
