use crate::restriction_enzyme::RestrictionEnzyme;
use anyhow::{anyhow, Result};
use std::fs;
use tracing::warn;

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// Named restriction enzymes plus the plain motifs scanned when no enzyme is selected.
#[derive(Clone, Debug)]
pub struct RestrictionData {
    restriction_enzymes: Vec<RestrictionEnzyme>,
    simplified_motifs: Vec<String>,
}

impl RestrictionData {
    pub fn from_json_text(json_text: &str) -> Result<Self> {
        let res: serde_json::Value = serde_json::from_str(json_text)?;
        let arr = res
            .as_array()
            .ok_or(anyhow!("Enzymes file is not a JSON array"))?;
        let mut enzymes = vec![];
        let mut motifs = vec![];
        for row in arr {
            match row.get("type").and_then(|t| t.as_str()) {
                Some("restriction") => {
                    let re: RestrictionEnzyme = serde_json::from_value(row.clone())
                        .map_err(|e| anyhow!("Bad restriction enzyme {row}: {e}"))?;
                    enzymes.push(re);
                }
                Some("motif") => {
                    let motif = row
                        .get("sequence")
                        .and_then(|s| s.as_str())
                        .ok_or(anyhow!("Motif without sequence: {row}"))?;
                    motifs.push(motif.to_string());
                }
                Some(other) => return Err(anyhow!("Unknown enzyme type '{other}' in {row}")),
                None => return Err(anyhow!("Missing enzyme type for {row}")),
            }
        }
        Ok(Self::from_parts(enzymes, motifs))
    }

    pub fn from_parts(enzymes: Vec<RestrictionEnzyme>, motifs: Vec<String>) -> Self {
        let mut ret = Self {
            restriction_enzymes: enzymes,
            simplified_motifs: motifs
                .into_iter()
                .map(|m| m.trim().to_ascii_uppercase())
                .filter(|m| !m.is_empty())
                .collect(),
        };
        ret.restriction_enzymes
            .iter_mut()
            .for_each(|re| re.check_palindromic());
        ret
    }

    pub fn load_from_path(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("Could not read enzyme file '{path}': {e}"))?;
        Self::from_json_text(&text)
    }

    pub fn restriction_enzymes(&self) -> &[RestrictionEnzyme] {
        &self.restriction_enzymes
    }

    pub fn simplified_motifs(&self) -> &[String] {
        &self.simplified_motifs
    }

    pub fn get(&self, name: &str) -> Option<&RestrictionEnzyme> {
        self.restriction_enzymes
            .iter()
            .find(|re| re.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Enzymes matching `names`, in registry order. Unknown names are logged and skipped.
    pub fn restriction_enzymes_by_name<S: AsRef<str>>(&self, names: &[S]) -> Vec<&RestrictionEnzyme> {
        for name in names {
            if self.get(name.as_ref()).is_none() {
                warn!(enzyme = name.as_ref(), "unknown restriction enzyme ignored");
            }
        }
        self.restriction_enzymes
            .iter()
            .filter(|re| {
                names
                    .iter()
                    .any(|n| re.name.eq_ignore_ascii_case(n.as_ref().trim()))
            })
            .collect()
    }

    /// Name of the first enzyme recognising `motif` on either strand.
    pub fn enzyme_for_motif(&self, motif: &str) -> Option<&str> {
        self.restriction_enzymes
            .iter()
            .find(|re| re.motifs().iter().any(|(m, _)| m.eq_ignore_ascii_case(motif)))
            .map(|re| re.name.as_str())
    }
}

impl Default for RestrictionData {
    fn default() -> Self {
        Self::from_json_text(BUILTIN_ENZYMES_JSON).expect("Builtin enzyme registry is invalid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let data = RestrictionData::default();
        assert!(data.get("EcoRI").is_some());
        assert!(data.get("bsai").is_some());
        assert!(!data.get("AvaI").unwrap().is_literal());
        assert!(data.simplified_motifs().contains(&"GAATTC".to_string()));
    }

    #[test]
    fn test_by_name_keeps_registry_order() {
        let data = RestrictionData::default();
        let selected = data.restriction_enzymes_by_name(&["BsaI", "ecori", "NoSuchEnzyme"]);
        let names: Vec<&str> = selected.iter().map(|re| re.name.as_str()).collect();
        assert_eq!(names, vec!["EcoRI", "BsaI"]);
    }

    #[test]
    fn test_enzyme_for_motif() {
        let data = RestrictionData::default();
        assert_eq!(data.enzyme_for_motif("GAATTC"), Some("EcoRI"));
        assert_eq!(data.enzyme_for_motif("GAGACC"), Some("BsaI"));
        assert_eq!(data.enzyme_for_motif("ACGTACGT"), None);
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = RestrictionData::from_json_text(r#"[{"type":"protease","name":"x"}]"#).unwrap_err();
        assert!(err.to_string().contains("protease"));
        assert!(RestrictionData::from_json_text(r#"{"type":"motif"}"#).is_err());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enzymes.json");
        fs::write(
            &path,
            r#"[{"type":"restriction","name":"NdeI","sequence":"catatg","cut":2,"overlap":2},{"type":"motif","sequence":"ttaa"}]"#,
        )
        .unwrap();
        let data = RestrictionData::load_from_path(path.to_str().unwrap()).unwrap();
        assert_eq!(data.get("NdeI").unwrap().sequence, "CATATG");
        assert!(data.get("NdeI").unwrap().is_palindromic());
        assert_eq!(data.simplified_motifs(), ["TTAA"]);
    }
}
