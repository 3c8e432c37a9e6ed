use crate::iupac_code::IupacCode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    /// Recognition site, top strand 5'->3'.
    pub sequence: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Top-strand cut offset from the start of the site.
    #[serde(default)]
    pub cut: isize,
    /// Overhang length; negative for 3' overhangs.
    #[serde(default)]
    pub overlap: isize,
    #[serde(skip_serializing, default)]
    is_palindromic: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    Reverse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RestrictionSite {
    pub enzyme: String,
    /// The literal text matched on the forward strand.
    pub motif: String,
    pub position: usize,
    /// Exclusive end.
    pub end: usize,
    pub strand: Strand,
}

impl RestrictionEnzyme {
    pub fn new(name: &str, sequence: &str, cut: isize, overlap: isize) -> Self {
        let mut ret = Self {
            name: name.to_string(),
            sequence: sequence.to_ascii_uppercase(),
            note: None,
            cut,
            overlap,
            is_palindromic: false,
        };
        ret.check_palindromic();
        ret
    }

    pub fn check_palindromic(&mut self) {
        self.sequence = self.sequence.to_ascii_uppercase();
        self.is_palindromic = self.sequence == IupacCode::reverse_complement(&self.sequence);
    }

    pub fn is_palindromic(&self) -> bool {
        self.is_palindromic
    }

    /// Degenerate sites (IUPAC ambiguity letters) are never scanned.
    pub fn is_literal(&self) -> bool {
        IupacCode::is_literal(&self.sequence)
    }

    /// Forward-strand texts that mean this site is present.
    pub fn motifs(&self) -> Vec<(String, Strand)> {
        let mut ret = vec![(self.sequence.clone(), Strand::Forward)];
        if !self.is_palindromic {
            ret.push((IupacCode::reverse_complement(&self.sequence), Strand::Reverse));
        }
        ret
    }

    pub fn get_sites(&self, sequence: &[u8]) -> Vec<RestrictionSite> {
        if !self.is_literal() {
            return vec![];
        }
        self.motifs()
            .into_iter()
            .flat_map(|(motif, strand)| {
                find_motif(sequence, motif.as_bytes())
                    .into_iter()
                    .map(move |position| RestrictionSite {
                        enzyme: self.name.clone(),
                        position,
                        end: position + motif.len(),
                        motif: motif.clone(),
                        strand,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Start offsets of every case-insensitive occurrence of `motif`, overlaps included.
pub fn find_motif(sequence: &[u8], motif: &[u8]) -> Vec<usize> {
    if motif.is_empty() || motif.len() > sequence.len() {
        return vec![];
    }
    sequence
        .windows(motif.len())
        .enumerate()
        .filter(|(_, window)| window.eq_ignore_ascii_case(motif))
        .map(|(start, _)| start)
        .collect()
}

/// True when `motif` occurs at exactly `position`.
#[inline(always)]
pub fn motif_at(sequence: &[u8], motif: &[u8], position: usize) -> bool {
    sequence
        .get(position..position + motif.len())
        .is_some_and(|window| window.eq_ignore_ascii_case(motif))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palindromic_site() {
        let re = RestrictionEnzyme::new("EcoRI", "gaattc", 1, 4);
        assert!(re.is_palindromic());
        assert_eq!(re.motifs(), vec![("GAATTC".to_string(), Strand::Forward)]);
        let sites = re.get_sites(b"GAATTCGAATTC");
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].position, 0);
        assert_eq!(sites[1].position, 6);
        assert_eq!(sites[1].end, 12);
        assert_eq!(sites[0].strand, Strand::Forward);
    }

    #[test]
    fn test_reverse_strand_site() {
        let re = RestrictionEnzyme::new("BsaI", "GGTCTC", 7, 4);
        assert!(!re.is_palindromic());
        let sites = re.get_sites(b"AAGAGACCAAGGTCTCAA");
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].motif, "GGTCTC");
        assert_eq!(sites[0].position, 10);
        assert_eq!(sites[1].motif, "GAGACC");
        assert_eq!(sites[1].position, 2);
        assert_eq!(sites[1].strand, Strand::Reverse);
    }

    #[test]
    fn test_degenerate_site_skipped() {
        let re = RestrictionEnzyme::new("AvaI", "CYCGRG", 1, 4);
        assert!(!re.is_literal());
        assert!(re.get_sites(b"CCCGGGCTCGAG").is_empty());
    }

    #[test]
    fn test_find_motif() {
        assert_eq!(find_motif(b"AAAA", b"AA"), vec![0, 1, 2]);
        assert_eq!(find_motif(b"acgt", b"CG"), vec![1]);
        assert!(find_motif(b"AC", b"ACG").is_empty());
        assert!(motif_at(b"TTGAATTC", b"GAATTC", 2));
        assert!(!motif_at(b"TTGAATTC", b"GAATTC", 3));
    }
}
