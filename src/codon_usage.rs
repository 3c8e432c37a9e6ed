//! Codon usage reference tables and the builtin organism catalog.

use crate::{error::OptimizerError, genetic_code::translate_codon, STANDARD_CODE};
use anyhow::{anyhow, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fs,
};

const BUILTIN_CODON_USAGE_CSV: &str = include_str!("../assets/codon_usage.csv");
pub const DEFAULT_ORGANISM: &str = "Escherichia coli K-12";

const ORGANISM_ALIASES: &[(&str, &str)] = &[
    ("ecoli", "Escherichia coli K-12"),
    ("e_coli", "Escherichia coli K-12"),
    ("e. coli", "Escherichia coli K-12"),
    ("yeast", "Saccharomyces cerevisiae"),
    ("s_cerevisiae", "Saccharomyces cerevisiae"),
    ("human", "Homo sapiens"),
    ("h_sapiens", "Homo sapiens"),
];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodonInfo {
    pub amino_acid: char,
    /// Usage per thousand codons.
    pub frequency: f64,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CodonUsageTable {
    organism: String,
    codons: BTreeMap<String, CodonInfo>,
    amino_acid_groups: BTreeMap<char, Vec<String>>,
}

impl CodonUsageTable {
    /// Builds a table from codon entries. Group order follows entry order.
    pub fn from_entries<I>(organism: &str, entries: I) -> Result<Self, OptimizerError>
    where
        I: IntoIterator<Item = (String, CodonInfo)>,
    {
        let mut codons = BTreeMap::new();
        let mut amino_acid_groups: BTreeMap<char, Vec<String>> = BTreeMap::new();
        for (codon, info) in entries {
            let codon = codon.trim().to_ascii_uppercase().replace('U', "T");
            let expected = translate_codon(codon.as_bytes()).ok_or_else(|| {
                OptimizerError::InvalidCodonTable(format!("'{codon}' is not a codon"))
            })?;
            let amino_acid = info.amino_acid.to_ascii_uppercase();
            if amino_acid != expected {
                return Err(OptimizerError::InvalidCodonTable(format!(
                    "{codon} is listed as {amino_acid}, the standard code reads {expected}"
                )));
            }
            if !info.frequency.is_finite() || info.frequency < 0.0 {
                return Err(OptimizerError::InvalidCodonTable(format!(
                    "{codon} has frequency {}",
                    info.frequency
                )));
            }
            let info = CodonInfo { amino_acid, ..info };
            if codons.insert(codon.clone(), info).is_some() {
                return Err(OptimizerError::InvalidCodonTable(format!(
                    "{codon} is listed twice"
                )));
            }
            amino_acid_groups.entry(amino_acid).or_default().push(codon);
        }
        if codons.len() != STANDARD_CODE.codons().len() {
            return Err(OptimizerError::InvalidCodonTable(format!(
                "{organism} covers {} of 64 codons",
                codons.len()
            )));
        }
        Ok(Self {
            organism: organism.to_string(),
            codons,
            amino_acid_groups,
        })
    }

    /// Builds a table over the standard code in TCAG order from a frequency function.
    pub fn from_frequencies<F>(organism: &str, frequency: F) -> Result<Self, OptimizerError>
    where
        F: Fn(&str, char) -> f64,
    {
        let entries = STANDARD_CODE.codons().iter().map(|(codon, aa)| {
            let frequency = frequency(codon, *aa);
            (
                codon.clone(),
                CodonInfo {
                    amino_acid: *aa,
                    frequency,
                    count: frequency.max(0.0).round() as u64,
                },
            )
        });
        Self::from_entries(organism, entries)
    }

    pub fn organism(&self) -> &str {
        &self.organism
    }

    pub fn get(&self, codon: &str) -> Option<&CodonInfo> {
        self.codons.get(codon)
    }

    pub fn codons(&self) -> impl Iterator<Item = (&String, &CodonInfo)> {
        self.codons.iter()
    }

    pub fn amino_acid_groups(&self) -> &BTreeMap<char, Vec<String>> {
        &self.amino_acid_groups
    }
}

#[derive(Debug, Deserialize)]
struct CodonUsageRow {
    organism: String,
    codon: String,
    amino_acid: char,
    frequency: f64,
    count: u64,
}

#[derive(Clone, Debug)]
pub struct CodonUsageCatalog {
    tables: Vec<CodonUsageTable>,
}

impl CodonUsageCatalog {
    pub fn from_csv_text(csv_text: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());
        let mut grouped: Vec<(String, Vec<(String, CodonInfo)>)> = vec![];
        for row in rdr.deserialize() {
            let row: CodonUsageRow = row?;
            let entry = (
                row.codon,
                CodonInfo {
                    amino_acid: row.amino_acid,
                    frequency: row.frequency,
                    count: row.count,
                },
            );
            match grouped.iter_mut().find(|(name, _)| *name == row.organism) {
                Some((_, entries)) => entries.push(entry),
                None => grouped.push((row.organism, vec![entry])),
            }
        }
        if grouped.is_empty() {
            return Err(anyhow!("Codon usage file contains no rows"));
        }
        let tables = grouped
            .into_iter()
            .map(|(organism, entries)| CodonUsageTable::from_entries(&organism, entries))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tables })
    }

    pub fn from_csv_path(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("Could not read codon usage file '{path}': {e}"))?;
        Self::from_csv_text(&text)
    }

    pub fn organisms(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.organism()).collect()
    }

    pub fn tables(&self) -> &[CodonUsageTable] {
        &self.tables
    }

    /// Case-insensitive lookup by organism name or short alias.
    pub fn get(&self, name: &str) -> Option<&CodonUsageTable> {
        let name = name.trim();
        let resolved = ORGANISM_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, organism)| *organism)
            .unwrap_or(name);
        self.tables
            .iter()
            .find(|t| t.organism().eq_ignore_ascii_case(resolved))
    }

    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        let mut seen = HashSet::new();
        self.tables
            .iter()
            .map(|t| t.organism())
            .filter(|organism| organism.to_lowercase().contains(&query))
            .filter(|organism| seen.insert(*organism))
            .collect()
    }
}

impl Default for CodonUsageCatalog {
    fn default() -> Self {
        Self::from_csv_text(BUILTIN_CODON_USAGE_CSV).expect("Builtin codon usage table is invalid")
    }
}
