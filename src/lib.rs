use codon_usage::CodonUsageCatalog;
use enzymes::RestrictionData;
use genetic_code::GeneticCode;
use lazy_static::lazy_static;

pub mod adaptiveness;
pub mod cai;
pub mod codon_usage;
pub mod end_balancer;
pub mod engine;
pub mod enzymes;
pub mod error;
pub mod gc_contents;
pub mod genetic_code;
pub mod iupac_code;
pub mod optimizer;
pub mod parameters;
pub mod restriction_enzyme;
pub mod restriction_sites;
pub mod sequence_input;
pub mod terminators;

lazy_static! {
    // Standard genetic code
    pub static ref STANDARD_CODE: GeneticCode = GeneticCode::standard();

    // Builtin codon usage tables
    pub static ref CODON_USAGE: CodonUsageCatalog = CodonUsageCatalog::default();

    // Builtin restriction enzymes and motifs
    pub static ref ENZYMES: RestrictionData = RestrictionData::default();
}
