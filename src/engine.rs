//! Runs the optimization pipeline for one request against a codon table and enzyme registry.

use crate::{
    adaptiveness::RelativeAdaptiveness,
    cai,
    codon_usage::{CodonUsageCatalog, CodonUsageTable},
    end_balancer::balance_ends,
    enzymes::RestrictionData,
    error::OptimizerError,
    gc_contents::gc_fraction,
    genetic_code::check_translation,
    optimizer,
    parameters::OptimizerParameters,
    restriction_sites::{find_sites, remove_sites},
    sequence_input::SequenceInput,
    terminators::{detect_terminators, remove_terminators},
};
use codon_protocol::{
    Capabilities, OptimizationRequest, OptimizationResult, PROTOCOL_VERSION,
};
use tracing::{info, warn};

pub const SUPPORTED_COMMANDS: [&str; 9] = [
    "optimize",
    "request",
    "cai",
    "stats",
    "sites",
    "terminators",
    "organisms",
    "enzymes",
    "capabilities",
];

#[derive(Clone, Debug)]
pub struct CodonOptimizationEngine<'a> {
    table: &'a CodonUsageTable,
    registry: &'a RestrictionData,
    parameters: OptimizerParameters,
    weights: RelativeAdaptiveness,
}

impl<'a> CodonOptimizationEngine<'a> {
    pub fn new(table: &'a CodonUsageTable, registry: &'a RestrictionData) -> Self {
        Self::with_parameters(table, registry, OptimizerParameters::default())
    }

    pub fn with_parameters(
        table: &'a CodonUsageTable,
        registry: &'a RestrictionData,
        parameters: OptimizerParameters,
    ) -> Self {
        Self {
            table,
            registry,
            parameters,
            weights: RelativeAdaptiveness::from_table(table),
        }
    }

    pub fn weights(&self) -> &RelativeAdaptiveness {
        &self.weights
    }

    pub fn parameters(&self) -> &OptimizerParameters {
        &self.parameters
    }

    pub fn capabilities(catalog: &CodonUsageCatalog) -> Capabilities {
        Capabilities {
            protocol_version: PROTOCOL_VERSION.to_string(),
            supported_commands: SUPPORTED_COMMANDS.iter().map(|c| c.to_string()).collect(),
            organisms: catalog.organisms().iter().map(|o| o.to_string()).collect(),
            deterministic: true,
        }
    }

    /// Base optimization, then site removal, terminator removal and end balancing in that order.
    pub fn run(&self, request: &OptimizationRequest) -> Result<OptimizationResult, OptimizerError> {
        if !request.end_length_in_domain() {
            return Err(OptimizerError::InvalidEndLength {
                value: request.end_length,
            });
        }
        let input = SequenceInput::parse(&request.sequence)?;
        let base = optimizer::optimize(&input, &self.weights)?;
        let protein = base.protein.as_str();
        let (original_cai, original_gc) = match &base.original {
            Some(dna) => (
                cai::score(dna, &self.weights)?.cai,
                gc_fraction(dna.as_bytes()),
            ),
            None => (0.0, 0.0),
        };
        let optimized_cai = cai::score(&base.optimized, &self.weights)?.cai;

        let filter = request
            .selected_enzymes
            .as_deref()
            .filter(|names| !names.is_empty());
        let mut sequence = base.optimized.clone();

        let mut restriction_sites_found = find_sites(&sequence, self.registry, filter).len();
        let mut restriction_sites_removed = 0;
        let mut enzymes_cleared: Vec<String> = vec![];
        if request.remove_restriction_sites {
            let removal = remove_sites(
                &sequence,
                protein,
                &self.weights,
                self.registry,
                filter,
                &self.parameters.site_removal,
            )?;
            restriction_sites_found = removal.found;
            restriction_sites_removed = removal.removed.len();
            for site in &removal.removed {
                if !enzymes_cleared.contains(&site.enzyme) {
                    enzymes_cleared.push(site.enzyme.clone());
                }
            }
            sequence = removal.sequence;
        }

        let mut terminators_found = detect_terminators(&sequence, &self.parameters.terminators).len();
        let mut terminators_removed = 0;
        if request.remove_terminators {
            let removal = remove_terminators(
                &sequence,
                protein,
                &self.weights,
                &self.parameters.terminators,
            )?;
            terminators_found = removal.found;
            terminators_removed = removal.found;
            sequence = removal.sequence;
        }

        if request.optimize_ends {
            let balance = balance_ends(
                &sequence,
                protein,
                &self.weights,
                request.end_length,
                &self.parameters.end_balance,
            )?;
            info!(
                leading_gc = balance.leading.gc_after,
                trailing_gc = balance.trailing.gc_after,
                substitutions = balance.substitutions(),
                "end balancing finished"
            );
            sequence = balance.sequence;
        }

        check_translation(&sequence, protein)?;
        let final_cai = cai::score(&sequence, &self.weights)?.cai;
        let warnings = self.leftover_warnings(request, &sequence, filter);
        for warning in &warnings {
            warn!("{warning}");
        }
        info!(
            organism = self.table.organism(),
            codons = protein.len(),
            original_cai,
            final_cai,
            "optimization finished"
        );

        Ok(OptimizationResult {
            input_kind: input.input_kind(),
            sequence_name: input.name,
            organism: self.table.organism().to_string(),
            original_sequence: base.original.unwrap_or_default(),
            optimized_sequence: base.optimized,
            final_gc: gc_fraction(sequence.as_bytes()),
            final_sequence: sequence,
            protein_sequence: base.protein,
            original_cai,
            optimized_cai,
            final_cai,
            original_gc,
            restriction_sites_found,
            restriction_sites_removed,
            enzymes_cleared,
            terminators_found,
            terminators_removed,
            codon_changes: base.codon_changes,
            warnings,
        })
    }

    /// Sites and terminators that a later pass brought back.
    fn leftover_warnings(
        &self,
        request: &OptimizationRequest,
        sequence: &str,
        filter: Option<&[String]>,
    ) -> Vec<String> {
        let mut ret = vec![];
        if request.remove_restriction_sites {
            ret.extend(find_sites(sequence, self.registry, filter).into_iter().map(|site| {
                format!(
                    "{} site {} still present at position {}",
                    site.enzyme,
                    site.motif,
                    site.position + 1
                )
            }));
        }
        if request.remove_terminators {
            ret.extend(
                detect_terminators(sequence, &self.parameters.terminators)
                    .into_iter()
                    .map(|t| format!("Terminator-like structure still present at position {}", t.position + 1)),
            );
        }
        ret
    }
}
