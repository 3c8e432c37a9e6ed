use codon_optimizer::{
    cai,
    codon_usage::{CodonUsageCatalog, DEFAULT_ORGANISM},
    engine::CodonOptimizationEngine,
    enzymes::RestrictionData,
    error::OptimizerError,
    genetic_code::translate,
    parameters::OptimizerParameters,
    restriction_sites::find_sites,
    terminators::detect_terminators,
};
use codon_protocol::{ErrorCode, InputKind, OptimizationRequest, OptimizationResult};

const GFP: &str = "MSKGEELFTGVVPILVELDGDVNGHKFSVSGEGEGDATYGKLTLKFICTTGKLPVPWPTLVTTFSYGVQCFSRYPDHMKQHDFFKSAMPEGYVQERTIFFKDDGNYKTRAEVKFEGDTLVNRIELKGIDFKEDGNILGHKLEYNYNSHNVYIMADKQKNGIKVNFKIRHNIEDGSVQLADHYQQNTPIGDGPVLLPDNHYLSTQSALSKDPNEKRDHMVLLEFVTAAGITHGMDELYK*";

fn run(organism: &str, request: &OptimizationRequest) -> Result<OptimizationResult, OptimizerError> {
    let catalog = CodonUsageCatalog::default();
    let registry = RestrictionData::default();
    let table = catalog.get(organism).unwrap();
    CodonOptimizationEngine::new(table, &registry).run(request)
}

fn full_request(sequence: &str) -> OptimizationRequest {
    OptimizationRequest {
        remove_restriction_sites: true,
        remove_terminators: true,
        optimize_ends: true,
        ..OptimizationRequest::new(sequence)
    }
}

#[test]
fn full_pipeline_on_gfp() {
    let result = run(DEFAULT_ORGANISM, &full_request(GFP)).unwrap();
    assert_eq!(result.input_kind, InputKind::Protein);
    assert_eq!(result.protein_sequence, GFP);
    assert_eq!(translate(&result.final_sequence).unwrap(), GFP);
    assert_eq!(result.final_sequence.len(), GFP.len() * 3);
    assert_eq!(result.optimized_cai, 1.0);
    assert!(result.final_cai > 0.95 && result.final_cai < 1.0);

    assert_eq!(result.restriction_sites_found, 7);
    assert_eq!(result.restriction_sites_removed, 7);
    assert_eq!(result.enzymes_cleared, vec!["BtgZI", "NdeI", "NcoI"]);
    assert_eq!(result.terminators_found, 2);
    assert_eq!(result.terminators_removed, 2);
    assert!(result.warnings.is_empty());

    let registry = RestrictionData::default();
    assert!(find_sites(&result.final_sequence, &registry, None).is_empty());
    let params = OptimizerParameters::default();
    assert!(detect_terminators(&result.final_sequence, &params.terminators).is_empty());
}

#[test]
fn selected_enzymes_only() {
    let mut request = OptimizationRequest::new(GFP);
    request.remove_restriction_sites = true;
    request.selected_enzymes = Some(vec!["NdeI".to_string()]);
    let result = run(DEFAULT_ORGANISM, &request).unwrap();
    assert_eq!(result.restriction_sites_found, 2);
    assert_eq!(result.restriction_sites_removed, 2);
    assert_eq!(result.enzymes_cleared, vec!["NdeI"]);
    assert!(!result.final_sequence.contains("CATATG"));
    // Sites of enzymes outside the selection stay and are not reported.
    assert!(result.final_sequence.contains("GCGATG"));
    assert!(result.warnings.is_empty());
}

#[test]
fn deterministic_across_runs() {
    let request = full_request(GFP);
    let first = run(DEFAULT_ORGANISM, &request).unwrap();
    let second = run(DEFAULT_ORGANISM, &request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn dna_round_trip_through_hosts() {
    let ecoli = run(DEFAULT_ORGANISM, &OptimizationRequest::new(GFP)).unwrap();
    for organism in ["yeast", "human"] {
        let result = run(organism, &OptimizationRequest::new(&ecoli.final_sequence)).unwrap();
        assert_eq!(result.input_kind, InputKind::Dna);
        assert_eq!(result.protein_sequence, GFP);
        assert!(result.original_cai < result.optimized_cai);
        assert!(!result.codon_changes.is_empty());
        assert!(result.codon_changes.iter().all(|c| c.position >= 1));
    }
}

#[test]
fn reported_scores_match_scorer() {
    let result = run(DEFAULT_ORGANISM, &full_request(GFP)).unwrap();
    let catalog = CodonUsageCatalog::default();
    let weights = codon_optimizer::adaptiveness::RelativeAdaptiveness::from_table(
        catalog.get(DEFAULT_ORGANISM).unwrap(),
    );
    let score = cai::score(&result.final_sequence, &weights).unwrap();
    assert_eq!(score.cai, result.final_cai);
    assert_eq!(score.codon_count, GFP.len());
}

#[test]
fn errors_carry_protocol_codes() {
    let err = run(DEFAULT_ORGANISM, &OptimizationRequest::new("MKXB")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);
    let err = run(DEFAULT_ORGANISM, &OptimizationRequest::new("ATG")).unwrap_err();
    assert_eq!(err, OptimizerError::SequenceTooShort { codons: 1 });
    let err = run(DEFAULT_ORGANISM, &OptimizationRequest::new(">ambiguous\nATGAAANNNTAA\n"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert!(matches!(err, OptimizerError::UnknownCodon { position: 2, .. }));
}

#[test]
fn request_json_round_trip() {
    let request: OptimizationRequest = serde_json::from_str(
        r#"{"sequence":"MLDPK*","remove_restriction_sites":true,"selected_enzymes":["BamHI"]}"#,
    )
    .unwrap();
    let result = run(DEFAULT_ORGANISM, &request).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["input_kind"], "protein");
    assert_eq!(json["final_sequence"], "ATGCTGGACCCGAAATAA");
    assert_eq!(json["enzymes_cleared"][0], "BamHI");
}
