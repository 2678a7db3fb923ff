use std::collections::HashMap;

use wavg_calculator::{
    AggregationAccumulator, COMBINE_SCRIPT, INIT_SCRIPT, MAP_SCRIPT, PartialResult, REDUCE_SCRIPT,
    RangePredicate, Script, ScriptError, ScriptRegistry, reduce,
};
use wavg_types::{ParamValue, Params};

type Doc = HashMap<String, ParamValue>;

/// The four transaction documents: (40, 80), (10, -), (30, 100), (130, 50).
fn transactions() -> Vec<Doc> {
    let rows: [(&str, i64, Option<i64>); 4] =
        [("sale", 40, Some(80)), ("cost", 10, None), ("cost", 30, Some(100)), ("sale", 130, Some(50))];

    rows.iter()
        .map(|(kind, value1, value2)| {
            let mut doc = Doc::new();
            doc.insert("type".to_string(), ParamValue::from(*kind));
            doc.insert("value1".to_string(), ParamValue::Integer(*value1));
            if let Some(v) = value2 {
                doc.insert("value2".to_string(), ParamValue::Integer(*v));
            }
            doc
        })
        .collect()
}

fn params(weights: Option<Vec<f64>>) -> Params {
    let mut p = Params::new();
    p.insert("fields".to_string(), ParamValue::from(vec!["value1", "value2"]));
    if let Some(w) = weights {
        p.insert("weights".to_string(), ParamValue::from(w));
    }
    p
}

fn range_params(weights: Vec<f64>, gte: i64, lte: i64) -> Params {
    let mut p = params(Some(weights));
    p.insert("gte".to_string(), ParamValue::Integer(gte));
    p.insert("lte".to_string(), ParamValue::Integer(lte));
    p
}

/// Drives the four phases the way a search host would, one shard per chunk.
fn aggregate(registry: &ScriptRegistry, p: &Params, shards: &[&[Doc]]) -> Option<f64> {
    assert_eq!(registry.create(INIT_SCRIPT, p).unwrap(), Script::Init);
    let mapper = registry.create(MAP_SCRIPT, p).unwrap().into_mapper(MAP_SCRIPT).unwrap();
    assert_eq!(registry.create(COMBINE_SCRIPT, p).unwrap(), Script::Combine);
    assert_eq!(registry.create(REDUCE_SCRIPT, p).unwrap(), Script::Reduce);

    let partials: Vec<Option<PartialResult>> = shards
        .iter()
        .map(|docs| {
            let mut acc = AggregationAccumulator::new();
            for doc in *docs {
                mapper.map(&mut acc, doc);
            }
            Some(acc.combine())
        })
        .collect();
    reduce(partials)
}

fn count_matches(registry: &ScriptRegistry, p: &Params, docs: &[Doc]) -> usize {
    let predicate = registry
        .create(RangePredicate::SCRIPT_NAME, p)
        .unwrap()
        .into_filter(RangePredicate::SCRIPT_NAME)
        .unwrap();
    docs.iter().filter(|doc| predicate.matches(*doc)).count()
}

#[test]
fn unweighted_aggregation_is_mean_of_document_averages() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    assert_eq!(aggregate(&registry, &params(None), &[&docs]), Some(56.25));
}

#[test]
fn unit_weights_match_unweighted_aggregation() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    assert_eq!(aggregate(&registry, &params(Some(vec![1.0, 1.0])), &[&docs]), Some(56.25));
}

#[test]
fn weighted_aggregation() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    // (66.67 + 10 + 76.67 + 76.67) / 4
    let value = aggregate(&registry, &params(Some(vec![0.5, 1.0])), &[&docs]).unwrap();
    assert!((value - 57.5).abs() < 1e-9, "got {value}");
}

#[test]
fn sharded_aggregation_matches_single_shard() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    let p = params(Some(vec![0.5, 1.0]));
    let whole = aggregate(&registry, &p, &[&docs]).unwrap();
    let split = aggregate(&registry, &p, &[&docs[..1], &[], &docs[1..3], &docs[3..]]).unwrap();
    assert!((whole - split).abs() < 1e-9);
}

#[test]
fn weighted_sum_policy_averages_every_observation() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    let mut p = params(Some(vec![0.5, 1.0]));
    p.insert("policy".to_string(), ParamValue::from("weighted_sum"));
    // (20 + 80 + 5 + 15 + 100 + 65 + 50) / (1.5 + 0.5 + 1.5 + 1.5)
    assert_eq!(aggregate(&registry, &p, &[&docs[..2], &docs[2..]]), Some(67.0));
}

#[test]
fn unknown_policy_fails_map_construction() {
    let registry = ScriptRegistry::new();
    let mut p = params(None);
    p.insert("policy".to_string(), ParamValue::from("median"));
    assert_eq!(
        registry.create(MAP_SCRIPT, &p),
        Err(ScriptError::UnknownPolicy("median".to_string()))
    );
}

#[test]
fn empty_collection_aggregates_to_none() {
    let registry = ScriptRegistry::new();
    let p = params(Some(vec![1.0, 1.0]));
    assert_eq!(aggregate(&registry, &p, &[]), None);
    assert_eq!(aggregate(&registry, &p, &[&[], &[]]), None);
}

#[test]
fn documents_without_fields_aggregate_to_none() {
    let registry = ScriptRegistry::new();
    let docs: Vec<Doc> = vec![Doc::new(), [("other".to_string(), ParamValue::Integer(5))].into_iter().collect()];
    assert_eq!(aggregate(&registry, &params(None), &[&docs]), None);
}

#[test]
fn range_filter_with_half_weight() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    assert_eq!(count_matches(&registry, &range_params(vec![0.5, 1.0], 65, 100), &docs), 3);
}

#[test]
fn range_filter_with_unit_weights() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    // averages 60, 10, 65, 90
    assert_eq!(count_matches(&registry, &range_params(vec![1.0, 1.0], 65, 100), &docs), 2);
}

#[test]
fn degenerate_range_matches_exact_average() {
    let registry = ScriptRegistry::new();
    let docs = transactions();
    assert_eq!(count_matches(&registry, &range_params(vec![1.0, 1.0], 10, 10), &docs), 1);
}

#[test]
fn range_filter_rejects_mismatched_weights() {
    let registry = ScriptRegistry::new();
    assert_eq!(
        registry.create(RangePredicate::SCRIPT_NAME, &range_params(vec![1.0], 0, 1)),
        Err(ScriptError::LengthMismatch { fields: 2, weights: 1 })
    );
}

#[test]
fn non_numeric_values_are_absent() {
    let registry = ScriptRegistry::new();
    let mut doc = Doc::new();
    doc.insert("value1".to_string(), ParamValue::from("40"));
    doc.insert("value2".to_string(), ParamValue::Integer(80));
    assert_eq!(count_matches(&registry, &range_params(vec![1.0, 1.0], 80, 80), &[doc]), 1);
}
