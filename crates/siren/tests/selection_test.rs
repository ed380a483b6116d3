//! End-to-end selection runs with the real algorithms and metrics.

use siren::{
    Circular, EdgeLengthStd, ForceDirected, Graph, Improvement, LayoutAlgorithm, LayoutMetric,
    NumberOfCrossings, TrialConfig, choose_layout, new_graph,
};

fn cycle(n: usize) -> Graph {
    let mut g = new_graph();
    let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
    for i in 0..n {
        g.set_edge(ids[i].clone(), ids[(i + 1) % n].clone());
    }
    g
}

fn candidate_set() -> Vec<Box<dyn LayoutAlgorithm>> {
    vec![
        Box::new(Circular::new()),
        Box::new(ForceDirected::spring_box()),
        Box::new(ForceDirected::lin_log()),
    ]
}

#[test]
fn all_candidates_produce_variants() {
    let graph = cycle(8);
    let config = TrialConfig {
        n_trials: 3,
        min_trials: 3,
        seed: 11,
        ..TrialConfig::default()
    };
    let result = choose_layout(&graph, &candidate_set(), &config, &NumberOfCrossings).unwrap();
    assert_eq!(result.variants().len(), 3);
    for name in ["Circular", "SpringBox", "LinLog"] {
        assert!(result.variants().contains_key(name), "missing {name}");
    }
    result.best_layout().validate(&graph).unwrap();
}

#[test]
fn circular_cycle_drawing_has_no_crossings() {
    let graph = cycle(8);
    let layout = Circular::new().layout(&graph, 0).unwrap();
    assert_eq!(NumberOfCrossings.calculate(&graph, &layout), 0.0);
}

#[test]
fn winner_is_extremal_for_a_reversed_metric() {
    let graph = cycle(6);
    let config = TrialConfig {
        n_trials: 3,
        min_trials: 3,
        seed: 7,
        ..TrialConfig::default()
    };
    let metric = EdgeLengthStd;
    assert_eq!(metric.improvement(), Improvement::LowerIsBetter);
    let result = choose_layout(&graph, &candidate_set(), &config, &metric).unwrap();
    let winner_mean = result.best_variant().average_metric_value;
    for variant in result.variants().values() {
        assert!(winner_mean <= variant.average_metric_value);
    }
    // a circle draws every edge at the same length
    let circular = &result.variants()["Circular"];
    assert!(circular.average_metric_value < 1e-6);
}

#[test]
fn seeded_evaluations_are_reproducible() {
    let graph = cycle(6);
    let config = TrialConfig {
        n_trials: 4,
        min_trials: 4,
        seed: 123,
        ..TrialConfig::default()
    };
    let first = choose_layout(&graph, &candidate_set(), &config, &NumberOfCrossings).unwrap();
    let second = choose_layout(&graph, &candidate_set(), &config, &NumberOfCrossings).unwrap();
    assert_eq!(first.layout_name(), second.layout_name());
    for (name, variant) in first.variants() {
        let other = &second.variants()[name];
        assert_eq!(variant.all_metric_values, other.all_metric_values);
        for id in graph.nodes() {
            assert_eq!(variant.layout.point(id), other.layout.point(id));
        }
    }
}

#[test]
fn evaluated_layout_serializes_with_variant_breakdown() {
    let graph = cycle(5);
    let config = TrialConfig {
        n_trials: 2,
        min_trials: 2,
        ..TrialConfig::default()
    };
    let result = choose_layout(&graph, &candidate_set(), &config, &NumberOfCrossings).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["variants"]["Circular"]["all_metric_values"].is_array());
}
