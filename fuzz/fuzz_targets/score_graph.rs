#![no_main]

use brokerage_graph::GraphBuilder;
use brokerage_metrics::{
    BetweennessOptions, CentralityConfig, betweenness_centrality, closeness_centrality,
    constraint, effective_size, hierarchy, laplacian_centrality,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Byte 0: flags. Then (from, to, weight) triples over at most 32 nodes.
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let mut builder = if flags & 1 == 1 {
        GraphBuilder::directed()
    } else {
        GraphBuilder::undirected()
    };
    for triple in rest.chunks_exact(3) {
        let from = format!("n{}", triple[0] % 32);
        let to = format!("n{}", triple[1] % 32);
        builder.add_weighted_edge(&from, &to, "w", f64::from(triple[2]));
    }
    let graph = builder.build();
    let weight = (flags & 2 == 2).then_some("w");
    let config = if flags & 4 == 4 {
        CentralityConfig::always_sharded(3)
    } else {
        CentralityConfig::sequential()
    };

    let options = BetweennessOptions {
        weight: weight.map(str::to_string),
        ..BetweennessOptions::default()
    };
    if let Ok(scores) = betweenness_centrality(&graph, &options, &config) {
        assert!(scores.values().all(|b| b.is_finite() && *b >= -1e-9));
    }
    if let Ok(scores) = closeness_centrality(&graph, weight, &config) {
        assert!(scores.values().all(|c| c.is_finite() && *c >= 0.0));
    }
    let _ = laplacian_centrality(&graph, weight, &config);
    let _ = effective_size(&graph, None, weight, &config);
    let _ = constraint(&graph, None, weight, &config);
    let _ = hierarchy(&graph, None, weight, &config);
});
