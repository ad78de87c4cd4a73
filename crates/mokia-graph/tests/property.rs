//! Property tests for dependency resolution over random import graphs.

mod common;

use common::write_file;
use mokia_graph::DependencyResolver;
use proptest::prelude::*;
use std::collections::BTreeSet;
use tempfile::TempDir;

/// Adjacency lists for up to 8 modules; edges may form cycles and self loops.
fn graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..=8).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0..n, 0..=4), n))
}

fn reachable(graph: &[Vec<usize>]) -> BTreeSet<usize> {
    let mut seen = BTreeSet::from([0]);
    let mut stack = vec![0];
    while let Some(node) = stack.pop() {
        for &next in &graph[node] {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every reachable module appears exactly once, nothing else appears.
    #[test]
    fn prop_resolve_returns_reachable_modules(graph in graph_strategy()) {
        let temp = TempDir::new().unwrap();
        for (node, edges) in graph.iter().enumerate() {
            let imports: Vec<String> = edges.iter().map(|e| format!("\"./m{e}\"")).collect();
            write_file(temp.path(), &format!("m{node}.toml"), &format!("imports = [{}]", imports.join(", ")));
        }

        let deps = DependencyResolver::default().resolve(&temp.path().join("m0.toml"));
        let expected: BTreeSet<_> = reachable(&graph)
            .into_iter()
            .map(|n| temp.path().join(format!("m{n}.toml")))
            .collect();

        prop_assert_eq!(deps, expected);
    }

    /// Modules under the ignored directory are never reported.
    #[test]
    fn prop_ignored_modules_excluded(graph in graph_strategy(), vendored in prop::collection::vec(any::<bool>(), 8)) {
        let temp = TempDir::new().unwrap();
        let path_of = |n: usize| {
            if n != 0 && vendored[n] { format!("vendor/m{n}.toml") } else { format!("m{n}.toml") }
        };
        for (node, edges) in graph.iter().enumerate() {
            let own = path_of(node);
            let prefix = if own.starts_with("vendor/") { "../" } else { "./" };
            let imports: Vec<String> = edges.iter().map(|&e| format!("\"{prefix}{}\"", path_of(e))).collect();
            write_file(temp.path(), &own, &format!("imports = [{}]", imports.join(", ")));
        }

        let resolver = DependencyResolver::new(Some(regex::Regex::new("vendor").unwrap()));
        let deps = resolver.resolve(&temp.path().join("m0.toml"));

        prop_assert!(deps.iter().all(|p| !p.to_string_lossy().contains("/vendor/")));
        prop_assert!(deps.contains(&temp.path().join("m0.toml")));
    }
}
