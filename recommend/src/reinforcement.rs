//! Usage feedback: entities served together get their edges strengthened.

use crate::algorithm::{EntityRecommendation, Recommendation};
use cograph_core::config::ReinforcementScope;
use std::collections::BTreeSet;
use storage::{EdgeWeight, WeightedGraph};

/// Groups of entities whose pairwise edges a finished request strengthens.
pub fn involved_groups(
    scope: ReinforcementScope,
    query_entities: &[String],
    served: &[EntityRecommendation],
) -> Vec<Vec<String>> {
    match scope {
        ReinforcementScope::Disabled => Vec::new(),
        ReinforcementScope::QueryEntities => vec![query_entities.to_vec()],
        ReinforcementScope::Served => served.iter().filter_map(served_group).collect(),
    }
}

fn served_group(rec: &EntityRecommendation) -> Option<Vec<String>> {
    let source = rec.entities.first()?.clone();
    match &rec.result {
        Recommendation::Ranked(items) => {
            let mut group = vec![source];
            group.extend(items.iter().cloned());
            Some(group)
        }
        // Routes reinforce their two endpoints.
        Recommendation::Path(_) if rec.entities.len() > 1 => Some(rec.entities.clone()),
        Recommendation::Path(path) => {
            let last = path.last()?.node_id.clone();
            Some(vec![source, last])
        }
    }
}

/// Add one to every distinct pair across `groups`, creating missing edges at
/// weight one. Entities absent from the graph are skipped. Returns the number
/// of pairs touched.
pub fn reinforce<W: EdgeWeight>(graph: &mut WeightedGraph<W>, groups: &[Vec<String>]) -> usize {
    let mut pairs: BTreeSet<(&str, &str)> = BTreeSet::new();
    for group in groups {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if a == b || !graph.contains(a) || !graph.contains(b) {
                    continue;
                }
                let pair = if a < b {
                    (a.as_str(), b.as_str())
                } else {
                    (b.as_str(), a.as_str())
                };
                pairs.insert(pair);
            }
        }
    }

    for (a, b) in &pairs {
        graph.increment_edge(a, b);
    }
    pairs.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Target;
    use cograph_core::model::PathEntry;
    use storage::CooccurrenceGraph;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reinforce_counts_each_pair_once() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("a", "b", 2.0);
        graph.add_node("c");

        let groups = vec![names(&["a", "b", "c"]), names(&["b", "a", "ghost"])];
        assert_eq!(reinforce(&mut graph, &groups), 3);
        assert_eq!(graph.weight("a", "b"), Some(3.0));
        assert_eq!(graph.weight("a", "c"), Some(1.0));
        assert_eq!(graph.weight("b", "c"), Some(1.0));
        assert!(!graph.contains("ghost"));
    }

    #[test]
    fn test_served_groups_per_result_kind() {
        let ranked = EntityRecommendation::for_target(
            &Target::Entity("a".into()),
            Recommendation::Ranked(names(&["b", "c"])),
        );
        let walk = EntityRecommendation::for_target(
            &Target::Entity("a".into()),
            Recommendation::Path(vec![
                PathEntry::step("a"),
                PathEntry::step("x"),
                PathEntry::teleport("y"),
            ]),
        );
        let route = EntityRecommendation::for_target(
            &Target::Route {
                start: "s".into(),
                end: "e".into(),
            },
            Recommendation::Path(vec![PathEntry::step("s"), PathEntry::step("m")]),
        );

        let groups = involved_groups(
            ReinforcementScope::Served,
            &names(&["a", "s", "e"]),
            &[ranked, walk, route],
        );
        assert_eq!(
            groups,
            vec![names(&["a", "b", "c"]), names(&["a", "y"]), names(&["s", "e"])]
        );

        assert!(involved_groups(ReinforcementScope::Disabled, &names(&["a"]), &[]).is_empty());
        assert_eq!(
            involved_groups(ReinforcementScope::QueryEntities, &names(&["a", "b"]), &[]),
            vec![names(&["a", "b"])]
        );
    }
}
