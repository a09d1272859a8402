//! Learner classifications and the completeness predicate

use crate::ids::NodeId;
use crate::scenario::Scenario;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The three labels a learner can give a surviving source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationLabel {
    /// Closest surviving document to the research question
    Primary,
    /// Further removed than another surviving document
    Secondary,
    /// Changes with the research question
    DependentOnTopic,
}

impl ClassificationLabel {
    /// Every label, in button order
    pub const ALL: [ClassificationLabel; 3] = [
        ClassificationLabel::Primary,
        ClassificationLabel::Secondary,
        ClassificationLabel::DependentOnTopic,
    ];

    /// Wire label
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLabel::Primary => "primary",
            ClassificationLabel::Secondary => "secondary",
            ClassificationLabel::DependentOnTopic => "dependent_on_topic",
        }
    }

    /// Canned justifications offered for this label, in display order
    #[must_use]
    pub fn justifications(&self) -> &'static [&'static str] {
        match self {
            ClassificationLabel::Primary => &[
                "The author witnessed the event firsthand",
                "Written at the time of the event (or very close to it)",
                "The closest surviving document to the event",
                "Preserves information from lost sources (making this the closest surviving document)",
            ],
            ClassificationLabel::Secondary => &[
                "Written long after the event (when closer sources still exist)",
                "Compiles or synthesizes earlier medieval sources",
                "Modern scholarship analyzing other surviving sources",
                "Several transmission steps away from the original event",
            ],
            ClassificationLabel::DependentOnTopic => {
                &["Classification changes depending on the research question"]
            }
        }
    }
}

impl std::fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One learner pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Classified node
    pub node_id: NodeId,
    /// Chosen label
    #[serde(rename = "classification")]
    pub label: ClassificationLabel,
    /// Free text or a canned reason
    pub justification: String,
}

impl Classification {
    /// Create new classification
    #[inline]
    #[must_use]
    pub fn new(
        node_id: impl Into<NodeId>,
        label: ClassificationLabel,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            label,
            justification: justification.into(),
        }
    }
}

/// Live classification mapping for one scenario, keyed by node id
///
/// Iteration follows first-classification order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifications {
    entries: IndexMap<NodeId, Classification>,
}

impl Classifications {
    /// Empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `classification.node_id`
    ///
    /// Returns `true` when the stored entry changed.
    pub fn upsert(&mut self, classification: Classification) -> bool {
        match self.entries.get_mut(&classification.node_id) {
            Some(existing) if *existing == classification => false,
            Some(existing) => {
                *existing = classification;
                true
            }
            None => {
                self.entries
                    .insert(classification.node_id.clone(), classification);
                true
            }
        }
    }

    /// Entry for a node
    #[must_use]
    pub fn get(&self, node_id: &str) -> Option<&Classification> {
        self.entries.get(node_id)
    }

    /// Whether a node has been classified
    #[must_use]
    pub fn contains(&self, node_id: &str) -> bool {
        self.entries.contains_key(node_id)
    }

    /// Number of classified nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is classified
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-classification order
    pub fn iter(&self) -> impl Iterator<Item = &Classification> {
        self.entries.values()
    }

    /// Entries in the scenario's node order, skipping unknown ids
    #[must_use]
    pub fn in_node_order(&self, scenario: &Scenario) -> Vec<Classification> {
        scenario
            .nodes
            .iter()
            .filter_map(|node| self.entries.get(node.id.as_str()).cloned())
            .collect()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// True iff every extant node of `scenario` has a classification
#[must_use]
pub fn is_complete(scenario: &Scenario, classifications: &Classifications) -> bool {
    scenario
        .extant_nodes()
        .all(|node| classifications.contains(node.id.as_str()))
}

/// Extant nodes still waiting for a classification, in node order
#[must_use]
pub fn missing_nodes(scenario: &Scenario, classifications: &Classifications) -> Vec<NodeId> {
    scenario
        .extant_nodes()
        .filter(|node| !classifications.contains(node.id.as_str()))
        .map(|node| node.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        serde_json::from_str(
            r#"{
            "id": "s",
            "event": {"id": "evt", "title": "Raid", "year": 793, "place": "Lindisfarne"},
            "nodes": [
                {"id": "a", "title": "A", "author_role": "r", "year": 793, "extant": true},
                {"id": "lost", "title": "L", "author_role": "r", "year": 850, "extant": false},
                {"id": "b", "title": "B", "author_role": "r", "year": 890, "extant": true},
                {"id": "c", "title": "C", "author_role": "r", "year": 1100, "extant": true}
            ],
            "topics": [{"id": "t", "label": "Q"}]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn completeness_ignores_lost_nodes() {
        let scenario = scenario();
        let mut picks = Classifications::new();

        for id in ["a", "b"] {
            picks.upsert(Classification::new(id, ClassificationLabel::Primary, ""));
            assert!(!is_complete(&scenario, &picks));
        }
        assert_eq!(missing_nodes(&scenario, &picks), vec![NodeId::new("c")]);

        picks.upsert(Classification::new("c", ClassificationLabel::Secondary, ""));
        assert!(is_complete(&scenario, &picks));
        assert!(missing_nodes(&scenario, &picks).is_empty());
    }

    #[test]
    fn upsert_reports_changes() {
        let mut picks = Classifications::new();
        let pick = Classification::new("a", ClassificationLabel::Primary, "witness");

        assert!(picks.upsert(pick.clone()));
        assert!(!picks.upsert(pick));
        assert!(picks.upsert(Classification::new(
            "a",
            ClassificationLabel::Primary,
            "closest surviving"
        )));
        assert_eq!(picks.len(), 1);
    }

    #[test]
    fn node_order_follows_scenario() {
        let scenario = scenario();
        let mut picks = Classifications::new();
        picks.upsert(Classification::new("c", ClassificationLabel::Secondary, ""));
        picks.upsert(Classification::new("a", ClassificationLabel::Primary, ""));

        let ordered: Vec<_> = picks
            .in_node_order(&scenario)
            .into_iter()
            .map(|c| c.node_id.to_string())
            .collect();
        assert_eq!(ordered, vec!["a", "c"]);
    }

    #[test]
    fn every_label_offers_justifications() {
        for label in ClassificationLabel::ALL {
            assert!(!label.justifications().is_empty());
        }
        assert_eq!(ClassificationLabel::Primary.justifications().len(), 4);
        assert_eq!(ClassificationLabel::DependentOnTopic.justifications().len(), 1);
    }

    #[test]
    fn classification_wire_names() {
        let pick = Classification::new("a", ClassificationLabel::DependentOnTopic, "why");
        let json = serde_json::to_value(&pick).unwrap();
        assert_eq!(json["classification"], "dependent_on_topic");
        assert_eq!(json["node_id"], "a");
    }
}
