//! Scenario entities
//!
//! A scenario is one exercise: a historical event, the research questions
//! that can be asked about it, and the source documents (surviving or lost)
//! that report on it. Everything here is immutable once loaded.

use crate::ids::{EventId, NodeId, ScenarioId, TopicId};
use serde::{Deserialize, Serialize};

/// One classification exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier
    pub id: ScenarioId,
    /// The event the sources report on
    pub event: Event,
    /// Source documents in display order
    pub nodes: Vec<SourceNode>,
    /// Declared relationships between sources
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Research questions, first one is the default
    pub topics: Vec<Topic>,
    /// Difficulty label
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Scenario {
    /// Look up a source node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&SourceNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Look up a topic by id
    #[must_use]
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id.as_str() == id)
    }

    /// Sources that survive and must be classified
    pub fn extant_nodes(&self) -> impl Iterator<Item = &SourceNode> {
        self.nodes.iter().filter(|n| n.extant)
    }
}

/// The historical event at the centre of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier (may be referenced by topic anchors)
    pub id: EventId,
    /// Short title
    pub title: String,
    /// Year, CE
    pub year: i32,
    /// Where it happened
    pub place: String,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Notes on how the surviving sources were composed
    #[serde(default)]
    pub composition_info: Option<String>,
    /// Illustration reference
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A research question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic identifier
    pub id: TopicId,
    /// Question text shown to the learner
    pub label: String,
    /// Event or node id the question centres on
    #[serde(default)]
    pub anchor: Option<String>,
}

/// Kind of source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Written text
    #[default]
    Text,
    /// Physical object (inscription, coin, charter seal)
    Artifact,
}

/// A source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNode {
    /// Node identifier
    pub id: NodeId,
    /// Text or artifact
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    /// Title
    pub title: String,
    /// Who produced it, relative to the event
    pub author_role: String,
    /// Year of composition
    pub year: i32,
    /// Place of composition
    #[serde(default)]
    pub place: Option<String>,
    /// False when the source is known only by reference
    pub extant: bool,
    /// Stages the content passed through before its surviving form
    #[serde(default)]
    pub transmission: Vec<TransmissionStep>,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
}

impl SourceNode {
    /// Transmission chain as shown on a source card, e.g.
    /// `compilation (850) → copy (900)`. `None` when there is no chain.
    #[must_use]
    pub fn transmission_summary(&self) -> Option<String> {
        if self.transmission.is_empty() {
            return None;
        }
        let steps: Vec<String> = self
            .transmission
            .iter()
            .map(|step| format!("{} ({})", step.kind.as_str(), step.year))
            .collect();
        Some(steps.join(" → "))
    }
}

/// One stage in a source's transmission history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionStep {
    /// Intermediary the content passed through
    pub via: String,
    /// Year of the stage
    pub year: i32,
    /// What happened at this stage
    #[serde(rename = "type")]
    pub kind: TransmissionKind,
}

/// How content moved between intermediaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransmissionKind {
    /// Faithful copy
    Copy,
    /// Abridgement
    Summary,
    /// Translation into another language
    Translation,
    /// Merged with other material
    Compilation,
}

impl TransmissionKind {
    /// Wire label
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TransmissionKind::Copy => "copy",
            TransmissionKind::Summary => "summary",
            TransmissionKind::Translation => "translation",
            TransmissionKind::Compilation => "compilation",
        }
    }
}

/// Declared relationship between two sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source the relationship starts at
    pub from: NodeId,
    /// Source the relationship points to
    pub to: NodeId,
    /// Relationship kind ("copies", "cites", ...)
    pub kind: String,
}

/// Scenario difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Single short chain
    Easy,
    /// Default
    #[default]
    Medium,
    /// Several lost intermediaries
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}
