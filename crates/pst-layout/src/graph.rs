//! Radial relationship graph
//!
//! The event sits at the centre of the canvas and every source node is
//! placed on a circle around it, in node order, starting at angle zero
//! (3 o'clock) and turning clockwise in screen coordinates. Each source gets
//! a synthetic edge to the event; declared edges connect sources directly.
//!
//! The layout is a pure function of the scenario and the configuration.
//! The active topic only toggles the `highlighted` flag on its anchor.

use crate::geometry::{palette, Fill, Point, Stroke};
use crate::wrap::{wrap_label, CharCount, TextMeasure};
use pst_model::{TopicId, ValidatedScenario};
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Canvas and glyph constants for the relationship graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayoutConfig {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Radius of the central event node
    pub event_radius: f64,
    /// Radius of source nodes
    pub source_radius: f64,
    /// Distance from the centre to each source node
    pub orbit_radius: f64,
    /// Label wrap budget, in [`TextMeasure`] units
    pub label_width: f64,
    /// Vertical distance between wrapped label lines
    pub label_line_height: f64,
    /// Gap between the node outline and its first label line
    pub label_gap: f64,
    /// Opacity of surviving sources
    pub extant_opacity: f64,
    /// Opacity of lost sources
    pub lost_opacity: f64,
    /// Opacity applied to every edge
    pub edge_opacity: f64,
}

impl Default for GraphLayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            event_radius: 40.0,
            source_radius: 30.0,
            orbit_radius: 200.0,
            label_width: 16.0,
            label_line_height: 14.0,
            label_gap: 20.0,
            extant_opacity: 0.9,
            lost_opacity: 0.3,
            edge_opacity: 0.6,
        }
    }
}

/// Whether a diagram node is the event or a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphNodeKind {
    /// Central event
    Event,
    /// Source document
    Source,
}

/// A placed circle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Event id or source node id
    pub id: String,
    /// Event or source
    pub kind: GraphNodeKind,
    /// Circle centre
    pub center: Point,
    /// Circle radius
    pub radius: f64,
    /// Angle on the orbit in radians, `None` for the event
    pub angle: Option<f64>,
    /// Fill colour and opacity
    pub fill: Fill,
    /// Outline
    pub stroke: Stroke,
    /// Wrapped label, drawn below the circle
    pub label_lines: Vec<String>,
    /// Offset of the first label line from the centre
    pub label_offset: f64,
    /// Offset between label lines
    pub label_line_height: f64,
    /// Draw the label in bold
    pub bold_label: bool,
    /// Draw the `LOST` marker inside the circle
    pub lost: bool,
    /// Anchor of the active research question
    pub highlighted: bool,
}

/// Edge kinds drawn in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "kind")]
pub enum GraphEdgeKind {
    /// Synthetic source-to-event edge
    RelatesTo,
    /// Declared relationship between sources
    Declared(String),
}

/// A placed edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    /// Id the edge starts at
    pub source: String,
    /// Id the edge ends at
    pub target: String,
    /// Synthetic or declared
    pub kind: GraphEdgeKind,
    /// Start point
    pub from: Point,
    /// End point
    pub to: Point,
    /// Line style
    pub stroke: Stroke,
    /// Line opacity
    pub opacity: f64,
    /// False when an endpoint was missing and anchored at the centre
    pub resolved: bool,
}

/// Hover payload for a diagram node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Tooltip {
    /// Source details
    Source {
        /// Title
        title: String,
        /// Author role
        author_role: String,
        /// Year of composition
        year: i32,
        /// Survival flag
        extant: bool,
    },
    /// Event details
    Event {
        /// Title
        title: String,
        /// Year
        year: i32,
        /// Place
        place: String,
    },
}

/// Complete relationship graph geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDiagram {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Canvas centre, where the event sits
    pub center: Point,
    /// Event first, then sources in node order
    pub nodes: Vec<GraphNode>,
    /// Synthetic edges in node order, then declared edges in edge order
    pub edges: Vec<GraphEdge>,
    tooltips: Vec<(String, Tooltip)>,
}

impl GraphDiagram {
    /// Look up a placed node by event or source id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The central event node
    #[must_use]
    pub fn event_node(&self) -> &GraphNode {
        // the event is always placed first
        &self.nodes[0]
    }

    /// Source nodes in node order
    pub fn source_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind == GraphNodeKind::Source)
    }

    /// Hover payload for an event or source id
    #[must_use]
    pub fn tooltip_payload(&self, id: &str) -> Option<&Tooltip> {
        self.tooltips
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, tooltip)| tooltip)
    }
}

/// Relationship graph layout engine
#[derive(Debug, Clone)]
pub struct GraphLayout<M = CharCount> {
    config: GraphLayoutConfig,
    measure: M,
}

impl GraphLayout<CharCount> {
    /// Engine measuring labels by character count
    #[inline]
    #[must_use]
    pub fn new(config: GraphLayoutConfig) -> Self {
        Self {
            config,
            measure: CharCount,
        }
    }
}

impl Default for GraphLayout<CharCount> {
    fn default() -> Self {
        Self::new(GraphLayoutConfig::default())
    }
}

impl<M: TextMeasure> GraphLayout<M> {
    /// Engine with a custom text measure
    #[inline]
    #[must_use]
    pub fn with_measure(config: GraphLayoutConfig, measure: M) -> Self {
        Self { config, measure }
    }

    /// Layout configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GraphLayoutConfig {
        &self.config
    }

    /// Place the event, the sources and all edges
    ///
    /// `active_topic` only selects which node is highlighted; an unknown or
    /// absent topic highlights nothing.
    #[must_use]
    pub fn compute(
        &self,
        scenario: &ValidatedScenario,
        active_topic: Option<&TopicId>,
    ) -> GraphDiagram {
        let cfg = &self.config;
        let center = Point::new(cfg.width / 2.0, cfg.height / 2.0);
        let anchor = active_topic
            .and_then(|id| scenario.find_topic(id))
            .and_then(|topic| topic.anchor.as_deref());
        let event = &scenario.event;

        let mut nodes = Vec::with_capacity(scenario.nodes.len() + 1);
        let mut tooltips = Vec::with_capacity(scenario.nodes.len() + 1);

        nodes.push(GraphNode {
            id: event.id.to_string(),
            kind: GraphNodeKind::Event,
            center,
            radius: cfg.event_radius,
            angle: None,
            fill: Fill::new(palette::EVENT, 1.0),
            stroke: Stroke::solid(palette::EVENT_STROKE, 3.0),
            label_lines: wrap_label(&event.title, cfg.label_width, &self.measure),
            label_offset: cfg.event_radius + cfg.label_gap,
            label_line_height: cfg.label_line_height,
            bold_label: true,
            lost: false,
            highlighted: anchor == Some(event.id.as_str()),
        });
        tooltips.push((
            event.id.to_string(),
            Tooltip::Event {
                title: event.title.clone(),
                year: event.year,
                place: event.place.clone(),
            },
        ));

        #[allow(clippy::cast_precision_loss)]
        let count = scenario.nodes.len() as f64;
        for (i, source) in scenario.nodes.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let angle = i as f64 / count * 2.0 * PI;
            let opacity = if source.extant {
                cfg.extant_opacity
            } else {
                cfg.lost_opacity
            };

            nodes.push(GraphNode {
                id: source.id.to_string(),
                kind: GraphNodeKind::Source,
                center: Point::new(
                    center.x + cfg.orbit_radius * angle.cos(),
                    center.y + cfg.orbit_radius * angle.sin(),
                ),
                radius: cfg.source_radius,
                angle: Some(angle),
                fill: Fill::new(palette::SOURCE, opacity),
                stroke: Stroke::solid(palette::SOURCE_STROKE, 3.0),
                label_lines: wrap_label(&source.title, cfg.label_width, &self.measure),
                label_offset: cfg.source_radius + cfg.label_gap,
                label_line_height: cfg.label_line_height,
                bold_label: false,
                lost: !source.extant,
                highlighted: anchor == Some(source.id.as_str()),
            });
            tooltips.push((
                source.id.to_string(),
                Tooltip::Source {
                    title: source.title.clone(),
                    author_role: source.author_role.clone(),
                    year: source.year,
                    extant: source.extant,
                },
            ));
        }

        let positions: HashMap<&str, Point> =
            nodes.iter().map(|n| (n.id.as_str(), n.center)).collect();
        let mut edges = Vec::with_capacity(scenario.nodes.len() + scenario.edges.len());

        for source in &scenario.nodes {
            let from = positions[source.id.as_str()];
            edges.push(GraphEdge {
                source: source.id.to_string(),
                target: event.id.to_string(),
                kind: GraphEdgeKind::RelatesTo,
                from,
                to: center,
                stroke: Stroke::solid(palette::RELATES, 2.0),
                opacity: cfg.edge_opacity,
                resolved: true,
            });
        }

        for edge in &scenario.edges {
            let from = positions.get(edge.from.as_str()).copied();
            let to = positions.get(edge.to.as_str()).copied();
            edges.push(GraphEdge {
                source: edge.from.to_string(),
                target: edge.to.to_string(),
                kind: GraphEdgeKind::Declared(edge.kind.clone()),
                from: from.unwrap_or(center),
                to: to.unwrap_or(center),
                stroke: Stroke::dashed(palette::DECLARED, 1.5, 5.0),
                opacity: cfg.edge_opacity,
                resolved: from.is_some() && to.is_some(),
            });
        }

        GraphDiagram {
            width: cfg.width,
            height: cfg.height,
            center,
            nodes,
            edges,
            tooltips,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pst_test_utils::fixtures;

    fn layout() -> GraphLayout {
        GraphLayout::new(GraphLayoutConfig::default())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn four_sources_sit_on_right_angles() {
        let scenario = fixtures::four_source_scenario();
        let diagram = layout().compute(&scenario, None);

        let expected = [(600.0, 300.0), (400.0, 500.0), (200.0, 300.0), (400.0, 100.0)];
        let sources: Vec<_> = diagram.source_nodes().collect();
        assert_eq!(sources.len(), 4);

        for (i, (node, (x, y))) in sources.iter().zip(expected).enumerate() {
            assert_eq!(node.id, scenario.nodes[i].id.as_str());
            assert!(approx(node.center.x, x), "node {i} x = {}", node.center.x);
            assert!(approx(node.center.y, y), "node {i} y = {}", node.center.y);
            assert!(approx(node.angle.unwrap().to_degrees(), 90.0 * i as f64));
        }
    }

    #[test]
    fn event_is_central_and_opaque() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario, None);
        let event = diagram.event_node();

        assert_eq!(event.kind, GraphNodeKind::Event);
        assert_eq!(event.center, Point::new(400.0, 300.0));
        assert_eq!(event.radius, 40.0);
        assert_eq!(event.fill.opacity, 1.0);
        assert!(event.bold_label);
    }

    #[test]
    fn lost_sources_are_faded_and_marked() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario, None);

        let lost = diagram.node("lost_oral").unwrap();
        assert!(lost.lost);
        assert_eq!(lost.fill.opacity, 0.3);

        let kept = diagram.node("n1").unwrap();
        assert!(!kept.lost);
        assert_eq!(kept.fill.opacity, 0.9);
    }

    #[test]
    fn one_synthetic_edge_per_source_plus_declared() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario, None);

        let synthetic = diagram
            .edges
            .iter()
            .filter(|e| e.kind == GraphEdgeKind::RelatesTo)
            .count();
        assert_eq!(synthetic, scenario.nodes.len());
        assert_eq!(diagram.edges.len(), scenario.nodes.len() + scenario.edges.len());

        for edge in &diagram.edges {
            match edge.kind {
                GraphEdgeKind::RelatesTo => {
                    assert!(!edge.stroke.is_dashed());
                    assert_eq!(edge.to, diagram.center);
                }
                GraphEdgeKind::Declared(_) => assert!(edge.stroke.is_dashed()),
            }
        }
    }

    #[test]
    fn unresolved_edge_anchors_at_centre() {
        let scenario = fixtures::with_dangling_edge();
        let diagram = layout().compute(&scenario, None);

        let dangling = diagram.edges.iter().find(|e| !e.resolved).unwrap();
        assert_eq!(dangling.target, "ghost");
        assert_eq!(dangling.to, diagram.center);
        assert_eq!(dangling.from, diagram.node(&dangling.source).unwrap().center);
    }

    #[test]
    fn topic_anchor_highlights_without_moving() {
        let scenario = fixtures::lindisfarne();
        let layout = layout();
        let plain = layout.compute(&scenario, None);
        let anchored = layout.compute(&scenario, Some(&scenario.topics[1].id));

        let highlighted: Vec<_> = anchored
            .nodes
            .iter()
            .filter(|n| n.highlighted)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(highlighted, vec!["n2"]);

        for (a, b) in plain.nodes.iter().zip(&anchored.nodes) {
            assert_eq!(a.center, b.center);
        }
        assert_eq!(plain.edges, anchored.edges);
    }

    #[test]
    fn tooltips_describe_sources_and_event() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario, None);

        match diagram.tooltip_payload("lost_oral").unwrap() {
            Tooltip::Source { extant, year, .. } => {
                assert!(!extant);
                assert_eq!(*year, 850);
            }
            other => panic!("expected source tooltip, got {other:?}"),
        }
        assert!(matches!(
            diagram.tooltip_payload(scenario.event.id.as_str()),
            Some(Tooltip::Event { year: 793, .. })
        ));
        assert!(diagram.tooltip_payload("nope").is_none());
    }

    #[test]
    fn diagram_serializes_for_renderers() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario, None);
        let json = serde_json::to_value(&diagram).unwrap();

        assert_eq!(json["nodes"][0]["kind"], "event");
        let declared = json["edges"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["kind"]["type"] == "declared")
            .unwrap();
        assert_eq!(declared["kind"]["kind"], "draws_on");
        assert_eq!(declared["stroke"]["dash"], serde_json::json!([5.0, 5.0]));
    }

    #[test]
    fn labels_wrap_with_injected_measure() {
        let scenario = fixtures::lindisfarne();
        let config = GraphLayoutConfig {
            label_width: 100.0,
            ..GraphLayoutConfig::default()
        };
        let layout = GraphLayout::with_measure(config, crate::wrap::FixedAdvance(6.0));
        let diagram = layout.compute(&scenario, None);

        for node in &diagram.nodes {
            for line in &node.label_lines {
                if line.contains(' ') {
                    assert!(line.chars().count() as f64 * 6.0 <= 100.0, "{line}");
                }
            }
        }
    }
}
