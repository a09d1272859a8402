//! PST Layout - diagram geometry for classification scenarios
//!
//! Two pure layout engines turn a [`ValidatedScenario`](pst_model::ValidatedScenario)
//! into renderer-neutral geometry:
//! - [`GraphLayout`]: event at the centre, sources on a circle around it,
//!   synthetic and declared relationship edges
//! - [`TimelineLayout`]: year axis with century ticks, event block and
//!   sources alternating above and below the axis
//!
//! Neither engine touches a drawing surface. Label wrapping goes through a
//! [`TextMeasure`] so output is reproducible in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use pst_layout::{GraphLayout, GraphLayoutConfig, TimelineLayout};
//!
//! let graph = GraphLayout::new(GraphLayoutConfig::default()).compute(&scenario, None);
//! let timeline = TimelineLayout::default().compute(&scenario);
//! println!("{} nodes, {} ticks", graph.nodes.len(), timeline.ticks.len());
//! ```

#![warn(unreachable_pub)]

pub mod geometry;
pub mod graph;
pub mod timeline;
pub mod wrap;

pub use geometry::{palette, Fill, Point, Rect, Segment, Stroke};
pub use graph::{
    GraphDiagram, GraphEdge, GraphEdgeKind, GraphLayout, GraphLayoutConfig, GraphNode,
    GraphNodeKind, Tooltip,
};
pub use timeline::{
    EventBlock, NodeBlock, Row, Tick, TimelineConfig, TimelineDiagram, TimelineLayout, YearScale,
};
pub use wrap::{truncate_with_ellipsis, wrap_label, CharCount, FixedAdvance, TextMeasure};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
