//! Chronological timeline
//!
//! A horizontal year axis with century ticks, the event block above the axis
//! and one block per source. Sources alternate above and below the axis by
//! index parity. That keeps neighbours with close years apart in the common
//! case; it is not a collision solver, and dense clusters of years can still
//! overlap.

use crate::geometry::{palette, Fill, Point, Rect, Segment, Stroke};
use crate::wrap::{truncate_with_ellipsis, wrap_label, CharCount, TextMeasure};
use pst_model::ValidatedScenario;
use serde::Serialize;

/// Canvas and block constants for the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineConfig {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Horizontal margin on both sides of the axis
    pub margin: f64,
    /// Years added before the earliest and after the latest year
    pub year_padding: i32,
    /// Tick spacing in years
    pub tick_step: i32,
    /// Most ticks drawn; the spacing grows tenfold until the range fits
    pub max_ticks: usize,
    /// Half height of a tick mark
    pub tick_half_height: f64,
    /// Distance from the axis to tick labels
    pub tick_label_offset: f64,
    /// Event block size
    pub event_block: (f64, f64),
    /// Node block size
    pub node_block: (f64, f64),
    /// Distance from the axis up to the top of blocks placed above it
    pub above_offset: f64,
    /// Distance from the axis down to the top of blocks placed below it
    pub below_offset: f64,
    /// Maximum title length before truncation
    pub title_budget: usize,
    /// Title wrap budget, in [`TextMeasure`] units
    pub title_width: f64,
    /// Event label wrap budget, in [`TextMeasure`] units
    pub event_label_width: f64,
    /// Opacity of lost blocks
    pub lost_opacity: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 300.0,
            margin: 40.0,
            year_padding: 10,
            tick_step: 100,
            max_ticks: 64,
            tick_half_height: 10.0,
            tick_label_offset: 30.0,
            event_block: (120.0, 50.0),
            node_block: (140.0, 60.0),
            above_offset: 80.0,
            below_offset: 50.0,
            title_budget: 30,
            title_width: 22.0,
            event_label_width: 18.0,
            lost_opacity: 0.3,
        }
    }
}

/// Linear map from years to canvas x
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearScale {
    /// First year of the domain
    pub min_year: i32,
    /// Last year of the domain
    pub max_year: i32,
    /// x of `min_year`
    pub x_start: f64,
    /// x of `max_year`
    pub x_end: f64,
}

impl YearScale {
    /// Canvas x for a year
    #[must_use]
    pub fn x(&self, year: i32) -> f64 {
        let span = f64::from(self.max_year) - f64::from(self.min_year);
        if span == 0.0 {
            return (self.x_start + self.x_end) / 2.0;
        }
        let offset = f64::from(year) - f64::from(self.min_year);
        self.x_start + offset / span * (self.x_end - self.x_start)
    }
}

/// A century marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// Year marked
    pub year: i32,
    /// Vertical tick line
    pub line: Segment,
    /// Label text, `"<year> CE"`
    pub label: String,
    /// Label anchor (horizontally centred)
    pub label_at: Point,
}

/// Whether a block sits above or below the axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Row {
    /// Above the axis
    Above,
    /// Below the axis
    Below,
}

impl Row {
    /// Row for the `index`-th source
    #[inline]
    #[must_use]
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Row::Above
        } else {
            Row::Below
        }
    }
}

/// The event block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBlock {
    /// Block outline
    pub rect: Rect,
    /// Block fill
    pub fill: Fill,
    /// Wrapped label inside the block
    pub label_lines: Vec<String>,
    /// Year caption above the block
    pub year_label: String,
    /// Event title for hover
    pub tooltip: String,
}

/// A source block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeBlock {
    /// Source node id
    pub node_id: String,
    /// Position in the scenario's node list
    pub index: usize,
    /// Above or below the axis
    pub row: Row,
    /// Block outline
    pub rect: Rect,
    /// Block fill
    pub fill: Fill,
    /// Dashed border for lost sources
    pub border: Option<Stroke>,
    /// Truncated, wrapped title
    pub title_lines: Vec<String>,
    /// Year caption, omitted when equal to the event year
    pub year_label: Option<String>,
    /// `(lost)` caption for non-extant sources
    pub lost_caption: Option<String>,
    /// Line from the block to the axis
    pub connector: Segment,
    /// Title, role and year, survival status
    pub tooltip: String,
}

/// Complete timeline geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineDiagram {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Year mapping
    pub scale: YearScale,
    /// The axis line
    pub axis: Segment,
    /// Century ticks, ascending
    pub ticks: Vec<Tick>,
    /// Event block
    pub event: EventBlock,
    /// Source blocks in node order
    pub blocks: Vec<NodeBlock>,
}

impl TimelineDiagram {
    /// y of the axis
    #[inline]
    #[must_use]
    pub fn axis_y(&self) -> f64 {
        self.axis.from.y
    }

    /// Block for a source id
    #[must_use]
    pub fn block(&self, node_id: &str) -> Option<&NodeBlock> {
        self.blocks.iter().find(|b| b.node_id == node_id)
    }
}

/// Timeline layout engine
#[derive(Debug, Clone)]
pub struct TimelineLayout<M = CharCount> {
    config: TimelineConfig,
    measure: M,
}

impl TimelineLayout<CharCount> {
    /// Engine measuring labels by character count
    #[inline]
    #[must_use]
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            measure: CharCount,
        }
    }
}

impl Default for TimelineLayout<CharCount> {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl<M: TextMeasure> TimelineLayout<M> {
    /// Engine with a custom text measure
    #[inline]
    #[must_use]
    pub fn with_measure(config: TimelineConfig, measure: M) -> Self {
        Self { config, measure }
    }

    /// Layout configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Year range and mapping for a scenario
    #[must_use]
    pub fn scale(&self, scenario: &ValidatedScenario) -> YearScale {
        let years = std::iter::once(scenario.event.year).chain(scenario.nodes.iter().map(|n| n.year));
        let (min, max) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));

        YearScale {
            min_year: min.saturating_sub(self.config.year_padding),
            max_year: max.saturating_add(self.config.year_padding),
            x_start: self.config.margin,
            x_end: self.config.width - self.config.margin,
        }
    }

    /// Place the axis, ticks, event and source blocks
    #[must_use]
    pub fn compute(&self, scenario: &ValidatedScenario) -> TimelineDiagram {
        let cfg = &self.config;
        let scale = self.scale(scenario);
        let axis_y = cfg.height / 2.0;
        let axis = Segment {
            from: Point::new(scale.x_start, axis_y),
            to: Point::new(scale.x_end, axis_y),
        };

        let ticks = self.ticks(&scale, axis_y);
        let event = self.event_block(scenario, &scale, axis_y);
        let blocks = scenario
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let row = Row::for_index(index);
                let top = match row {
                    Row::Above => axis_y - cfg.above_offset,
                    Row::Below => axis_y + cfg.below_offset,
                };
                let rect = Rect::centered_at(scale.x(node.year), top, cfg.node_block.0, cfg.node_block.1);
                let connector_start = match row {
                    Row::Above => rect.bottom(),
                    Row::Below => rect.y,
                };
                let title = truncate_with_ellipsis(&node.title, cfg.title_budget);

                NodeBlock {
                    node_id: node.id.to_string(),
                    index,
                    row,
                    rect,
                    fill: if node.extant {
                        Fill::new(palette::SOURCE, 1.0)
                    } else {
                        Fill::new(palette::LOST, cfg.lost_opacity)
                    },
                    border: (!node.extant).then(|| Stroke::dashed(palette::MUTED, 2.0, 4.0)),
                    title_lines: wrap_label(&title, cfg.title_width, &self.measure),
                    year_label: (node.year != scenario.event.year).then(|| node.year.to_string()),
                    lost_caption: (!node.extant).then(|| "(lost)".to_string()),
                    connector: Segment {
                        from: Point::new(rect.center_x(), connector_start),
                        to: Point::new(rect.center_x(), axis_y),
                    },
                    tooltip: format!(
                        "{}\n{} ({})\n{}",
                        node.title,
                        node.author_role,
                        node.year,
                        if node.extant { "Extant" } else { "Lost" }
                    ),
                }
            })
            .collect();

        TimelineDiagram {
            width: cfg.width,
            height: cfg.height,
            scale,
            axis,
            ticks,
            event,
            blocks,
        }
    }

    fn ticks(&self, scale: &YearScale, axis_y: f64) -> Vec<Tick> {
        let cfg = &self.config;
        let (lo, hi) = (i64::from(scale.min_year), i64::from(scale.max_year));
        let max_ticks = i64::try_from(cfg.max_ticks.max(3)).unwrap_or(i64::MAX);
        let mut step = i64::from(cfg.tick_step.max(1));
        while (hi - lo) / step + 3 > max_ticks {
            step *= 10;
        }
        let first = lo.div_euclid(step) * step;
        let last = -(-hi).div_euclid(step) * step;

        (first..=last)
            .step_by(usize::try_from(step).unwrap_or(usize::MAX))
            .filter_map(|year| i32::try_from(year).ok())
            .map(|year| {
                let x = scale.x(year);
                Tick {
                    year,
                    line: Segment {
                        from: Point::new(x, axis_y - cfg.tick_half_height),
                        to: Point::new(x, axis_y + cfg.tick_half_height),
                    },
                    label: format!("{year} CE"),
                    label_at: Point::new(x, axis_y + cfg.tick_label_offset),
                }
            })
            .collect()
    }

    fn event_block(&self, scenario: &ValidatedScenario, scale: &YearScale, axis_y: f64) -> EventBlock {
        let cfg = &self.config;
        let event = &scenario.event;
        EventBlock {
            rect: Rect::centered_at(
                scale.x(event.year),
                axis_y - cfg.above_offset,
                cfg.event_block.0,
                cfg.event_block.1,
            ),
            fill: Fill::new(palette::EVENT, 1.0),
            label_lines: wrap_label("EVENT", cfg.event_label_width, &self.measure),
            year_label: event.year.to_string(),
            tooltip: event.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pst_test_utils::fixtures;

    fn layout() -> TimelineLayout {
        TimelineLayout::new(TimelineConfig::default())
    }

    #[test]
    fn scale_pads_year_range() {
        let scenario = fixtures::lindisfarne();
        let scale = layout().scale(&scenario);

        assert_eq!(scale.min_year, 783);
        assert_eq!(scale.max_year, 1139);
        assert_eq!(scale.x(783), 40.0);
        assert_eq!(scale.x(1139), 1160.0);
    }

    #[test]
    fn century_ticks_cover_range() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario);

        let years: Vec<i32> = diagram.ticks.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![700, 800, 900, 1000, 1100, 1200]);
        assert_eq!(diagram.ticks[1].label, "800 CE");
        assert_eq!(diagram.ticks[1].label_at.y, 180.0);
    }

    #[test]
    fn blocks_alternate_rows() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario);

        for block in &diagram.blocks {
            let expected = if block.index % 2 == 0 { Row::Above } else { Row::Below };
            assert_eq!(block.row, expected);
            match block.row {
                Row::Above => assert_eq!(block.rect.y, 70.0),
                Row::Below => assert_eq!(block.rect.y, 200.0),
            }
        }
    }

    #[test]
    fn blocks_centre_on_their_year() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario);

        for (block, node) in diagram.blocks.iter().zip(&scenario.nodes) {
            assert!((block.rect.center_x() - diagram.scale.x(node.year)).abs() < 1e-9);
            assert_eq!(block.rect.width, 140.0);
        }
        let event_x = diagram.scale.x(scenario.event.year);
        assert!((diagram.event.rect.center_x() - event_x).abs() < 1e-9);
        assert_eq!(diagram.event.rect.y, 70.0);
    }

    #[test]
    fn year_label_hidden_when_matching_event() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario);

        assert_eq!(diagram.block("n1").unwrap().year_label, None);
        assert_eq!(diagram.block("n2").unwrap().year_label.as_deref(), Some("890"));
    }

    #[test]
    fn lost_blocks_are_marked() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario);

        let lost = diagram.block("lost_oral").unwrap();
        assert_eq!(lost.lost_caption.as_deref(), Some("(lost)"));
        assert!(lost.border.as_ref().unwrap().is_dashed());
        assert_eq!(lost.fill.opacity, 0.3);
        assert!(lost.tooltip.ends_with("Lost"));

        let kept = diagram.block("n1").unwrap();
        assert!(kept.lost_caption.is_none());
        assert!(kept.border.is_none());
    }

    #[test]
    fn long_titles_truncate_then_wrap() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario);
        let block = diagram.block("n3").unwrap();

        let joined = block.title_lines.join(" ");
        assert!(joined.ends_with("..."), "{joined}");
        assert!(joined.chars().count() <= 33);
        assert!(block.title_lines.len() > 1);
    }

    #[test]
    fn connectors_reach_the_axis() {
        let scenario = fixtures::lindisfarne();
        let diagram = layout().compute(&scenario);

        for block in &diagram.blocks {
            assert_eq!(block.connector.to.y, diagram.axis_y());
            match block.row {
                Row::Above => assert_eq!(block.connector.from.y, block.rect.bottom()),
                Row::Below => assert_eq!(block.connector.from.y, block.rect.y),
            }
        }
    }

    #[test]
    fn event_only_scenario() {
        let scenario = fixtures::event_only();
        let diagram = layout().compute(&scenario);

        assert!(diagram.blocks.is_empty());
        assert_eq!(diagram.scale.min_year, scenario.event.year - 10);
        assert_eq!(diagram.event.label_lines, vec!["EVENT"]);
    }

    #[test]
    fn extreme_years_saturate() {
        let mut raw = fixtures::lindisfarne_raw();
        raw.event.year = i32::MIN;
        raw.nodes[0].year = i32::MAX;
        let scenario = raw.validate().unwrap();
        let diagram = layout().compute(&scenario);

        assert_eq!(diagram.scale.min_year, i32::MIN);
        assert_eq!(diagram.scale.max_year, i32::MAX);
        assert_eq!(diagram.scale.x(i32::MIN), 40.0);
        assert_eq!(diagram.scale.x(i32::MAX), 1160.0);
        assert!(diagram.ticks.len() <= 64);
        assert!(diagram.ticks.windows(2).all(|w| w[0].year < w[1].year));
        for block in &diagram.blocks {
            assert!(block.rect.center_x().is_finite());
        }
    }

    #[test]
    fn dense_range_widens_tick_spacing() {
        let config = TimelineConfig {
            max_ticks: 5,
            ..TimelineConfig::default()
        };
        let scenario = fixtures::lindisfarne();
        let diagram = TimelineLayout::new(config).compute(&scenario);

        let years: Vec<i32> = diagram.ticks.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![0, 1000, 2000]);
    }
}
