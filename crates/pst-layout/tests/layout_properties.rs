use pst_layout::{
    wrap_label, CharCount, GraphLayout, GraphLayoutConfig, Row, TimelineConfig, TimelineLayout,
};
use pst_model::{Difficulty, Event, Scenario, SourceKind, SourceNode, Topic, ValidatedScenario};
use proptest::prelude::*;

fn scenario_from(event_year: i32, sources: Vec<(i32, bool)>) -> ValidatedScenario {
    let nodes = sources
        .into_iter()
        .enumerate()
        .map(|(i, (year, extant))| SourceNode {
            id: format!("n{i}").into(),
            kind: SourceKind::Text,
            title: format!("Source number {i} from the monastery archive"),
            author_role: "chronicler".to_string(),
            year,
            place: None,
            extant,
            transmission: Vec::new(),
            description: None,
        })
        .collect();

    Scenario {
        id: "generated".into(),
        event: Event {
            id: "evt".into(),
            title: "Generated event".to_string(),
            year: event_year,
            place: "Somewhere".to_string(),
            description: None,
            composition_info: None,
            image_url: None,
        },
        nodes,
        edges: Vec::new(),
        topics: vec![Topic {
            id: "t1".into(),
            label: "What happened?".to_string(),
            anchor: None,
        }],
        difficulty: Difficulty::Medium,
    }
    .validate()
    .unwrap()
}

fn sources() -> impl Strategy<Value = Vec<(i32, bool)>> {
    prop::collection::vec((500i32..1600, any::<bool>()), 0..10)
}

proptest! {
    #[test]
    fn wrapped_lines_fit_and_rejoin(
        label in "[a-zA-Z \t]{0,80}",
        width in 1.0f64..40.0,
    ) {
        let lines = wrap_label(&label, width, &CharCount);

        for line in &lines {
            // only a line holding a single word may overflow
            prop_assert!(
                line.chars().count() as f64 <= width
                    || !line.trim_start_matches(' ').contains(' ')
            );
        }
        prop_assert_eq!(lines.join(" "), label);
    }

    #[test]
    fn graph_sources_share_the_orbit(event_year in 500i32..1600, sources in sources()) {
        let scenario = scenario_from(event_year, sources);
        let layout = GraphLayout::new(GraphLayoutConfig::default());
        let diagram = layout.compute(&scenario, None);

        prop_assert_eq!(diagram.nodes.len(), scenario.nodes.len() + 1);
        for node in diagram.source_nodes() {
            let distance = node.center.distance(diagram.center);
            prop_assert!((distance - 200.0).abs() < 1e-6);
        }
    }

    #[test]
    fn graph_layout_is_deterministic(event_year in 500i32..1600, sources in sources()) {
        let scenario = scenario_from(event_year, sources);
        let layout = GraphLayout::new(GraphLayoutConfig::default());

        prop_assert_eq!(layout.compute(&scenario, None), layout.compute(&scenario, None));
    }

    #[test]
    fn timeline_layout_is_deterministic(event_year in 500i32..1600, sources in sources()) {
        let scenario = scenario_from(event_year, sources);
        let layout = TimelineLayout::new(TimelineConfig::default());

        prop_assert_eq!(layout.compute(&scenario), layout.compute(&scenario));
    }

    #[test]
    fn timeline_blocks_stay_on_the_axis_span(event_year in 500i32..1600, sources in sources()) {
        let scenario = scenario_from(event_year, sources);
        let diagram = TimelineLayout::new(TimelineConfig::default()).compute(&scenario);

        for block in &diagram.blocks {
            let x = block.rect.center_x();
            prop_assert!(x >= 40.0 - 1e-9 && x <= 1160.0 + 1e-9);
            let above = block.rect.bottom() <= diagram.axis_y();
            prop_assert_eq!(above, block.row == Row::Above);
            prop_assert_eq!(block.lost_caption.is_some(), !scenario.nodes[block.index].extant);
        }
        prop_assert!(diagram.ticks.windows(2).all(|w| w[1].year - w[0].year == 100));
    }
}
