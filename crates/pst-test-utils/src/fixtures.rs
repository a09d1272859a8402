//! Scenario fixtures
//!
//! `lindisfarne` is the workhorse: three extant sources, one lost source,
//! two topics (anchored on the event and on `n2`) and two declared edges.

use pst_model::{
    Difficulty, Edge, Event, Scenario, SourceKind, SourceNode, Topic, TransmissionKind,
    TransmissionStep, ValidatedScenario,
};

pub const LINDISFARNE_EVENT: &str = "evt_lindisfarne";

fn source(id: &str, title: &str, author_role: &str, year: i32, extant: bool) -> SourceNode {
    SourceNode {
        id: id.into(),
        kind: SourceKind::Text,
        title: title.to_string(),
        author_role: author_role.to_string(),
        year,
        place: None,
        extant,
        transmission: Vec::new(),
        description: None,
    }
}

fn topic(id: &str, label: &str, anchor: Option<&str>) -> Topic {
    Topic {
        id: id.into(),
        label: label.to_string(),
        anchor: anchor.map(str::to_string),
    }
}

fn event(id: &str, title: &str, year: i32, place: &str) -> Event {
    Event {
        id: id.into(),
        title: title.to_string(),
        year,
        place: place.to_string(),
        description: None,
        composition_info: None,
        image_url: None,
    }
}

pub fn lindisfarne_raw() -> Scenario {
    let mut chronicle = source(
        "n2",
        "Anglo-Saxon Chronicle",
        "Monastic compilers",
        890,
        true,
    );
    chronicle.place = Some("Wessex".to_string());
    chronicle.transmission = vec![
        TransmissionStep {
            via: "West Saxon court".to_string(),
            year: 890,
            kind: TransmissionKind::Compilation,
        },
        TransmissionStep {
            via: "Peterborough Abbey".to_string(),
            year: 1121,
            kind: TransmissionKind::Copy,
        },
    ];

    Scenario {
        id: "lindisfarne".into(),
        event: event(
            LINDISFARNE_EVENT,
            "Viking Raid on Lindisfarne",
            793,
            "Lindisfarne, Northumbria",
        ),
        nodes: vec![
            source(
                "n1",
                "Letter of Alcuin to King Æthelred",
                "Contemporary scholar",
                793,
                true,
            ),
            source(
                "lost_oral",
                "Lost Northumbrian annal",
                "Local annalist",
                850,
                false,
            ),
            chronicle,
            source(
                "n3",
                "Historia Regum attributed to Symeon of Durham",
                "Anglo-Norman historian",
                1129,
                true,
            ),
        ],
        edges: vec![
            Edge {
                from: "n2".into(),
                to: "lost_oral".into(),
                kind: "draws_on".to_string(),
            },
            Edge {
                from: "n3".into(),
                to: "n2".into(),
                kind: "copies".to_string(),
            },
        ],
        topics: vec![
            topic(
                "t_raid",
                "What happened during the raid?",
                Some(LINDISFARNE_EVENT),
            ),
            topic(
                "t_chronicle",
                "How did later chroniclers record the raid?",
                Some("n2"),
            ),
        ],
        difficulty: Difficulty::Medium,
    }
}

pub fn lindisfarne() -> ValidatedScenario {
    validated(lindisfarne_raw())
}

pub fn four_source_scenario_raw() -> Scenario {
    Scenario {
        id: "four".into(),
        event: event("evt_four", "Synod of Whitby", 664, "Whitby"),
        nodes: (1..=4)
            .map(|i| {
                source(
                    &format!("f{i}"),
                    &format!("Source {i}"),
                    "scribe",
                    660 + i,
                    true,
                )
            })
            .collect(),
        edges: Vec::new(),
        topics: vec![topic("t1", "Who attended the synod?", None)],
        difficulty: Difficulty::Easy,
    }
}

pub fn four_source_scenario() -> ValidatedScenario {
    validated(four_source_scenario_raw())
}

pub fn with_dangling_edge() -> ValidatedScenario {
    let mut scenario = lindisfarne_raw();
    scenario.edges.push(Edge {
        from: "n1".into(),
        to: "ghost".into(),
        kind: "cites".to_string(),
    });
    validated(scenario)
}

pub fn event_only() -> ValidatedScenario {
    validated(Scenario {
        id: "bare".into(),
        event: event("evt_bare", "Battle of Brunanburh", 937, "Unknown"),
        nodes: Vec::new(),
        edges: Vec::new(),
        topics: vec![topic("t1", "Where was the battle fought?", None)],
        difficulty: Difficulty::Hard,
    })
}

/// `count` distinct copies of `lindisfarne_raw` with ids `s1..`
pub fn session_of(count: usize) -> Vec<Scenario> {
    (1..=count)
        .map(|i| {
            let mut scenario = lindisfarne_raw();
            scenario.id = format!("s{i}").into();
            scenario
        })
        .collect()
}

pub fn without_topics() -> Scenario {
    let mut scenario = lindisfarne_raw();
    scenario.topics.clear();
    scenario
}

pub fn with_duplicate_node() -> Scenario {
    let mut scenario = lindisfarne_raw();
    let copy = scenario.nodes[0].clone();
    scenario.nodes.push(copy);
    scenario
}

fn validated(scenario: Scenario) -> ValidatedScenario {
    scenario.validate().expect("fixture scenario is valid")
}
