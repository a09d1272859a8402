//! `pst` - Primary Source Trainer command line
//!
//! ```text
//! pst scenarios [--file F | --api URL]
//! pst layout --scenario ID [--topic ID] [--file F | --api URL]
//! pst report --file RESULTS.json [--threshold N] [--student NAME] [--json]
//! ```

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pst_core::{
    HttpTrainerApi, ScenarioSource, SessionAggregator, StaticScenarios, TrainerConfig,
};
use pst_layout::{GraphLayout, GraphLayoutConfig, TimelineConfig, TimelineLayout};
use pst_model::{GradingResult, Scenario, TopicId};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    if let Err(err) = run(&matches).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn source_args() -> [Arg; 2] {
    [
        Arg::new("file")
            .long("file")
            .value_parser(value_parser!(PathBuf))
            .help("Read scenarios from a JSON file; takes precedence over --api"),
        Arg::new("api")
            .long("api")
            .env("PST_API_URL")
            .help("Trainer service base URL"),
    ]
}

fn cli() -> Command {
    Command::new("pst")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Primary Source Trainer: scenarios, diagrams and session reports")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("scenarios")
                .about("List scenarios with their validation status")
                .args(source_args()),
        )
        .subcommand(
            Command::new("layout")
                .about("Print graph and timeline geometry for one scenario as JSON")
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .required(true)
                        .help("Scenario id"),
                )
                .arg(
                    Arg::new("topic")
                        .long("topic")
                        .help("Topic whose anchor is highlighted (default: first topic)"),
                )
                .args(source_args()),
        )
        .subcommand(
            Command::new("report")
                .about("Summarise a JSON array of grading results")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Grading results file"),
                )
                .arg(
                    Arg::new("threshold")
                        .long("threshold")
                        .env("PST_PASS_THRESHOLD")
                        .default_value("70")
                        .value_parser(value_parser!(u32).range(0..=100))
                        .help("Pass threshold in percent"),
                )
                .arg(
                    Arg::new("student")
                        .long("student")
                        .default_value("Student")
                        .help("Name printed on the report"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pst=info,warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("scenarios", args)) => {
            let scenarios = load_scenarios(args).await?;
            for line in scenario_listing(&scenarios) {
                println!("{line}");
            }
            Ok(())
        }
        Some(("layout", args)) => {
            let scenarios = load_scenarios(args).await?;
            let scenario_id = args
                .get_one::<String>("scenario")
                .context("--scenario is required")?;
            let topic = args.get_one::<String>("topic").map(String::as_str);
            let output = layout_scenario(scenarios, scenario_id, topic)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Some(("report", args)) => {
            let path = args.get_one::<PathBuf>("file").context("--file is required")?;
            let threshold = args.get_one::<u32>("threshold").copied().unwrap_or(70);
            let student = args
                .get_one::<String>("student")
                .map_or("Student", String::as_str);

            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let results: Vec<GradingResult> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing grading results in {}", path.display()))?;
            let summary = SessionAggregator::from_results(results, threshold).summary()?;

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.render_text(student));
            }
            Ok(())
        }
        _ => bail!("unknown command"),
    }
}

async fn load_scenarios(args: &ArgMatches) -> Result<Vec<Scenario>> {
    if let Some(path) = args.get_one::<PathBuf>("file") {
        debug!(path = %path.display(), "reading scenarios from file");
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let source = StaticScenarios::from_json(&raw)
            .with_context(|| format!("parsing scenarios in {}", path.display()))?;
        return Ok(source.fetch_scenarios().await?);
    }

    let mut config = TrainerConfig::from_env();
    if let Some(url) = args.get_one::<String>("api") {
        config = config.with_api_url(url.clone());
    }
    let api = HttpTrainerApi::new(&config);
    info!(url = api.base_url(), "fetching scenarios");
    api.fetch_scenarios()
        .await
        .with_context(|| format!("fetching scenarios from {}", api.base_url()))
}

fn scenario_listing(scenarios: &[Scenario]) -> Vec<String> {
    scenarios
        .iter()
        .map(|scenario| {
            let lost = scenario.nodes.iter().filter(|n| !n.extant).count();
            let status = match scenario.clone().validate() {
                Ok(_) => "ok".to_string(),
                Err(err) => format!("INVALID: {err}"),
            };
            format!(
                "{:<24} {} ({}) - {} sources, {} lost, {} topics, {} - {status}",
                scenario.id,
                scenario.event.title,
                scenario.event.year,
                scenario.nodes.len(),
                lost,
                scenario.topics.len(),
                scenario.difficulty,
            )
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct LayoutOutput {
    scenario: String,
    topic: TopicId,
    graph: pst_layout::GraphDiagram,
    timeline: pst_layout::TimelineDiagram,
}

fn layout_scenario(
    scenarios: Vec<Scenario>,
    scenario_id: &str,
    topic: Option<&str>,
) -> Result<LayoutOutput> {
    let Some(scenario) = scenarios.into_iter().find(|s| s.id.as_str() == scenario_id) else {
        bail!("no scenario with id '{scenario_id}'");
    };
    let scenario = scenario
        .validate()
        .with_context(|| format!("scenario '{scenario_id}' cannot be laid out"))?;

    let topic = match topic {
        Some(id) => scenario
            .topic(id)
            .with_context(|| format!("scenario '{scenario_id}' has no topic '{id}'"))?,
        None => scenario.default_topic(),
    }
    .id
    .clone();

    Ok(LayoutOutput {
        scenario: scenario.id.to_string(),
        graph: GraphLayout::new(GraphLayoutConfig::default()).compute(&scenario, Some(&topic)),
        timeline: TimelineLayout::new(TimelineConfig::default()).compute(&scenario),
        topic,
    })
}
