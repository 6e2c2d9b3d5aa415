//! Headless Progression Simulator
//!
//! Plays random actions for a party of characters and reports how far each
//! one progressed. Useful for tuning the numbers in data/progression.toml.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use unified_progression::character::{CharacterLedger, Domain};
use unified_progression::core::{CharacterId, ManualClock, ProgressionConfig, Result};
use unified_progression::progression::ProgressionEvent;
use unified_progression::resolution::{ActionKind, ActionRequest, ResolutionMethod, RiskLevel};
use unified_progression::session::GameSession;

/// Headless Progression Simulator - random play for balance tuning
#[derive(Parser, Debug)]
#[command(name = "progression_sim")]
#[command(about = "Simulate random actions for a party and report growth")]
struct Args {
    /// Number of characters in the party
    #[arg(long, default_value_t = 8)]
    characters: usize,

    /// Actions per character
    #[arg(long, default_value_t = 200)]
    actions: usize,

    /// Seconds of game time between rounds
    #[arg(long, default_value_t = 60)]
    round_secs: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning file (defaults to built-in values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log every action
    #[arg(long, short = 'v')]
    verbose: bool,
}

const GOALS: &[&str] = &[
    "Become the greatest swordsman",
    "Uncover the lost history of the empire",
    "Forge armor fit for a king",
    "Negotiate peace between the clans",
    "Command an army",
    "Track the beast to its lair",
    "Keep my oath to the order",
];

fn tags_for(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Body => &["Swordsmanship", "Athletics", "Brawling"],
        Domain::Mind => &["History", "Tactics", "Medicine"],
        Domain::Craft => &["Smithing", "Tinkering", "Alchemy"],
        Domain::Social => &["Persuasion", "Deception", "Etiquette"],
        Domain::Authority => &["Command", "Intimidation", "Law"],
        Domain::Awareness => &["Tracking", "Perception", "Navigation"],
        Domain::Spirit => &["Meditation", "Faith", "Willpower"],
    }
}

const KINDS: &[ActionKind] = &[
    ActionKind::General,
    ActionKind::General,
    ActionKind::CombatAttack,
    ActionKind::PhysicalChallenge,
    ActionKind::Contested,
    ActionKind::ExperimentalCraft,
    ActionKind::MentalContest,
];

const RISKS: &[RiskLevel] = &[
    RiskLevel::Low,
    RiskLevel::Medium,
    RiskLevel::Medium,
    RiskLevel::High,
    RiskLevel::Extreme,
];

fn random_request(rng: &mut ChaCha8Rng) -> Result<ActionRequest> {
    let domain = *Domain::all().choose(rng).unwrap_or(&Domain::Body);
    let tag = tags_for(domain).choose(rng).copied().unwrap_or("Improvisation");

    let mut request = ActionRequest::new(domain)
        .with_tag(tag)?
        .with_kind(*KINDS.choose(rng).unwrap_or(&ActionKind::General))
        .with_risk(*RISKS.choose(rng).unwrap_or(&RiskLevel::Medium))
        .with_difficulty(rng.gen_range(8..=22))
        .with_impact(rng.gen_range(0..=3));
    if rng.gen_bool(0.15) {
        request = request.creative();
    }
    if rng.gen_bool(0.1) {
        request = request.in_combat();
    }
    Ok(request)
}

/// Per-character results
#[derive(Debug, Default, Serialize)]
struct CharacterSummary {
    id: String,
    goal: String,
    actions: usize,
    successes: usize,
    discrete_rolls: usize,
    critical_successes: usize,
    reduced_by_grinding: usize,
    growth_gained: u32,
    insight_gained: u32,
    tier_advances: usize,
    rank_ups: usize,
    mastery_paths: Vec<String>,
    domains: Vec<(String, u32, String)>,
    insight_balance: u32,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct SimulationResult {
    seed: u64,
    characters: usize,
    actions_per_character: usize,
    summaries: Vec<CharacterSummary>,
}

struct SimCharacter {
    id: CharacterId,
    rng: ChaCha8Rng,
    summary: CharacterSummary,
}

impl SimCharacter {
    fn step(&mut self, session: &GameSession) -> Result<()> {
        let request = random_request(&mut self.rng)?;
        let report = session.resolve_and_apply(self.id, &request, &mut self.rng)?;

        let summary = &mut self.summary;
        summary.actions += 1;
        summary.successes += report.outcome.success as usize;
        summary.critical_successes += report.outcome.critical_success as usize;
        if report.outcome.method == ResolutionMethod::DiscreteRoll {
            summary.discrete_rolls += 1;
        }
        if report.growth.grind_factor.is_reduced() {
            summary.reduced_by_grinding += 1;
        }
        summary.growth_gained += report.growth.growth_points;
        summary.insight_gained += report.growth.insight_points;
        for event in &report.events {
            match event {
                ProgressionEvent::DomainTierAdvanced { .. } => summary.tier_advances += 1,
                ProgressionEvent::TagRankUp { .. } => summary.rank_ups += 1,
                _ => {}
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "unified_progression=debug"
    } else {
        "unified_progression=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => ProgressionConfig::load(path)?,
        None => ProgressionConfig::default(),
    };

    let clock = Arc::new(ManualClock::new(0));
    let session = GameSession::new(config)?.with_clock(clock.clone());

    let mut setup_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut party = Vec::with_capacity(args.characters);
    for index in 0..args.characters {
        let goal = GOALS[index % GOALS.len()];
        let mut ledger = CharacterLedger::new().with_goal(goal);
        for domain in Domain::all() {
            ledger = ledger.with_domain(*domain, setup_rng.gen_range(2..=10))?;
        }
        let id = session.add_character(ledger)?;
        party.push(SimCharacter {
            id,
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(index as u64 + 1)),
            summary: CharacterSummary {
                id: id.to_string(),
                goal: goal.to_string(),
                ..Default::default()
            },
        });
    }

    tracing::info!(
        "Simulating {} characters x {} actions (seed {})",
        args.characters,
        args.actions,
        seed
    );

    // Characters are independent; each round runs them in parallel
    for _ in 0..args.actions {
        party
            .par_iter_mut()
            .map(|character| character.step(&session))
            .collect::<Result<Vec<()>>>()?;
        clock.advance(args.round_secs);
    }

    for character in &mut party {
        let ledger = session.ledger_snapshot(character.id)?;
        character.summary.domains = ledger
            .domains()
            .iter()
            .map(|(domain, value)| {
                let tier = ledger.domain_tier(*domain).map(|t| t.to_string());
                (domain.to_string(), *value, tier.unwrap_or_default())
            })
            .collect();
        character.summary.mastery_paths = ledger
            .mastery_paths()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        character.summary.insight_balance = ledger.insight_points();
    }

    let result = SimulationResult {
        seed,
        characters: args.characters,
        actions_per_character: args.actions,
        summaries: party.into_iter().map(|c| c.summary).collect(),
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            println!("Progression Simulation");
            println!("======================");
            println!("Seed: {}", result.seed);
            for summary in &result.summaries {
                println!();
                println!("{} ({})", summary.id, summary.goal);
                println!(
                    "  {} actions, {} successes ({} rolled, {} critical), {} reduced by grinding",
                    summary.actions,
                    summary.successes,
                    summary.discrete_rolls,
                    summary.critical_successes,
                    summary.reduced_by_grinding
                );
                println!(
                    "  growth {} | insight {} gained, {} held | {} tier advances | {} rank-ups",
                    summary.growth_gained,
                    summary.insight_gained,
                    summary.insight_balance,
                    summary.tier_advances,
                    summary.rank_ups
                );
                for (domain, value, tier) in &summary.domains {
                    println!("  {:<10} {:>2} {}", domain, value, tier);
                }
                if !summary.mastery_paths.is_empty() {
                    println!("  mastery: {}", summary.mastery_paths.join(", "));
                }
            }
        }
    }

    Ok(())
}
