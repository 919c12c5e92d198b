mod seating;

pub use seating::AgentConfigError;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use jass_bot::{Agent, AgentError};
use jass_core::game::sim::{GamePhase, GameSim, PlayError, PlayOutcome};
use jass_core::model::player::PlayerPosition;
use jass_core::model::rules::TOTAL_DEAL_POINTS;
use jass_core::model::trump::{Trump, TrumpChoice};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};
use seating::AgentBlueprint;

/// Plays the configured number of seeded deals and records one row per seat.
pub struct GameRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub standings: Vec<AgentStanding>,
}

impl GameRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        if agents.len() != 4 {
            return Err(RunnerError::SeatCount {
                found: agents.len(),
            });
        }
        Ok(Self {
            config,
            outputs,
            agents,
        })
    }

    /// Play every game, streaming JSONL rows to disk, then write the summary table.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut standings: Vec<AgentStanding> = self
            .agents
            .iter()
            .map(|agent| AgentStanding::new(&agent.name))
            .collect();
        let mut rows_written = 0usize;
        let mut dealer = PlayerPosition::North;

        for game_index in 0..self.config.games.count {
            let deal_seed = rng.next_u64();
            let outcome = self.play_game(game_index, deal_seed, dealer)?;
            for seat in &outcome.seat_results {
                standings[seat.seat.index()].record(&outcome, seat);
            }
            rows_written += write_game_rows(
                &mut writer,
                &self.config.run_id,
                game_index,
                deal_seed,
                &outcome,
            )?;
            dealer = dealer.next();
        }

        writer.flush()?;
        write_summary_markdown(
            &self.outputs.summary_md,
            &self.config.run_id,
            self.config.games.count,
            &standings,
        )?;

        event!(
            target: "jass_bench::run",
            Level::INFO,
            run_id = %self.config.run_id,
            games = self.config.games.count,
            rows_written,
        );

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            standings,
        })
    }

    fn play_game(
        &self,
        game_index: usize,
        deal_seed: u64,
        dealer: PlayerPosition,
    ) -> Result<GameOutcome, RunnerError> {
        let mut game = GameSim::with_seed(dealer, deal_seed);
        let mut seats: Vec<SeatState> = PlayerPosition::LOOP
            .iter()
            .zip(&self.agents)
            .map(|(seat, blueprint)| SeatState {
                seat: *seat,
                agent_name: blueprint.name.clone(),
                agent: blueprint.spawn_agent(deal_seed.wrapping_add(seat.index() as u64 + 1)),
                metrics: DecisionMetrics::default(),
            })
            .collect();
        let mut pushed = false;

        while game.phase() == GamePhase::Trump {
            let seat = game.current_player();
            let state = &mut seats[seat.index()];
            let start = Instant::now();
            let choice = state
                .agent
                .action_trump(&game.observation())
                .map_err(|source| RunnerError::Decision { seat, source })?;
            let elapsed_ms = state.metrics.record(start.elapsed());

            event!(
                target: "jass_bench::trump",
                Level::DEBUG,
                run_id = %self.config.run_id,
                game_index = game_index as u32,
                seat = %seat,
                choice = ?choice,
                elapsed_ms
            );
            pushed |= choice == TrumpChoice::Push;
            game.action_trump(choice)?;
        }

        while !game.is_done() {
            let seat = game.current_player();
            let state = &mut seats[seat.index()];
            let start = Instant::now();
            let card = state
                .agent
                .action_play_card(&game.observation())
                .map_err(|source| RunnerError::Decision { seat, source })?;
            let elapsed_ms = state.metrics.record(start.elapsed());

            let outcome = game.action_play_card(card)?;
            if tracing::enabled!(target: "jass_bench::play", Level::DEBUG) {
                let won_by = match outcome {
                    PlayOutcome::TrickCompleted { winner, .. } => Some(winner.to_string()),
                    PlayOutcome::Played => None,
                };
                event!(
                    target: "jass_bench::play",
                    Level::DEBUG,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    seat = %seat,
                    card = %card,
                    trick_won_by = ?won_by,
                    elapsed_ms
                );
            }
        }

        let Some(trump) = game.trump() else {
            return Err(RunnerError::Incomplete { game_index });
        };
        let team_points = game.points();
        let declared_by = game.observation().declared_by;
        let seat_results = seats
            .into_iter()
            .map(|state| SeatResult {
                points: team_points[state.seat.team()],
                opponent_points: team_points[1 - state.seat.team()],
                seat: state.seat,
                agent_name: state.agent_name,
                metrics: state.metrics.finalize(),
            })
            .collect();

        Ok(GameOutcome {
            dealer,
            trump,
            declared_by,
            pushed,
            team_points,
            seat_results,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut impl Write,
    run_id: &str,
    game_index: usize,
    deal_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}");
    let mut rows_written = 0usize;
    for seat in &outcome.seat_results {
        let row = GameLogRow {
            run_id,
            game_id: &game_id,
            game_index,
            deal_seed,
            dealer: outcome.dealer.to_string(),
            trump: outcome.trump,
            declared_by: outcome.declared_by.map(|seat| seat.to_string()),
            pushed: outcome.pushed,
            seat: seat.seat.to_string(),
            team: seat.seat.team(),
            bot: &seat.agent_name,
            points: seat.points,
            payoff: f64::from(seat.points) / f64::from(TOTAL_DEAL_POINTS),
            won: seat.points > seat.opponent_points,
            speed_ms_turn: seat.metrics.avg_ms_per_decision,
            decisions: seat.metrics.decisions,
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }
    Ok(rows_written)
}

fn write_summary_markdown(
    path: &Path,
    run_id: &str,
    games: usize,
    standings: &[AgentStanding],
) -> Result<(), RunnerError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# Run `{run_id}`")?;
    writeln!(out)?;
    writeln!(out, "{games} games.")?;
    writeln!(out)?;
    writeln!(
        out,
        "| Seat | Agent | Mean points | Mean payoff | Wins | Declared | ms/decision |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for (seat, standing) in PlayerPosition::LOOP.iter().zip(standings) {
        writeln!(
            out,
            "| {seat} | {} | {:.1} | {:.3} | {} | {} | {:.2} |",
            standing.name,
            standing.mean_points(),
            standing.mean_points() / f64::from(TOTAL_DEAL_POINTS),
            standing.wins,
            standing.declared,
            standing.mean_ms_per_decision(),
        )?;
    }
    out.flush()?;
    Ok(())
}

struct SeatState {
    seat: PlayerPosition,
    agent_name: String,
    agent: Box<dyn Agent>,
    metrics: DecisionMetrics,
}

pub struct GameOutcome {
    pub dealer: PlayerPosition,
    pub trump: Trump,
    pub declared_by: Option<PlayerPosition>,
    pub pushed: bool,
    pub team_points: [u32; 2],
    pub seat_results: Vec<SeatResult>,
}

pub struct SeatResult {
    pub agent_name: String,
    pub seat: PlayerPosition,
    /// Points of the seat's team.
    pub points: u32,
    pub opponent_points: u32,
    pub metrics: DecisionSummary,
}

/// Aggregate results of one seated agent over a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStanding {
    pub name: String,
    pub games: usize,
    pub total_points: u64,
    pub wins: usize,
    pub declared: usize,
    pub decisions: u64,
    pub total_ms: f64,
}

impl AgentStanding {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            games: 0,
            total_points: 0,
            wins: 0,
            declared: 0,
            decisions: 0,
            total_ms: 0.0,
        }
    }

    fn record(&mut self, outcome: &GameOutcome, seat: &SeatResult) {
        self.games += 1;
        self.total_points += u64::from(seat.points);
        if seat.points > seat.opponent_points {
            self.wins += 1;
        }
        if outcome.declared_by == Some(seat.seat) {
            self.declared += 1;
        }
        self.decisions += u64::from(seat.metrics.decisions);
        self.total_ms += seat.metrics.total_ms;
    }

    pub fn mean_points(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_points as f64 / self.games as f64
        }
    }

    pub fn mean_ms_per_decision(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total_ms / self.decisions as f64
        }
    }
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_id: &'a str,
    game_index: usize,
    deal_seed: u64,
    dealer: String,
    trump: Trump,
    declared_by: Option<String>,
    pushed: bool,
    seat: String,
    team: usize,
    bot: &'a str,
    points: u32,
    payoff: f64,
    won: bool,
    speed_ms_turn: f64,
    decisions: u32,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    AgentConfig(#[from] AgentConfigError),
    #[error("agent at {seat} failed: {source}")]
    Decision {
        seat: PlayerPosition,
        #[source]
        source: AgentError,
    },
    #[error("illegal action: {0}")]
    Play(#[from] PlayError),
    #[error("game {game_index} ended without a declared trump")]
    Incomplete { game_index: usize },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
}
