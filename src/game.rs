//! Turn-taking state machine.
//!
//! A [`GameSession`] owns every piece of mutable game state. Input arrives as
//! [`InputEvent`]s, delayed transitions come back as [`ScheduledTask`]s, and every
//! call answers with a list of [`Effect`]s for the presentation layer to apply in
//! order. Nothing here touches the DOM, so the whole game runs natively in tests.
//!
//! Phases: `Idle -> ComputerTurn -> PlayerTurn -> (ComputerTurn | Idle)`. Winning and
//! losing are not phases of their own; both notify and fall straight back to `Idle`.

use log::{debug, info, warn};
use rand::Rng;

use crate::animation::AnimationQueue;
use crate::config::{GameConfig, Timing};
use crate::level::SkillLevel;
use crate::pad::{PADS, PadColor};

pub const IDLE_HEADING: &str = "Simon Says Something";
pub const COMPUTER_TURN_STATUS: &str = "The computer's turn...";
pub const NEXT_ROUND_STATUS: &str = "Simon has more to say, keep listening";
pub const LOST_MESSAGE: &str = "Simon didn't say that";
pub const WON_MESSAGE: &str = "Simon said that, and so did you!";

/// Supplies the color appended at the start of each computer turn.
pub trait ColorSource {
    fn next_color(&mut self) -> PadColor;
}

/// Uniform choice over the four pads, independent every round.
pub struct RandomColors<R>(pub R);

impl<R: Rng> ColorSource for RandomColors<R> {
    fn next_color(&mut self) -> PadColor {
        PADS[self.0.gen_range(0..PADS.len())].color
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Phase {
    Idle,
    ComputerTurn,
    PlayerTurn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    StartPressed,
    PadPressed(PadColor),
    LevelChosen(SkillLevel),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    OpenPlayerTurn,
    StartComputerTurn,
}

/// Delayed transition, valid only for the session generation that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub generation: u64,
    pub kind: TaskKind,
}

/// Page layout: level selection visible, or the in-game status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    PreGame,
    InGame,
}

/// Instruction for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    SetHeading(String),
    SetStatus(String),
    SetSkillLabel(String),
    Layout(Layout),
    /// Pad labels show their level numbers (`true`) or nothing.
    LevelLabels(bool),
    LockPads,
    UnlockPads,
    PlaySound(PadColor),
    Animate(AnimationQueue),
    Schedule { delay_ms: u32, task: ScheduledTask },
    CancelPending,
    /// Blocking message shown before the reset that follows it.
    Notify { outcome: Outcome, message: String },
}

pub fn remaining_text(remaining: usize) -> String {
    let plural = if remaining == 1 { "" } else { "s" };
    format!("Sequence has {remaining} pad{plural} remaining")
}

pub fn round_heading(round: u32, max: u32) -> String {
    format!("Round {round} out of {max}")
}

pub fn skill_label(level: SkillLevel) -> String {
    format!("Current Skill Level: {level}")
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameSnapshot {
    pub phase: Phase,
    pub computer_sequence: Vec<PadColor>,
    pub player_sequence: Vec<PadColor>,
    pub round_count: u32,
    pub max_round_count: u32,
    pub skill_level: SkillLevel,
    pub generation: u64,
}

pub struct GameSession<S> {
    timing: Timing,
    colors: S,
    computer_sequence: Vec<PadColor>,
    player_sequence: Vec<PadColor>,
    round_count: u32,
    max_round_count: u32, // 0 while idle
    skill_level: SkillLevel,
    phase: Phase,
    generation: u64,
}

impl<S: ColorSource> GameSession<S> {
    pub fn new(config: GameConfig, colors: S) -> Self {
        Self {
            timing: config.timing,
            colors,
            computer_sequence: Vec::new(),
            player_sequence: Vec::new(),
            round_count: 0,
            max_round_count: 0,
            skill_level: config.default_level,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.max_round_count == 0
    }

    pub fn computer_sequence(&self) -> &[PadColor] {
        &self.computer_sequence
    }

    pub fn player_sequence(&self) -> &[PadColor] {
        &self.player_sequence
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn max_round_count(&self) -> u32 {
        self.max_round_count
    }

    pub fn skill_level(&self) -> SkillLevel {
        self.skill_level
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            computer_sequence: self.computer_sequence.clone(),
            player_sequence: self.player_sequence.clone(),
            round_count: self.round_count,
            max_round_count: self.max_round_count,
            skill_level: self.skill_level,
            generation: self.generation,
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::StartPressed => self.start(),
            InputEvent::PadPressed(color) => self.press(color),
            InputEvent::LevelChosen(level) => self.choose_level(level),
        }
    }

    /// Runs a delayed transition. Tasks from an earlier generation are dropped.
    pub fn fire(&mut self, task: ScheduledTask) -> Vec<Effect> {
        if task.generation != self.generation {
            warn!(
                "dropping stale {:?} (generation {} != {})",
                task.kind, task.generation, self.generation
            );
            return Vec::new();
        }
        match (task.kind, self.phase) {
            (TaskKind::OpenPlayerTurn, Phase::ComputerTurn) => self.open_player_turn(),
            (TaskKind::StartComputerTurn, Phase::ComputerTurn) => self.computer_turn(),
            (kind, phase) => {
                warn!("ignoring {kind:?} in phase {phase:?}");
                Vec::new()
            }
        }
    }

    /// Returns every field to its idle value. The chosen skill level is kept.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.computer_sequence.clear();
        self.player_sequence.clear();
        self.round_count = 0;
        self.max_round_count = 0;
        self.phase = Phase::Idle;
        self.generation += 1;
        vec![
            Effect::CancelPending,
            Effect::SetHeading(IDLE_HEADING.to_string()),
            Effect::Layout(Layout::PreGame),
            Effect::LevelLabels(true),
            Effect::UnlockPads,
        ]
    }

    fn start(&mut self) -> Vec<Effect> {
        if !self.is_idle() {
            debug!("start ignored, game already running");
            return Vec::new();
        }
        self.max_round_count = self.skill_level.max_rounds();
        self.round_count = 1;
        self.generation += 1;
        info!(
            "starting game at level {} ({} rounds)",
            self.skill_level, self.max_round_count
        );
        let mut effects = vec![Effect::Layout(Layout::InGame), Effect::LevelLabels(false)];
        effects.extend(self.computer_turn());
        effects
    }

    fn computer_turn(&mut self) -> Vec<Effect> {
        self.phase = Phase::ComputerTurn;
        let color = self.colors.next_color();
        self.computer_sequence.push(color);
        debug!(
            "round {}: computer adds {color}, sequence length {}",
            self.round_count,
            self.computer_sequence.len()
        );
        vec![
            Effect::LockPads,
            Effect::SetStatus(COMPUTER_TURN_STATUS.to_string()),
            Effect::SetHeading(round_heading(self.round_count, self.max_round_count)),
            Effect::Animate(AnimationQueue::for_sequence(&self.computer_sequence, &self.timing)),
            Effect::Schedule {
                delay_ms: self.timing.player_turn_delay_ms(self.computer_sequence.len()),
                task: self.task(TaskKind::OpenPlayerTurn),
            },
        ]
    }

    fn open_player_turn(&mut self) -> Vec<Effect> {
        self.phase = Phase::PlayerTurn;
        self.player_sequence.clear();
        vec![
            Effect::UnlockPads,
            Effect::SetStatus(remaining_text(self.computer_sequence.len())),
        ]
    }

    fn press(&mut self, color: PadColor) -> Vec<Effect> {
        if self.phase != Phase::PlayerTurn {
            debug!("press of {color} ignored in phase {:?}", self.phase);
            return Vec::new();
        }
        self.player_sequence.push(color);
        let index = self.player_sequence.len() - 1;
        let remaining = self.computer_sequence.len() - self.player_sequence.len();
        let mut effects = vec![
            Effect::PlaySound(color),
            Effect::SetStatus(remaining_text(remaining)),
        ];

        if self.computer_sequence.get(index) != Some(&color) {
            info!("mismatch at press {}: got {color}", index + 1);
            effects.extend(self.finish(Outcome::Lost));
        } else if remaining == 0 {
            effects.extend(self.complete_round());
        }
        effects
    }

    fn complete_round(&mut self) -> Vec<Effect> {
        if self.player_sequence.len() as u32 == self.max_round_count {
            return self.finish(Outcome::Won);
        }
        self.round_count += 1;
        self.phase = Phase::ComputerTurn;
        vec![
            Effect::LockPads,
            Effect::SetStatus(NEXT_ROUND_STATUS.to_string()),
            Effect::Schedule {
                delay_ms: self.timing.next_round_delay_ms,
                task: self.task(TaskKind::StartComputerTurn),
            },
        ]
    }

    fn finish(&mut self, outcome: Outcome) -> Vec<Effect> {
        let message = match outcome {
            Outcome::Won => WON_MESSAGE,
            Outcome::Lost => LOST_MESSAGE,
        };
        info!("game over: {outcome:?} after {} rounds", self.round_count);
        let mut effects = vec![Effect::Notify { outcome, message: message.to_string() }];
        effects.extend(self.reset());
        effects
    }

    fn choose_level(&mut self, level: SkillLevel) -> Vec<Effect> {
        if !self.is_idle() {
            debug!("level {level} ignored during a game");
            return Vec::new();
        }
        self.skill_level = level;
        vec![Effect::SetSkillLabel(skill_label(level))]
    }

    fn task(&self, kind: TaskKind) -> ScheduledTask {
        ScheduledTask { generation: self.generation, kind }
    }
}
