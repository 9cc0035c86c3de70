// Integration tests (native) for the `simon-says` crate.
// These drive the state machine directly, firing scheduled tasks by hand instead
// of waiting on browser timers.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use simon_says::game::{ScheduledTask, TaskKind, remaining_text};
use simon_says::{
    ColorSource, Effect, GameConfig, GameSession, InputEvent, Outcome, PadColor, Phase,
    RandomColors, SkillLevel,
};

struct Scripted(VecDeque<PadColor>);

impl ColorSource for Scripted {
    fn next_color(&mut self) -> PadColor {
        self.0.pop_front().unwrap_or(PadColor::Red)
    }
}

fn scripted(colors: &[PadColor]) -> GameSession<Scripted> {
    GameSession::new(GameConfig::default(), Scripted(colors.iter().copied().collect()))
}

fn scheduled(effects: &[Effect]) -> Option<ScheduledTask> {
    effects.iter().find_map(|e| match e {
        Effect::Schedule { task, .. } => Some(*task),
        _ => None,
    })
}

fn outcome(effects: &[Effect]) -> Option<Outcome> {
    effects.iter().find_map(|e| match e {
        Effect::Notify { outcome, .. } => Some(*outcome),
        _ => None,
    })
}

/// Starts a game and runs scheduled tasks until the player may answer.
fn start_and_open<S: ColorSource>(s: &mut GameSession<S>) {
    let fx = s.handle(InputEvent::StartPressed);
    let task = scheduled(&fx).expect("computer turn schedules the player turn");
    s.fire(task);
    assert_eq!(s.phase(), Phase::PlayerTurn);
}

/// After a completed round, runs the next computer turn and opens the player turn.
fn advance<S: ColorSource>(s: &mut GameSession<S>, round_done: &[Effect]) {
    let next = scheduled(round_done).expect("next round is scheduled");
    assert_eq!(next.kind, TaskKind::StartComputerTurn);
    let fx = s.fire(next);
    let open = scheduled(&fx).expect("player turn is scheduled");
    assert_eq!(open.kind, TaskKind::OpenPlayerTurn);
    s.fire(open);
}

fn assert_idle<S: ColorSource>(s: &GameSession<S>) {
    assert_eq!(s.phase(), Phase::Idle);
    assert!(s.computer_sequence().is_empty());
    assert!(s.player_sequence().is_empty());
    assert_eq!(s.round_count(), 0);
    assert_eq!(s.max_round_count(), 0);
}

#[test]
fn replaying_the_sequence_wins_every_level() {
    for level in 1..=4u8 {
        let config = GameConfig {
            default_level: SkillLevel::try_from(level).unwrap(),
            ..GameConfig::default()
        };
        let mut s = GameSession::new(config, RandomColors(StdRng::seed_from_u64(level as u64)));
        let max = s.skill_level().max_rounds();
        start_and_open(&mut s);

        let mut rounds_played = 0;
        loop {
            let sequence = s.computer_sequence().to_vec();
            let mut last = Vec::new();
            for color in sequence {
                last = s.handle(InputEvent::PadPressed(color));
            }
            rounds_played += 1;
            if let Some(result) = outcome(&last) {
                assert_eq!(result, Outcome::Won);
                assert_eq!(rounds_played, max);
                break;
            }
            assert!(rounds_played < max, "game should have ended at round {max}");
            assert_eq!(s.round_count(), rounds_played + 1);
            advance(&mut s, &last);
        }
        assert_idle(&s);
    }
}

#[test]
fn correct_first_round_extends_the_sequence() {
    let mut s = scripted(&[PadColor::Red, PadColor::Yellow]);
    start_and_open(&mut s);
    assert_eq!(s.max_round_count(), 8);
    assert_eq!(s.computer_sequence(), &[PadColor::Red]);

    let fx = s.handle(InputEvent::PadPressed(PadColor::Red));
    assert_eq!(s.round_count(), 2);
    assert!(fx.contains(&Effect::SetStatus(
        "Simon has more to say, keep listening".into()
    )));
    advance(&mut s, &fx);
    assert_eq!(s.computer_sequence(), &[PadColor::Red, PadColor::Yellow]);
    assert!(s.player_sequence().is_empty());
}

#[test]
fn wrong_press_loses_immediately() {
    use PadColor::*;
    let mut s = scripted(&[Red, Blue, Green]);
    start_and_open(&mut s);
    let fx = s.handle(InputEvent::PadPressed(Red));
    advance(&mut s, &fx);
    s.handle(InputEvent::PadPressed(Red));
    let fx = s.handle(InputEvent::PadPressed(Blue));
    advance(&mut s, &fx);
    assert_eq!(s.round_count(), 3);
    assert_eq!(s.computer_sequence(), &[Red, Blue, Green]);

    assert!(s.handle(InputEvent::PadPressed(Red)).iter().all(|e| !matches!(e, Effect::Notify { .. })));
    let fx = s.handle(InputEvent::PadPressed(Yellow));
    assert_eq!(outcome(&fx), Some(Outcome::Lost));
    assert!(fx.contains(&Effect::Notify {
        outcome: Outcome::Lost,
        message: "Simon didn't say that".into(),
    }));
    assert_idle(&s);

    // Nothing further is consumed once the game is over.
    assert!(s.handle(InputEvent::PadPressed(Green)).is_empty());
    assert_idle(&s);
}

#[test]
fn remaining_count_after_each_press() {
    use PadColor::*;
    let mut s = scripted(&[Green, Green, Blue]);
    start_and_open(&mut s);
    let fx = s.handle(InputEvent::PadPressed(Green));
    advance(&mut s, &fx);
    s.handle(InputEvent::PadPressed(Green));
    let fx = s.handle(InputEvent::PadPressed(Green));
    advance(&mut s, &fx);

    assert_eq!(s.computer_sequence().len(), 3);
    for (pressed, color) in [Green, Green].into_iter().enumerate() {
        let fx = s.handle(InputEvent::PadPressed(color));
        let remaining = s.computer_sequence().len() - s.player_sequence().len();
        assert_eq!(remaining, 3 - (pressed + 1));
        assert!(fx.contains(&Effect::SetStatus(remaining_text(remaining))));
    }
    assert_eq!(remaining_text(1), "Sequence has 1 pad remaining");
}

#[test]
fn player_turn_opens_with_full_count() {
    let mut s = scripted(&[PadColor::Blue]);
    let fx = s.handle(InputEvent::StartPressed);
    let fx = s.fire(scheduled(&fx).unwrap());
    assert_eq!(
        fx,
        vec![
            Effect::UnlockPads,
            Effect::SetStatus("Sequence has 1 pad remaining".into()),
        ]
    );
}

#[test]
fn reset_is_idempotent() {
    let mut s = scripted(&[PadColor::Red, PadColor::Red]);
    let first = s.reset();
    assert_idle(&s);

    start_and_open(&mut s);
    let fx = s.handle(InputEvent::PadPressed(PadColor::Red));
    advance(&mut s, &fx);
    s.handle(InputEvent::PadPressed(PadColor::Red));

    let again = s.reset();
    assert_idle(&s);
    assert_eq!(first, again);
    assert_eq!(s.reset(), again);
    assert_idle(&s);
}

#[test]
fn skill_level_survives_games() {
    let mut s = scripted(&[PadColor::Red]);
    let four = SkillLevel::try_from(4).unwrap();
    s.handle(InputEvent::LevelChosen(four));
    start_and_open(&mut s);
    assert_eq!(s.max_round_count(), 31);
    s.handle(InputEvent::PadPressed(PadColor::Green));
    assert_idle(&s);
    assert_eq!(s.skill_level(), four);
}

#[test]
fn timers_from_a_lost_game_do_not_leak_into_the_next() {
    let mut s = scripted(&[PadColor::Red, PadColor::Blue, PadColor::Green]);
    start_and_open(&mut s);
    let fx = s.handle(InputEvent::PadPressed(PadColor::Red));
    let stale = scheduled(&fx).unwrap();
    s.reset();

    let fx = s.handle(InputEvent::StartPressed);
    assert_eq!(s.computer_sequence(), &[PadColor::Blue]);
    assert!(s.fire(stale).is_empty());
    assert_eq!(s.computer_sequence().len(), 1);
    s.fire(scheduled(&fx).unwrap());
    assert_eq!(s.phase(), Phase::PlayerTurn);
}
