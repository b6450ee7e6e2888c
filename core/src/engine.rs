use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Previewing,
    Playing,
    Ended(Outcome),
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Input to [`Game::dispatch`], from the player or from a timer the host runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Start { seed: u64 },
    PreviewElapsed { round: u64 },
    FlipCard(CardId),
    Tick,
    TimerExpired,
    PointerEnter,
    PointerLeave,
    MessageElapsed { token: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    DealCards,
    FlipCard(CardId),
    MessageIn,
    MessageOut,
}

/// Side effect requested by the game; the host performs it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    RenderGrid,
    RenderCard(CardId),
    SetGridVisible(bool),
    DisplayTime(u32),
    StartTicking,
    StopTicking,
    ShowMessage(alloc::string::String),
    HideMessage,
    /// Dispatch `event` once after `delay_ms`.
    Schedule { delay_ms: u32, event: Event },
    Animate(Animation),
}

type FlipLedger = BTreeMap<Face, SmallVec<[CardId; 2]>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    timer: Countdown,
    message: Message,
    phase: Phase,
    active_flip: Option<Face>,
    flips: FlipLedger,
    round: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let grid = Grid::from_config(&config);
        let timer = Countdown::new(config.time_limit);
        Self {
            config,
            grid,
            timer,
            message: Message::new(),
            phase: Default::default(),
            active_flip: None,
            flips: FlipLedger::new(),
            round: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn active_flip(&self) -> Option<Face> {
        self.active_flip
    }

    /// Card ids flipped for `face` in the current round.
    pub fn flips_for(&self, face: Face) -> &[CardId] {
        self.flips.get(&face).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    /// Ledger entries that are complete: a value flipped twice, or the filler
    /// flipped once.
    pub fn settled_count(&self) -> CardCount {
        self.flips
            .iter()
            .filter(|(face, ids)| match face {
                Face::Value(_) => ids.len() >= 2,
                Face::Filler => !ids.is_empty(),
            })
            .count() as CardCount
    }

    pub fn required_count(&self) -> CardCount {
        required_settled(self.grid.len())
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Command> {
        use Event::*;

        log::trace!("dispatch {:?} in {:?}", event, self.phase);
        match event {
            Start { seed } => self.start(seed),
            PreviewElapsed { round } => self.finish_preview(round),
            FlipCard(id) => self.flip_commands(id),
            Tick => self.tick(),
            TimerExpired if self.phase.is_playing() => self.lose(),
            TimerExpired => Vec::new(),
            PointerEnter => self.resume(),
            PointerLeave => self.pause(),
            MessageElapsed { token } => {
                if self.message.expire(token) {
                    vec![Command::Animate(Animation::MessageOut), Command::HideMessage]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Swaps in a new configuration and returns to `Idle`. The round counter
    /// carries over so timers scheduled for earlier rounds stay stale.
    pub fn reconfigure(&mut self, config: GameConfig) -> Vec<Command> {
        self.grid = Grid::from_config(&config);
        self.timer = Countdown::new(config.time_limit);
        self.config = config;
        self.phase = Phase::Idle;
        self.active_flip = None;
        self.flips.clear();
        log::debug!("reconfigured to {:?}", self.grid.size());

        let mut commands = vec![Command::StopTicking];
        if self.message.hide() {
            commands.push(Command::Animate(Animation::MessageOut));
            commands.push(Command::HideMessage);
        }
        commands.push(Command::DisplayTime(self.timer.remaining()));
        commands.push(Command::RenderGrid);
        commands
    }

    /// Begins a new round: reshuffles and shows the grid for the preview window.
    pub fn start(&mut self, seed: u64) -> Vec<Command> {
        self.round = self.round.wrapping_add(1);
        self.active_flip = None;
        self.flips.clear();
        self.timer.stop();
        self.grid.shuffle(seed);
        self.grid.show();
        self.phase = Phase::Previewing;
        log::debug!("round {} previewing", self.round);

        let mut commands = Vec::with_capacity(6);
        if self.message.hide() {
            commands.push(Command::Animate(Animation::MessageOut));
            commands.push(Command::HideMessage);
        }
        commands.extend([
            Command::StopTicking,
            Command::RenderGrid,
            Command::Animate(Animation::DealCards),
            Command::SetGridVisible(true),
            Command::Schedule {
                delay_ms: PREVIEW_MS,
                event: Event::PreviewElapsed { round: self.round },
            },
        ]);
        commands
    }

    fn finish_preview(&mut self, round: u64) -> Vec<Command> {
        if round != self.round || self.phase != Phase::Previewing {
            log::debug!("ignoring stale preview of round {}", round);
            return Vec::new();
        }

        self.grid.hide();
        self.timer.start();
        self.phase = Phase::Playing;
        log::debug!("round {} playing, {}s", self.round, self.timer.remaining());

        vec![
            Command::SetGridVisible(false),
            Command::DisplayTime(self.timer.remaining()),
            Command::StartTicking,
        ]
    }

    pub fn flip_card(&mut self, id: CardId) -> Result<FlipOutcome> {
        use FlipOutcome::*;

        let id = self.grid.validate_id(id)?;
        self.check_playing()?;

        let Some(face) = self.grid.card_mut(id).and_then(Card::click) else {
            return Ok(NoChange);
        };

        match self.active_flip {
            None => {
                log::debug!("provisional flip of {} at {}", face, id);
                self.flips.entry(face).or_default().push(id);
                self.active_flip = Some(face);
            }
            Some(pending) if pending == face => {
                log::debug!("matched {} at {}", face, id);
                self.flips.entry(face).or_default().push(id);
                self.active_flip = None;
            }
            Some(pending) => {
                log::debug!("mismatch, {} then {} at {}", pending, face, id);
                self.end_game(Outcome::Lose);
                return Ok(Lost);
            }
        }

        if self.settled_count() >= self.required_count() {
            self.end_game(Outcome::Win);
            Ok(Won)
        } else if self.active_flip.is_some() {
            Ok(Pending)
        } else {
            Ok(Matched)
        }
    }

    fn flip_commands(&mut self, id: CardId) -> Vec<Command> {
        match self.flip_card(id) {
            Ok(outcome) if outcome.is_final() => {
                let mut commands = vec![
                    Command::Animate(Animation::FlipCard(id)),
                    Command::RenderCard(id),
                ];
                commands.extend(self.end_commands());
                commands
            }
            Ok(outcome) if outcome.has_update() => vec![
                Command::Animate(Animation::FlipCard(id)),
                Command::RenderCard(id),
            ],
            Ok(_) => Vec::new(),
            Err(err) => {
                log::debug!("flip of {} rejected: {}", id, err);
                Vec::new()
            }
        }
    }

    fn tick(&mut self) -> Vec<Command> {
        match self.timer.tick() {
            TickOutcome::Idle => Vec::new(),
            TickOutcome::Ticked(remaining) => vec![Command::DisplayTime(remaining)],
            TickOutcome::Expired if self.phase.is_playing() => self.lose(),
            TickOutcome::Expired => vec![Command::StopTicking],
        }
    }

    fn resume(&mut self) -> Vec<Command> {
        if !self.phase.is_playing() || self.timer.is_running() {
            return Vec::new();
        }
        self.timer.run();
        log::trace!("timer resumed at {}", self.timer.remaining());
        vec![Command::StartTicking]
    }

    fn pause(&mut self) -> Vec<Command> {
        if !self.phase.is_playing() || !self.timer.is_running() {
            return Vec::new();
        }
        self.timer.stop();
        log::trace!("timer paused at {}", self.timer.remaining());
        vec![Command::StopTicking]
    }

    pub fn win(&mut self) -> Vec<Command> {
        self.end(Outcome::Win)
    }

    pub fn lose(&mut self) -> Vec<Command> {
        self.end(Outcome::Lose)
    }

    /// Ends the round with `outcome`: banner, stopped timer, grid face up.
    pub fn end(&mut self, outcome: Outcome) -> Vec<Command> {
        self.end_game(outcome);
        self.end_commands()
    }

    fn end_game(&mut self, outcome: Outcome) {
        self.phase = Phase::Ended(outcome);
        self.active_flip = None;
        self.timer.stop();
        self.grid.show();
        log::info!("round {} ended: {}", self.round, outcome.message());
    }

    fn end_commands(&mut self) -> Vec<Command> {
        let Phase::Ended(outcome) = self.phase else {
            return Vec::new();
        };
        let text = outcome.message();
        let hide_later = self.message.show(text, MESSAGE_MS);
        vec![
            Command::ShowMessage(text.into()),
            Command::Animate(Animation::MessageIn),
            hide_later,
            Command::StopTicking,
            Command::SetGridVisible(true),
        ]
    }

    fn check_playing(&self) -> Result<()> {
        if self.phase.is_playing() {
            Ok(())
        } else {
            Err(GameError::NotPlaying)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cols: Dim, rows: Dim, time_limit: u32) -> GameConfig {
        GameConfig::new_unchecked(cols, rows, time_limit)
    }

    fn playing(cols: Dim, rows: Dim, time_limit: u32) -> Game {
        let mut game = Game::new(config(cols, rows, time_limit));
        game.start(1);
        let round = game.round();
        game.dispatch(Event::PreviewElapsed { round });
        assert_eq!(game.phase(), Phase::Playing);
        game
    }

    fn ids_of(game: &Game, face: Face) -> Vec<CardId> {
        game.grid()
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, card)| card.face() == face)
            .map(|(id, _)| id as CardId)
            .collect()
    }

    #[test]
    fn start_previews_then_plays() {
        let mut game = Game::new(config(2, 2, 20));
        assert_eq!(game.phase(), Phase::Idle);

        let commands = game.dispatch(Event::Start { seed: 3 });

        assert_eq!(game.phase(), Phase::Previewing);
        assert!(game.grid().is_visible());
        assert!(commands.contains(&Command::SetGridVisible(true)));
        assert!(commands.contains(&Command::Schedule {
            delay_ms: PREVIEW_MS,
            event: Event::PreviewElapsed { round: 1 },
        }));

        let commands = game.dispatch(Event::PreviewElapsed { round: 1 });

        assert_eq!(game.phase(), Phase::Playing);
        assert!(!game.grid().is_visible());
        assert!(game.timer().is_running());
        assert_eq!(
            commands,
            vec![
                Command::SetGridVisible(false),
                Command::DisplayTime(20),
                Command::StartTicking,
            ]
        );
    }

    #[test]
    fn flips_are_rejected_outside_play() {
        let mut game = Game::new(config(2, 2, 20));
        assert_eq!(game.flip_card(0), Err(GameError::NotPlaying));

        game.start(1);
        assert_eq!(game.flip_card(0), Err(GameError::NotPlaying));
        assert!(game.dispatch(Event::FlipCard(0)).is_empty());
        assert!(!game.grid().card(0).unwrap().is_active());
    }

    #[test]
    fn invalid_card_is_rejected() {
        let mut game = playing(2, 2, 20);

        assert_eq!(game.flip_card(4), Err(GameError::InvalidCard));
    }

    #[test]
    fn second_flip_of_same_card_is_a_no_op() {
        let mut game = playing(2, 2, 20);

        assert_eq!(game.flip_card(0), Ok(FlipOutcome::Pending));
        assert_eq!(game.flip_card(0), Ok(FlipOutcome::NoChange));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.flips_for(game.grid().card(0).unwrap().face()).len(), 1);
    }

    #[test]
    fn matching_pair_clears_the_active_flip() {
        let mut game = playing(2, 2, 20);
        let ids = ids_of(&game, Face::Value(1));

        assert_eq!(game.flip_card(ids[0]), Ok(FlipOutcome::Pending));
        assert_eq!(game.active_flip(), Some(Face::Value(1)));
        assert_eq!(game.flip_card(ids[1]), Ok(FlipOutcome::Matched));
        assert_eq!(game.active_flip(), None);
        assert_eq!(game.flips_for(Face::Value(1)), &ids[..]);
        assert_eq!(game.settled_count(), 1);
    }

    #[test]
    fn mismatch_loses_immediately() {
        let mut game = playing(2, 2, 20);
        let one = ids_of(&game, Face::Value(1));
        let two = ids_of(&game, Face::Value(2));

        game.flip_card(one[0]).unwrap();
        let commands = game.dispatch(Event::FlipCard(two[0]));

        assert_eq!(game.phase(), Phase::Ended(Outcome::Lose));
        assert!(commands.contains(&Command::ShowMessage("You Lose !".into())));
        assert!(commands.contains(&Command::StopTicking));
        assert!(commands.contains(&Command::SetGridVisible(true)));
        assert!(!game.timer().is_running());
        assert_eq!(game.timer().remaining(), 20);
        assert_eq!(game.message().text(), Some("You Lose !"));
    }

    #[test]
    fn two_by_two_wins_in_either_order() {
        for order in [[1, 2], [2, 1]] {
            let mut game = playing(2, 2, 20);
            let first = ids_of(&game, Face::Value(order[0]));
            let second = ids_of(&game, Face::Value(order[1]));

            assert_eq!(game.flip_card(first[0]), Ok(FlipOutcome::Pending));
            assert_eq!(game.flip_card(first[1]), Ok(FlipOutcome::Matched));
            assert_eq!(game.flip_card(second[1]), Ok(FlipOutcome::Pending));
            assert_eq!(game.flip_card(second[0]), Ok(FlipOutcome::Won));

            assert_eq!(game.phase(), Phase::Ended(Outcome::Win));
            assert!(!game.timer().is_running());
            assert!(game.grid().is_visible());
        }
    }

    #[test]
    fn win_dispatch_emits_end_commands() {
        let mut game = playing(2, 1, 20);
        let ids = ids_of(&game, Face::Value(1));
        game.dispatch(Event::FlipCard(ids[0]));

        let commands = game.dispatch(Event::FlipCard(ids[1]));

        assert_eq!(
            commands,
            vec![
                Command::Animate(Animation::FlipCard(ids[1])),
                Command::RenderCard(ids[1]),
                Command::ShowMessage("You Win !".into()),
                Command::Animate(Animation::MessageIn),
                Command::Schedule {
                    delay_ms: MESSAGE_MS,
                    event: Event::MessageElapsed { token: 1 },
                },
                Command::StopTicking,
                Command::SetGridVisible(true),
            ]
        );
    }

    #[test]
    fn odd_grid_wins_when_filler_is_flipped_last() {
        let mut game = playing(3, 3, 20);
        assert_eq!(game.required_count(), 5);

        for value in 1..=4 {
            let ids = ids_of(&game, Face::Value(value));
            assert_eq!(game.flip_card(ids[0]), Ok(FlipOutcome::Pending));
            assert_eq!(game.flip_card(ids[1]), Ok(FlipOutcome::Matched));
        }
        let filler = ids_of(&game, Face::Filler);

        assert_eq!(game.flip_card(filler[0]), Ok(FlipOutcome::Won));
        assert_eq!(game.phase(), Phase::Ended(Outcome::Win));
    }

    #[test]
    fn early_filler_then_any_card_loses() {
        let mut game = playing(3, 3, 20);
        let filler = ids_of(&game, Face::Filler);
        let one = ids_of(&game, Face::Value(1));

        assert_eq!(game.flip_card(filler[0]), Ok(FlipOutcome::Pending));
        assert_eq!(game.flip_card(one[0]), Ok(FlipOutcome::Lost));
    }

    #[test]
    fn filler_as_second_flip_loses() {
        let mut game = playing(3, 1, 20);
        let one = ids_of(&game, Face::Value(1));
        let filler = ids_of(&game, Face::Filler);

        game.flip_card(one[0]).unwrap();
        assert_eq!(game.flip_card(filler[0]), Ok(FlipOutcome::Lost));
    }

    #[test]
    fn countdown_expiry_loses() {
        let mut game = playing(2, 2, 3);

        assert_eq!(game.dispatch(Event::Tick), vec![Command::DisplayTime(2)]);
        assert_eq!(game.dispatch(Event::Tick), vec![Command::DisplayTime(1)]);
        assert_eq!(game.dispatch(Event::Tick), vec![Command::DisplayTime(0)]);
        assert_eq!(game.phase(), Phase::Playing);

        let commands = game.dispatch(Event::Tick);

        assert_eq!(game.phase(), Phase::Ended(Outcome::Lose));
        assert!(commands.contains(&Command::ShowMessage("You Lose !".into())));
    }

    #[test]
    fn timer_expired_event_loses_only_while_playing() {
        let mut game = Game::new(config(2, 2, 3));
        assert!(game.dispatch(Event::TimerExpired).is_empty());
        assert_eq!(game.phase(), Phase::Idle);

        let mut game = playing(2, 2, 3);
        game.dispatch(Event::TimerExpired);
        assert_eq!(game.phase(), Phase::Ended(Outcome::Lose));
    }

    #[test]
    fn pointer_pauses_and_resumes_while_playing() {
        let mut game = playing(2, 2, 10);

        assert_eq!(game.dispatch(Event::PointerLeave), vec![Command::StopTicking]);
        assert!(game.dispatch(Event::Tick).is_empty());
        assert!(game.dispatch(Event::PointerLeave).is_empty());

        assert_eq!(game.dispatch(Event::PointerEnter), vec![Command::StartTicking]);
        assert_eq!(game.dispatch(Event::Tick), vec![Command::DisplayTime(9)]);
        assert!(game.dispatch(Event::PointerEnter).is_empty());
    }

    #[test]
    fn pointer_is_ignored_outside_play() {
        let mut game = Game::new(config(2, 2, 10));
        game.start(5);
        assert!(game.dispatch(Event::PointerEnter).is_empty());
        assert!(!game.timer().is_running());

        let mut game = playing(2, 2, 10);
        game.lose();
        assert!(game.dispatch(Event::PointerEnter).is_empty());
        assert!(!game.timer().is_running());
    }

    #[test]
    fn restart_clears_round_state_and_ignores_stale_preview() {
        let mut game = playing(2, 2, 10);
        let ids = ids_of(&game, Face::Value(1));
        game.flip_card(ids[0]).unwrap();
        game.dispatch(Event::Tick);

        let commands = game.dispatch(Event::Start { seed: 9 });

        assert!(commands.contains(&Command::StopTicking));
        assert_eq!(game.round(), 2);
        assert_eq!(game.active_flip(), None);
        assert_eq!(game.settled_count(), 0);
        assert!(game.grid().cards().iter().all(|card| !card.is_active()));

        assert!(game.dispatch(Event::PreviewElapsed { round: 1 }).is_empty());
        assert_eq!(game.phase(), Phase::Previewing);

        game.dispatch(Event::PreviewElapsed { round: 2 });
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.timer().remaining(), 10);
    }

    #[test]
    fn restart_hides_the_previous_banner() {
        let mut game = playing(2, 2, 10);
        game.lose();
        assert!(game.message().is_visible());

        let commands = game.dispatch(Event::Start { seed: 2 });

        assert!(!game.message().is_visible());
        assert_eq!(commands[1], Command::HideMessage);
    }

    #[test]
    fn reconfigure_keeps_stale_timers_stale() {
        let mut game = playing(2, 2, 10);
        game.lose();

        let commands = game.reconfigure(config(3, 3, 30));

        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.grid().len(), 9);
        assert_eq!(game.timer().remaining(), 30);
        assert!(commands.contains(&Command::DisplayTime(30)));
        assert!(!game.message().is_visible());

        game.start(4);
        assert_eq!(game.round(), 2);
        assert!(game.dispatch(Event::PreviewElapsed { round: 1 }).is_empty());
        assert_eq!(game.phase(), Phase::Previewing);
    }

    #[test]
    fn message_auto_hides_once() {
        let mut game = playing(2, 2, 10);
        game.lose();

        assert_eq!(
            game.dispatch(Event::MessageElapsed { token: 1 }),
            vec![Command::Animate(Animation::MessageOut), Command::HideMessage]
        );
        assert!(game.dispatch(Event::MessageElapsed { token: 1 }).is_empty());
    }

    #[test]
    fn flips_after_the_round_ended_are_rejected() {
        let mut game = playing(2, 2, 10);
        game.win();

        assert_eq!(game.flip_card(0), Err(GameError::NotPlaying));
    }

    #[test]
    fn empty_grid_never_starts_a_flip() {
        let mut game = playing(0, 0, 10);

        assert_eq!(game.required_count(), 0);
        assert_eq!(game.flip_card(0), Err(GameError::InvalidCard));
        assert_eq!(game.phase(), Phase::Playing);
    }
}
