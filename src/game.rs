//! Match controller
//!
//! Owns the court, the menu options, and the rally/score state, and is the
//! only thing that moves the match between phases. Collaborators (renderer,
//! sound, rally store) are injected at construction; input arrives through a
//! queue that is drained once per frame.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::highscores::record_rally;
use crate::input::{InputEvent, MenuDirection, RawInput};
use crate::platform::{RallyStore, Renderer, SoundSink};
use crate::sim::{Court, Motion, Opponent, Side, StepReport, step};
use crate::tuning::Tuning;
use crate::ui::{self, Scene};

/// Number of players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    OnePlayer,
    TwoPlayer,
}

impl Mode {
    pub fn opponent(self) -> Opponent {
        match self {
            Mode::OnePlayer => Opponent::Tracking,
            Mode::TwoPlayer => Opponent::Human,
        }
    }
}

/// How the human drives the left paddle in 1-player mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Controls {
    #[default]
    Keyboard,
    Pointer,
}

/// What to do once a match is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishAction {
    #[default]
    Replay,
    Menu,
}

/// Options picked through the menus. Defaults are each menu's first entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    pub mode: Mode,
    pub controls: Controls,
    pub on_finish: FinishAction,
}

/// Phase of the match state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Choosing 1 or 2 players
    MenuSelectMode,
    /// Choosing keyboard or pointer (1-player only)
    MenuSelectControls,
    /// Court is live, or idle waiting for a serve
    Playing,
    /// 2-player goal scored; checking for a winner
    RoundEnd,
    /// Match over; choosing replay or menu
    MatchEnd,
}

/// Inputs to the phase transition function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Enter pressed on a setup menu
    Confirm(MatchOptions),
    /// A goal ended the point
    Goal(Mode),
    /// 2-player win check after a goal
    RoundChecked { won: bool },
    /// Enter pressed on the end-of-match menu
    Finish(FinishAction),
}

impl MatchPhase {
    /// Pure transition function. Triggers that make no sense in a phase
    /// leave it unchanged.
    pub fn next(self, trigger: Trigger) -> MatchPhase {
        use MatchPhase::*;

        match (self, trigger) {
            (MenuSelectMode, Trigger::Confirm(options)) => match options.mode {
                Mode::OnePlayer => MenuSelectControls,
                Mode::TwoPlayer => Playing,
            },
            (MenuSelectControls, Trigger::Confirm(_)) => Playing,
            (Playing, Trigger::Goal(Mode::OnePlayer)) => MatchEnd,
            (Playing, Trigger::Goal(Mode::TwoPlayer)) => RoundEnd,
            (RoundEnd, Trigger::RoundChecked { won: true }) => MatchEnd,
            (RoundEnd, Trigger::RoundChecked { won: false }) => Playing,
            (MatchEnd, Trigger::Finish(FinishAction::Replay)) => Playing,
            (MatchEnd, Trigger::Finish(FinishAction::Menu)) => MenuSelectMode,
            (phase, _) => phase,
        }
    }

    /// Phases that show a two-option menu
    pub fn is_menu(self) -> bool {
        matches!(
            self,
            MatchPhase::MenuSelectMode | MatchPhase::MenuSelectControls | MatchPhase::MatchEnd
        )
    }
}

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    LeftWins,
    RightWins,
    /// 1-player match ended by a miss
    RallyOver { rally: u32, best: u32, new_best: bool },
}

/// Score-independent match state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    /// Returns by the human in the current 1-player match
    pub rally: u32,
    /// Best stored rally as of the last read
    pub best_rally: u32,
    pub winning_score: u32,
    /// Ball is live and the court advances every frame
    pub running: bool,
    pub outcome: Option<MatchOutcome>,
}

/// Queued input, mapped or still raw
#[derive(Debug, Clone, PartialEq)]
enum Queued {
    Event(InputEvent),
    Raw(RawInput),
}

pub struct MatchController<R, S, P> {
    tuning: Tuning,
    court: Court,
    options: MatchOptions,
    phase: MatchPhase,
    state: MatchState,
    queue: VecDeque<Queued>,
    rng: Pcg32,
    renderer: R,
    sound: S,
    store: P,
    needs_redraw: bool,
}

impl<R: Renderer, S: SoundSink, P: RallyStore> MatchController<R, S, P> {
    pub fn new(tuning: Tuning, seed: u64, renderer: R, sound: S, store: P) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let court = Court::new(&tuning, &mut rng);
        let state = MatchState {
            rally: 0,
            best_rally: store.max_rally(),
            winning_score: tuning.winning_score,
            running: false,
            outcome: None,
        };
        log::info!(
            "Match controller ready: {}x{} court, first to {}",
            tuning.playfield.width,
            tuning.playfield.height,
            tuning.winning_score
        );

        Self {
            tuning,
            court,
            options: MatchOptions::default(),
            phase: MatchPhase::MenuSelectMode,
            state,
            queue: VecDeque::new(),
            rng,
            renderer,
            sound,
            store,
            needs_redraw: true,
        }
    }

    /// Queue input; it takes effect at the start of the next frame
    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push_back(Queued::Event(event));
    }

    /// Queue browser input; it is mapped against the phase current when it
    /// is applied, so a key pressed right after a menu confirm in the same
    /// frame acts on the new phase
    pub fn push_raw(&mut self, raw: RawInput) {
        self.queue.push_back(Queued::Raw(raw));
    }

    /// Run one animation frame: apply queued input, advance the court if the
    /// ball is live, and redraw if anything changed. Returns whether the
    /// ball is still live.
    pub fn frame(&mut self) -> bool {
        while let Some(queued) = self.queue.pop_front() {
            let event = match queued {
                Queued::Event(event) => Some(event),
                Queued::Raw(raw) => raw.map(self.phase, &self.options),
            };
            if let Some(event) = event {
                self.handle(event);
            }
        }

        if self.phase == MatchPhase::Playing && self.state.running {
            let report = step(
                &mut self.court,
                &self.tuning,
                self.options.mode.opponent(),
                &mut self.rng,
            );
            self.apply(report);
        }

        if self.state.running || self.needs_redraw {
            self.draw();
            self.needs_redraw = false;
        }
        self.state.running
    }

    /// Zero both scores and put the court in serve position
    pub fn reset(&mut self) {
        self.court.reset(&self.tuning, &mut self.rng);
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.state.outcome
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::MenuNavigate(direction) => self.navigate(direction),
            InputEvent::MenuConfirm => self.confirm(),
            InputEvent::RequestStart => self.request_start(),
            InputEvent::SetPaddleVelocity { side, motion } => self.set_paddle_velocity(side, motion),
            InputEvent::PointerMoved { y } => self.pointer_moved(y),
        }
    }

    fn navigate(&mut self, direction: MenuDirection) {
        let first = direction == MenuDirection::Left;
        match self.phase {
            MatchPhase::MenuSelectMode => {
                self.options.mode = if first { Mode::OnePlayer } else { Mode::TwoPlayer };
            }
            MatchPhase::MenuSelectControls => {
                self.options.controls = if first { Controls::Keyboard } else { Controls::Pointer };
            }
            MatchPhase::MatchEnd => {
                self.options.on_finish = if first { FinishAction::Replay } else { FinishAction::Menu };
            }
            _ => return,
        }
        self.needs_redraw = true;
    }

    fn confirm(&mut self) {
        let trigger = match self.phase {
            MatchPhase::MenuSelectMode | MatchPhase::MenuSelectControls => {
                Trigger::Confirm(self.options)
            }
            MatchPhase::MatchEnd => Trigger::Finish(self.options.on_finish),
            _ => return,
        };
        let next = self.phase.next(trigger);
        self.enter(next);
        if next == MatchPhase::Playing {
            self.replay();
        }
    }

    /// Switch phase and reset the defaults of the menu being shown
    fn enter(&mut self, next: MatchPhase) {
        log::info!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        self.needs_redraw = true;

        match next {
            MatchPhase::MenuSelectMode => {
                self.options.mode = Mode::OnePlayer;
                self.state.outcome = None;
            }
            MatchPhase::MenuSelectControls => self.options.controls = Controls::Keyboard,
            MatchPhase::MatchEnd => self.options.on_finish = FinishAction::Replay,
            MatchPhase::Playing | MatchPhase::RoundEnd => {}
        }
    }

    /// Fresh match with the current options, idle until a serve
    fn replay(&mut self) {
        self.reset();
        self.state.running = false;
        self.state.rally = 0;
        self.state.outcome = None;
        if self.options.mode == Mode::OnePlayer {
            self.state.best_rally = self.state.best_rally.max(self.store.max_rally());
        }
        log::info!("New {:?} match ({:?} controls)", self.options.mode, self.options.controls);
    }

    fn request_start(&mut self) {
        if self.phase == MatchPhase::Playing && !self.state.running {
            self.state.running = true;
            log::debug!("Serve: u={:.1} v={:.1}", self.court.ball.vel.x, self.court.ball.vel.y);
        }
    }

    fn set_paddle_velocity(&mut self, side: Side, motion: Motion) {
        if self.phase != MatchPhase::Playing {
            return;
        }
        if self.options.mode == Mode::OnePlayer
            && (side == Side::Right || self.options.controls == Controls::Pointer)
        {
            return;
        }
        self.court
            .paddle_mut(side)
            .set_motion(motion, self.tuning.paddle_speed);
    }

    fn pointer_moved(&mut self, y: f32) {
        if self.phase != MatchPhase::Playing
            || self.options.mode != Mode::OnePlayer
            || self.options.controls != Controls::Pointer
        {
            return;
        }
        self.court.left.place_center(y, self.tuning.playfield);
        if !self.state.running {
            self.needs_redraw = true;
        }
    }

    fn apply(&mut self, report: StepReport) {
        for &sound in &report.sounds {
            self.sound.play(sound);
        }

        if report.rebound == Some(Side::Left) && self.options.mode == Mode::OnePlayer {
            self.state.rally += 1;
        }

        if report.goal.is_some() {
            self.state.running = false;
            let next = self.phase.next(Trigger::Goal(self.options.mode));
            match self.options.mode {
                Mode::OnePlayer => {
                    self.finish_rally();
                    self.enter(next);
                }
                Mode::TwoPlayer => {
                    self.enter(next);
                    self.check_round();
                }
            }
        }
    }

    fn finish_rally(&mut self) {
        let rally = self.state.rally;
        let record = record_rally(&mut self.store, self.state.best_rally, rally);
        self.state.best_rally = record.best;
        self.state.outcome = Some(MatchOutcome::RallyOver {
            rally,
            best: record.best,
            new_best: record.new_best,
        });
        self.state.rally = 0;
        log::info!("Rally over after {} returns (best {})", rally, record.best);
    }

    fn check_round(&mut self) {
        let (left, right) = self.court.scores();
        let winning = self.state.winning_score;
        let won = left == winning || right == winning;
        if won {
            let outcome = if left == winning {
                MatchOutcome::LeftWins
            } else {
                MatchOutcome::RightWins
            };
            self.state.outcome = Some(outcome);
            log::info!("{:?} at {} - {}", outcome, left, right);
        } else {
            log::debug!("Round over: {} - {}", left, right);
        }
        let next = self.phase.next(Trigger::RoundChecked { won });
        self.enter(next);
    }

    fn draw(&mut self) {
        let scene = Scene {
            phase: self.phase,
            options: &self.options,
            court: &self.court,
            state: &self.state,
            field: self.tuning.playfield,
        };
        ui::draw_scene(&mut self.renderer, &scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::platform::{Font, TextPos};
    use crate::sim::{Rect, SoundEvent};

    /// Keeps the texts drawn since the last clear
    #[derive(Debug, Default)]
    struct Recorder {
        texts: Vec<String>,
        frames: usize,
    }

    impl Renderer for Recorder {
        fn clear(&mut self) {
            self.texts.clear();
            self.frames += 1;
        }

        fn draw_rect(&mut self, _rect: Rect, _color: &str) {}

        fn draw_text(&mut self, text: &str, _pos: TextPos, _font: Font, _color: &str) {
            self.texts.push(text.to_string());
        }

        fn measure_text(&mut self, text: &str, font: Font) -> f32 {
            text.len() as f32 * font.size_px * 0.5
        }
    }

    type TestController = MatchController<Recorder, Vec<SoundEvent>, MemoryStore>;

    /// 800x490 keeps ball and paddle steps landing exactly on the walls
    fn tuning() -> Tuning {
        Tuning::default().with_playfield(800.0, 490.0)
    }

    fn controller(store: MemoryStore) -> TestController {
        MatchController::new(tuning(), 1234, Recorder::default(), Vec::new(), store)
    }

    fn send(ctl: &mut TestController, events: &[InputEvent]) {
        for &event in events {
            ctl.push_input(event);
        }
        ctl.frame();
    }

    fn start_two_player(ctl: &mut TestController) {
        send(
            ctl,
            &[
                InputEvent::MenuNavigate(MenuDirection::Right),
                InputEvent::MenuConfirm,
            ],
        );
    }

    fn start_one_player(ctl: &mut TestController, controls: Controls) {
        let mut events = vec![InputEvent::MenuConfirm];
        if controls == Controls::Pointer {
            events.push(InputEvent::MenuNavigate(MenuDirection::Right));
        }
        events.push(InputEvent::MenuConfirm);
        send(ctl, &events);
    }

    /// Move toward the ball, stopping within one paddle step
    fn chase(ctl: &TestController, side: Side) -> Motion {
        let court = ctl.court();
        let paddle = court.paddle(side);
        let max = ctl.tuning().playfield.height - paddle.size.y;
        let target = (court.ball.center_y() - paddle.size.y / 2.0).clamp(0.0, max);
        let diff = target - paddle.pos.y;
        let speed = ctl.tuning().paddle_speed;
        if diff >= speed {
            Motion::Down
        } else if diff <= -speed {
            Motion::Up
        } else {
            Motion::Stop
        }
    }

    /// Park a paddle at the end of the court away from the ball
    fn dodge(ctl: &mut TestController, side: Side) {
        let height = ctl.tuning.playfield.height;
        let ball_center = ctl.court.ball.center_y();
        let paddle = ctl.court.paddle_mut(side);
        paddle.pos.y = if ball_center < height / 2.0 {
            height - paddle.size.y
        } else {
            0.0
        };
    }

    fn serve_if_idle(ctl: &mut TestController) {
        if ctl.phase() == MatchPhase::Playing && !ctl.is_running() {
            ctl.push_input(InputEvent::RequestStart);
        }
    }

    /// Human returns `returns` balls in 1-player mode, then misses
    fn play_rally(ctl: &mut TestController, returns: u32) {
        for _ in 0..200_000 {
            if ctl.phase() == MatchPhase::MatchEnd {
                return;
            }
            serve_if_idle(ctl);
            if ctl.state().rally < returns {
                let motion = chase(ctl, Side::Left);
                ctl.push_input(InputEvent::SetPaddleVelocity {
                    side: Side::Left,
                    motion,
                });
            } else {
                ctl.push_input(InputEvent::SetPaddleVelocity {
                    side: Side::Left,
                    motion: Motion::Stop,
                });
                dodge(ctl, Side::Left);
            }
            ctl.frame();
        }
        panic!("rally never ended");
    }

    #[test]
    fn test_transition_function() {
        use MatchPhase::*;
        let one = MatchOptions::default();
        let two = MatchOptions {
            mode: Mode::TwoPlayer,
            ..Default::default()
        };

        assert_eq!(MenuSelectMode.next(Trigger::Confirm(one)), MenuSelectControls);
        assert_eq!(MenuSelectMode.next(Trigger::Confirm(two)), Playing);
        assert_eq!(MenuSelectControls.next(Trigger::Confirm(one)), Playing);
        assert_eq!(Playing.next(Trigger::Goal(Mode::OnePlayer)), MatchEnd);
        assert_eq!(Playing.next(Trigger::Goal(Mode::TwoPlayer)), RoundEnd);
        assert_eq!(RoundEnd.next(Trigger::RoundChecked { won: false }), Playing);
        assert_eq!(RoundEnd.next(Trigger::RoundChecked { won: true }), MatchEnd);
        assert_eq!(MatchEnd.next(Trigger::Finish(FinishAction::Replay)), Playing);
        assert_eq!(MatchEnd.next(Trigger::Finish(FinishAction::Menu)), MenuSelectMode);

        // Nonsense triggers are ignored
        assert_eq!(Playing.next(Trigger::Confirm(one)), Playing);
        assert_eq!(MenuSelectMode.next(Trigger::Goal(Mode::TwoPlayer)), MenuSelectMode);
    }

    #[test]
    fn test_menu_flow_one_player_pointer() {
        let mut ctl = controller(MemoryStore::new());
        ctl.frame();
        assert_eq!(ctl.phase(), MatchPhase::MenuSelectMode);
        assert!(ctl.renderer().texts.contains(&"PONG".to_string()));

        send(&mut ctl, &[InputEvent::MenuConfirm]);
        assert_eq!(ctl.phase(), MatchPhase::MenuSelectControls);
        assert_eq!(ctl.options().controls, Controls::Keyboard);

        send(
            &mut ctl,
            &[
                InputEvent::MenuNavigate(MenuDirection::Right),
                InputEvent::MenuConfirm,
            ],
        );
        assert_eq!(ctl.phase(), MatchPhase::Playing);
        assert_eq!(ctl.options().mode, Mode::OnePlayer);
        assert_eq!(ctl.options().controls, Controls::Pointer);
        assert!(!ctl.is_running());
        assert!(ctl.renderer().texts.contains(&"Click to begin.".to_string()));
    }

    #[test]
    fn test_menu_flow_two_player() {
        let mut ctl = controller(MemoryStore::new());
        start_two_player(&mut ctl);
        assert_eq!(ctl.phase(), MatchPhase::Playing);
        assert_eq!(ctl.options().mode, Mode::TwoPlayer);
        assert_eq!(ctl.court().scores(), (0, 0));
        assert!(!ctl.is_running());
    }

    #[test]
    fn test_request_start_only_when_idle_playing() {
        let mut ctl = controller(MemoryStore::new());
        send(&mut ctl, &[InputEvent::RequestStart]);
        assert_eq!(ctl.phase(), MatchPhase::MenuSelectMode);
        assert!(!ctl.is_running());

        start_two_player(&mut ctl);
        let before = ctl.court().ball.pos;
        send(&mut ctl, &[InputEvent::RequestStart]);
        assert!(ctl.is_running());
        assert_ne!(ctl.court().ball.pos, before);
    }

    #[test]
    fn test_velocity_ignored_outside_play_and_for_ai() {
        let mut ctl = controller(MemoryStore::new());
        let up = InputEvent::SetPaddleVelocity {
            side: Side::Left,
            motion: Motion::Up,
        };
        send(&mut ctl, &[up]);
        assert_eq!(ctl.court().left.vel_y, 0.0);

        start_one_player(&mut ctl, Controls::Keyboard);
        send(
            &mut ctl,
            &[
                up,
                InputEvent::SetPaddleVelocity {
                    side: Side::Right,
                    motion: Motion::Down,
                },
            ],
        );
        assert_eq!(ctl.court().left.vel_y, -6.0);
        assert_eq!(ctl.court().right.vel_y, 0.0);
    }

    #[test]
    fn test_pointer_positions_left_paddle() {
        let mut ctl = controller(MemoryStore::new());
        start_one_player(&mut ctl, Controls::Pointer);

        send(&mut ctl, &[InputEvent::PointerMoved { y: 100.0 }]);
        assert_eq!(ctl.court().left.pos.y, 65.0);
        send(&mut ctl, &[InputEvent::PointerMoved { y: -40.0 }]);
        assert_eq!(ctl.court().left.pos.y, 0.0);
        send(&mut ctl, &[InputEvent::PointerMoved { y: 9_000.0 }]);
        assert_eq!(ctl.court().left.pos.y, 420.0);

        // Keys do nothing in pointer mode
        send(
            &mut ctl,
            &[InputEvent::SetPaddleVelocity {
                side: Side::Left,
                motion: Motion::Up,
            }],
        );
        assert_eq!(ctl.court().left.vel_y, 0.0);
    }

    #[test]
    fn test_non_winning_goal_returns_to_idle_play() {
        let mut ctl = controller(MemoryStore::new());
        start_two_player(&mut ctl);
        send(&mut ctl, &[InputEvent::RequestStart]);

        ctl.court.ball.pos.x = 797.0;
        ctl.court.ball.vel.x = 3.0;
        ctl.frame();

        assert_eq!(ctl.phase(), MatchPhase::Playing);
        assert!(!ctl.is_running());
        assert_eq!(ctl.court().scores(), (1, 0));
        assert_eq!(ctl.outcome(), None);
        assert!(ctl.renderer().texts.contains(&"1 - 0".to_string()));
        assert_eq!(ctl.sound().last(), Some(&SoundEvent::Goal));

        // Court stays put until the next serve
        let parked = ctl.court().ball.pos;
        ctl.frame();
        assert_eq!(ctl.court().ball.pos, parked);
    }

    #[test]
    fn test_two_player_match_to_five() {
        let mut ctl = controller(MemoryStore::new());
        start_two_player(&mut ctl);

        let mut frames = 0;
        while ctl.phase() != MatchPhase::MatchEnd {
            assert!(frames < 100_000, "match never ended");
            assert_eq!(ctl.court().right.score, 0, "left paddle missed");
            serve_if_idle(&mut ctl);
            let motion = chase(&ctl, Side::Left);
            ctl.push_input(InputEvent::SetPaddleVelocity {
                side: Side::Left,
                motion,
            });
            dodge(&mut ctl, Side::Right);
            ctl.frame();
            frames += 1;
        }

        assert_eq!(ctl.court().scores(), (5, 0));
        assert_eq!(ctl.outcome(), Some(MatchOutcome::LeftWins));
        assert!(!ctl.is_running());
        assert_eq!(ctl.options().on_finish, FinishAction::Replay);
        let texts = &ctl.renderer().texts;
        assert!(texts.contains(&"Player 1 wins the game!".to_string()));
        assert!(texts.contains(&"5 - 0".to_string()));
        assert_eq!(
            ctl.sound().iter().filter(|&&s| s == SoundEvent::Goal).count(),
            5
        );

        // No more ticking, even if a serve is requested
        let parked = ctl.court().ball.pos;
        send(&mut ctl, &[InputEvent::RequestStart]);
        assert_eq!(ctl.court().ball.pos, parked);

        // Back to the main menu, with its default restored
        send(
            &mut ctl,
            &[
                InputEvent::MenuNavigate(MenuDirection::Right),
                InputEvent::MenuConfirm,
            ],
        );
        assert_eq!(ctl.phase(), MatchPhase::MenuSelectMode);
        assert_eq!(ctl.options().mode, Mode::OnePlayer);
        assert_eq!(ctl.outcome(), None);
    }

    #[test]
    fn test_replay_resets_scores() {
        let mut ctl = controller(MemoryStore::new());
        start_two_player(&mut ctl);
        ctl.court.left.score = 5;
        ctl.court.right.score = 3;
        ctl.phase = MatchPhase::MatchEnd;

        send(&mut ctl, &[InputEvent::MenuConfirm]);
        assert_eq!(ctl.phase(), MatchPhase::Playing);
        assert_eq!(ctl.options().mode, Mode::TwoPlayer);
        assert_eq!(ctl.court().scores(), (0, 0));
        assert!(!ctl.is_running());
    }

    #[test]
    fn test_one_player_miss_keeps_higher_best() {
        let mut ctl = controller(MemoryStore::with_max_rally(10));
        start_one_player(&mut ctl, Controls::Keyboard);
        assert_eq!(ctl.state().best_rally, 10);

        play_rally(&mut ctl, 7);

        assert_eq!(ctl.phase(), MatchPhase::MatchEnd);
        assert!(!ctl.is_running());
        assert_eq!(
            ctl.outcome(),
            Some(MatchOutcome::RallyOver {
                rally: 7,
                best: 10,
                new_best: false
            })
        );
        assert_eq!(ctl.store().max_rally(), 10);
        assert_eq!(ctl.state().rally, 0);
        assert!(ctl.renderer().texts.contains(&"Max score: 10".to_string()));
    }

    #[test]
    fn test_one_player_miss_records_new_best() {
        let mut ctl = controller(MemoryStore::with_max_rally(10));
        start_one_player(&mut ctl, Controls::Keyboard);

        play_rally(&mut ctl, 12);

        assert_eq!(
            ctl.outcome(),
            Some(MatchOutcome::RallyOver {
                rally: 12,
                best: 12,
                new_best: true
            })
        );
        assert_eq!(ctl.store().max_rally(), 12);
        assert_eq!(ctl.state().best_rally, 12);
    }

    #[test]
    fn test_one_player_first_miss_ends_match() {
        let mut ctl = controller(MemoryStore::new());
        start_one_player(&mut ctl, Controls::Keyboard);

        play_rally(&mut ctl, 0);

        assert_eq!(ctl.phase(), MatchPhase::MatchEnd);
        assert_eq!(
            ctl.outcome(),
            Some(MatchOutcome::RallyOver {
                rally: 0,
                best: 0,
                new_best: false
            })
        );
        assert_eq!(ctl.store().max_rally(), 0);
    }

    #[test]
    fn test_unsaved_best_survives_replay() {
        let mut ctl = controller(MemoryStore::with_max_rally(3).read_only());
        start_one_player(&mut ctl, Controls::Keyboard);

        play_rally(&mut ctl, 5);
        assert_eq!(ctl.state().best_rally, 5);
        assert_eq!(ctl.store().max_rally(), 3);

        send(&mut ctl, &[InputEvent::MenuConfirm]);
        assert_eq!(ctl.phase(), MatchPhase::Playing);
        assert_eq!(ctl.state().best_rally, 5);

        play_rally(&mut ctl, 4);
        assert_eq!(
            ctl.outcome(),
            Some(MatchOutcome::RallyOver {
                rally: 4,
                best: 5,
                new_best: false
            })
        );
    }

    #[test]
    fn test_controls_menu_default_restored_on_return() {
        let mut ctl = controller(MemoryStore::new());
        start_one_player(&mut ctl, Controls::Pointer);
        assert_eq!(ctl.options().controls, Controls::Pointer);

        play_rally(&mut ctl, 0);
        assert_eq!(ctl.phase(), MatchPhase::MatchEnd);

        send(
            &mut ctl,
            &[
                InputEvent::MenuNavigate(MenuDirection::Right),
                InputEvent::MenuConfirm,
            ],
        );
        assert_eq!(ctl.phase(), MatchPhase::MenuSelectMode);

        send(&mut ctl, &[InputEvent::MenuConfirm]);
        assert_eq!(ctl.phase(), MatchPhase::MenuSelectControls);
        assert_eq!(ctl.options().controls, Controls::Keyboard);
    }

    #[test]
    fn test_raw_keys_map_against_phase_when_applied() {
        let mut ctl = controller(MemoryStore::new());
        start_two_player(&mut ctl);
        ctl.phase = MatchPhase::MatchEnd;

        // Enter and Space land in the same frame
        ctl.push_raw(RawInput::KeyDown("Enter".into()));
        ctl.push_raw(RawInput::KeyDown(" ".into()));
        ctl.frame();

        assert_eq!(ctl.phase(), MatchPhase::Playing);
        assert!(ctl.is_running());
    }
}
