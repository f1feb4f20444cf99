//! Game session: owns all round state and exposes player commands
//!
//! The front-end calls the command methods on input, calls
//! [`GameSession::advance`] once per display frame, then drains
//! [`GameEvent`]s to drive audio and effects.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::kick::KickAnimation;
use super::power::Tier;
use super::question::Question;
use super::scheduler::{Scheduler, TimerHandle, TimerKind};
use super::state::{Feedback, GamePhase, KickState, RoundState, RoundSummary, Snapshot};
use crate::audio::AudioCue;
use crate::consts::*;
use crate::effects::ConfettiBurst;

/// Something the front-end should react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new question is on screen
    QuestionReady { index: u32 },
    /// Ball left the spot toward an option
    KickStarted { index: usize, tier: Tier },
    /// Ball landed
    KickResolved {
        correct: bool,
        selected: u32,
        answer: u32,
    },
    RoundFinished(RoundSummary),
    PlayCue(AudioCue),
    PauseCue(AudioCue),
    StopCue(AudioCue),
    Celebrate(ConfettiBurst),
}

pub struct GameSession {
    pub(super) round: RoundState,
    pub(super) kick: KickState,
    pub(super) paused: bool,
    help_open: bool,
    /// Whether the round was already paused when help opened
    paused_before_help: bool,
    rng: Pcg32,
    pub(super) scheduler: Scheduler,
    /// Session clock (ms); only advances while a round is playing and unpaused
    pub(super) clock_ms: f64,
    /// Last frame timestamp from the host (ms)
    pub(super) last_frame_ms: Option<f64>,
    second_timer: Option<TimerHandle>,
    pub(super) charge_timer: Option<TimerHandle>,
    pub(super) feedback_timer: Option<TimerHandle>,
    summary: Option<RoundSummary>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session on the menu screen
    pub fn new(seed: u64) -> Self {
        Self {
            round: RoundState::default(),
            kick: KickState::default(),
            paused: false,
            help_open: false,
            paused_before_help: false,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(MAX_CATCHUP),
            clock_ms: 0.0,
            last_frame_ms: None,
            second_timer: None,
            charge_timer: None,
            feedback_timer: None,
            summary: None,
            events: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.round.phase
    }

    pub fn score(&self) -> u32 {
        self.round.score
    }

    pub fn question_index(&self) -> u32 {
        self.round.question_index
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.round.elapsed_secs
    }

    pub fn question(&self) -> Option<&Question> {
        self.round.question.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_help_open(&self) -> bool {
        self.help_open
    }

    pub fn is_kicking(&self) -> bool {
        self.kick.is_kicking()
    }

    pub fn is_holding(&self) -> bool {
        self.kick.meter.is_holding()
    }

    pub fn power(&self) -> f32 {
        self.kick.meter.power()
    }

    pub fn feedback(&self) -> Feedback {
        self.kick.feedback
    }

    pub fn summary(&self) -> Option<RoundSummary> {
        self.summary
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Number of live timers
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Whether a selection or hold would be accepted right now
    pub fn accepts_input(&self) -> bool {
        self.round.phase == GamePhase::Playing
            && !self.paused
            && self.round.question.is_some()
            && !self.kick.is_kicking()
            && self.feedback_timer.is_none()
    }

    // === Round controller ===

    /// Start the first round from the menu
    pub fn start(&mut self) -> bool {
        if self.round.phase != GamePhase::Menu {
            return false;
        }
        self.start_round();
        true
    }

    /// Start over from any phase
    pub fn restart(&mut self) {
        log::info!("Restarting round");
        self.start_round();
    }

    /// Reset score, time and index, then show the first question
    pub fn start_round(&mut self) {
        self.cancel_timers();
        if self.help_open {
            self.help_open = false;
            self.emit(GameEvent::StopCue(AudioCue::Instructions));
        }
        self.round.reset();
        self.kick.reset();
        self.paused = false;
        self.summary = None;
        self.round.phase = GamePhase::Playing;

        self.generate_question();
        self.arm_second_timer();
        self.emit(GameEvent::PlayCue(AudioCue::Background));
        log::info!("Round started ({} questions)", QUESTION_COUNT);
    }

    /// Replace the current question and reset the kick
    pub fn generate_question(&mut self) {
        let question = Question::generate(&mut self.rng);
        log::debug!(
            "Question {}: {} + {} = ? {:?}",
            self.round.question_number(),
            question.num1,
            question.num2,
            question.options
        );
        self.round.question = Some(question);
        self.kick.reset();
        self.emit(GameEvent::QuestionReady {
            index: self.round.question_index,
        });
    }

    /// Finish the round once every question has been answered
    pub fn end_round(&mut self) -> bool {
        if self.round.phase != GamePhase::Playing || self.round.question_index < QUESTION_COUNT {
            return false;
        }
        self.cancel_timers();
        self.round.phase = GamePhase::Finished;
        self.paused = false;
        let summary = RoundSummary::from_round(&self.round);
        self.summary = Some(summary);
        self.emit(GameEvent::StopCue(AudioCue::Background));
        self.emit(GameEvent::RoundFinished(summary));
        log::info!(
            "Round finished: {}/{} in {}s ({} stars)",
            summary.score,
            summary.question_count,
            summary.elapsed_secs,
            summary.stars
        );
        true
    }

    /// Move past a resolved question
    pub(super) fn next_question(&mut self) {
        self.round.question_index += 1;
        if !self.end_round() {
            self.generate_question();
        }
    }

    fn arm_second_timer(&mut self) {
        if let Some(handle) = self.second_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.second_timer = Some(
            self.scheduler
                .every(self.clock_ms, SECOND_MS, TimerKind::ElapsedSecond),
        );
    }

    fn cancel_timers(&mut self) {
        self.scheduler.cancel_all();
        self.second_timer = None;
        self.charge_timer = None;
        self.feedback_timer = None;
    }

    // === Input resolver ===

    /// Kick at the option in display position `index`
    pub fn select_option(&mut self, index: usize) -> bool {
        if !self.accepts_input() || index >= OPTION_COUNT {
            log::debug!("Ignored selection of option {}", index);
            return false;
        }
        // A click overrides a charge in progress
        if self.kick.meter.is_holding() {
            self.cancel_charge();
        }
        self.emit(GameEvent::PlayCue(AudioCue::UiClick));
        self.launch_kick(index);
        true
    }

    /// Press of the kick key
    pub fn begin_hold(&mut self) -> bool {
        if !self.accepts_input() || !self.kick.meter.begin() {
            log::debug!("Ignored hold start");
            return false;
        }
        self.charge_timer = Some(
            self.scheduler
                .every(self.clock_ms, CHARGE_TICK_MS, TimerKind::ChargeTick),
        );
        true
    }

    /// Release of the kick key; returns the option position kicked at.
    ///
    /// A release while paused drops the charge without kicking.
    pub fn end_hold(&mut self) -> Option<usize> {
        if !self.kick.meter.is_holding() {
            return None;
        }
        if let Some(handle) = self.charge_timer.take() {
            self.scheduler.cancel(handle);
        }
        if !self.accepts_input() {
            log::debug!("Dropped charge released while input is blocked");
            self.kick.meter.reset();
            return None;
        }
        let tier = self.kick.meter.release()?;
        log::debug!("Released at power {} ({})", self.kick.meter.power(), tier.as_str());
        let index = tier.index();
        self.launch_kick(index);
        Some(index)
    }

    fn cancel_charge(&mut self) {
        if let Some(handle) = self.charge_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.kick.meter.reset();
    }

    fn launch_kick(&mut self, index: usize) {
        let Some(question) = &self.round.question else {
            return;
        };
        let value = question.options[index];
        let kick = KickAnimation::new(self.clock_ms, index, value);
        let tier = kick.tier;
        self.kick.selected_index = Some(index);
        self.kick.animation = Some(kick);
        self.emit(GameEvent::KickStarted { index, tier });
    }

    // === Kick animator outcome ===

    /// Score a landed kick and start the feedback delay
    pub(super) fn resolve_kick(&mut self, kick: KickAnimation) {
        let Some(question) = &self.round.question else {
            return;
        };
        let answer = question.answer;
        let correct = kick.selected_value == answer;
        let landed_ms = kick.started_ms + KICK_DURATION_MS;

        self.kick.ball = kick.to;
        self.kick.meter.reset();
        if correct {
            self.round.score = (self.round.score + 1).min(QUESTION_COUNT);
            self.kick.feedback = Feedback::Correct;
            self.emit(GameEvent::PlayCue(AudioCue::Success));
            self.emit(GameEvent::Celebrate(ConfettiBurst::default()));
        } else {
            self.kick.feedback = Feedback::Incorrect { answer };
            self.emit(GameEvent::PlayCue(AudioCue::Incorrect));
        }
        self.emit(GameEvent::KickResolved {
            correct,
            selected: kick.selected_value,
            answer,
        });
        log::info!(
            "Question {}: kicked {} ({}), answer {}",
            self.round.question_number(),
            kick.selected_value,
            if correct { "correct" } else { "wrong" },
            answer
        );

        self.feedback_timer = Some(self.scheduler.once(
            landed_ms,
            FEEDBACK_DELAY_MS,
            TimerKind::FeedbackDelay,
        ));
    }

    // === Pause / help ===

    /// Pause the round: stops the clock and blocks input.
    ///
    /// Timers stay scheduled; the frozen clock holds them mid-period.
    pub fn pause(&mut self) -> bool {
        if self.round.phase != GamePhase::Playing || self.paused {
            return false;
        }
        self.paused = true;
        self.emit(GameEvent::PauseCue(AudioCue::Background));
        log::info!("Paused");
        true
    }

    /// Resume a paused round (not while help is open)
    pub fn resume(&mut self) -> bool {
        if !self.paused || self.help_open {
            return false;
        }
        self.paused = false;
        // Next frame re-baselines, so time spent paused is never replayed
        self.last_frame_ms = None;
        self.emit(GameEvent::PlayCue(AudioCue::Background));
        log::info!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Show the help overlay; pauses a running round
    pub fn open_help(&mut self) -> bool {
        if self.help_open {
            return false;
        }
        self.help_open = true;
        self.paused_before_help = self.paused;
        self.pause();
        self.emit(GameEvent::PlayCue(AudioCue::Instructions));
        true
    }

    /// Hide the help overlay; resumes only if help did the pausing
    pub fn close_help(&mut self) -> bool {
        if !self.help_open {
            return false;
        }
        self.help_open = false;
        self.emit(GameEvent::StopCue(AudioCue::Instructions));
        if !self.paused_before_help {
            self.resume();
        }
        true
    }

    pub fn toggle_help(&mut self) -> bool {
        if self.help_open {
            self.close_help()
        } else {
            self.open_help()
        }
    }

    /// Cancel every timer, drop any kick in flight and silence audio (page
    /// unload). The session is left on the menu, so later frames and input
    /// do nothing until a new round is started.
    pub fn teardown(&mut self) {
        self.cancel_timers();
        self.kick.reset();
        self.round.reset();
        self.round.phase = GamePhase::Menu;
        self.paused = false;
        self.help_open = false;
        self.paused_before_help = false;
        self.summary = None;
        self.last_frame_ms = None;
        self.emit(GameEvent::StopCue(AudioCue::Background));
        self.emit(GameEvent::StopCue(AudioCue::Instructions));
        log::info!("Session torn down");
    }

    // === Snapshots ===

    pub fn snapshot(&self) -> Snapshot {
        let kick_progress = self
            .kick
            .animation
            .as_ref()
            .map(|k| k.progress(self.clock_ms))
            .unwrap_or(if self.kick.feedback == Feedback::None {
                0.0
            } else {
                1.0
            });
        Snapshot {
            phase: self.round.phase,
            paused: self.paused,
            help_open: self.help_open,
            question_number: self.round.question_number(),
            question_count: QUESTION_COUNT,
            question: self.round.question.clone(),
            score: self.round.score,
            elapsed_secs: self.round.elapsed_secs,
            power: self.kick.meter.power(),
            tier: self.kick.meter.tier(),
            holding: self.kick.meter.is_holding(),
            kicking: self.kick.is_kicking(),
            kick_progress,
            ball: self.kick.ball,
            selected_index: self.kick.selected_index,
            feedback: self.kick.feedback,
            summary: self.summary,
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    /// Swap in a known question (tests and scripted demos)
    pub fn set_question(&mut self, question: Question) {
        self.round.question = Some(question);
        self.kick.reset();
    }
}
