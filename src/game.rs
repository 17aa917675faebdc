use crate::content::Deck;
use crate::scheduler::CueScheduler;
use crate::summary::SessionSummary;
use std::time::Duration;

/// Delay between the keypress and the head-bump on the block, when the hit
/// actually lands (score, coin, streak).
pub const JUMP_APEX: Duration = Duration::from_millis(250);
/// How long the wrong-key flash stays on the block.
pub const ERROR_FLASH: Duration = Duration::from_millis(300);
/// Pause before a freshly dealt round is called out.
pub const ROUND_ANNOUNCE_DELAY: Duration = Duration::from_millis(400);
/// Pause before the expected character is repeated after a miss.
pub const REPRONOUNCE_DELAY: Duration = Duration::from_millis(600);
/// Pause on a mid-word hit before the cursor moves to the next letter.
pub const MID_WORD_STEP: Duration = Duration::from_millis(800);
/// Gap between speaking a whole word and calling out a single letter of it.
pub const WORD_SPELL_GAP: Duration = Duration::from_millis(1000);
/// Round turnaround for an ordinary hit.
pub const NEXT_ROUND_SHORT: Duration = Duration::from_millis(1200);
/// Round turnaround when the star celebration is playing.
pub const NEXT_ROUND_CELEBRATION: Duration = Duration::from_millis(3500);
/// Every n-th streak gets the star celebration on level one.
pub const STREAK_CELEBRATION_EVERY: u32 = 5;

pub const DEFAULT_LIVES: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    One,
    Two,
}

/// Where the current round is in its input/reward cycle. `Celebrating` and
/// `AdvancingRound` discard keypresses, which is what keeps one reward chain
/// in flight at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingInput,
    Celebrating,
    AdvancingRound,
}

/// Sound requests emitted by the state machine. The event loop maps these
/// onto the sound engine; the game itself never touches audio I/O.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioCue {
    Jump,
    Coin,
    Bump,
    PowerUp,
    GameOver,
    Pronounce(char),
    Speak(String),
    StopAll,
}

/// Deferred steps of the reward and feedback chains, run by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnAction {
    LandHit,
    AdvanceCursor,
    DealNextRound,
    AnnounceRound,
    PronounceCursor,
    SpeakTarget,
    ClearErrorFlash,
    Repronounce,
}

/// The characters the player has to type this round, with the cursor at the
/// one currently expected. Level one rounds hold a single character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Round {
    pub chars: Vec<char>,
    pub cursor: usize,
    pub hits: Vec<bool>,
}

impl Round {
    pub fn new(chars: Vec<char>) -> Self {
        let hits = vec![false; chars.len()];
        Self {
            chars,
            cursor: 0,
            hits,
        }
    }

    pub fn expected_char(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    pub fn mark_hit(&mut self) {
        if let Some(hit) = self.hits.get_mut(self.cursor) {
            *hit = true;
        }
    }

    pub fn advance_cursor(&mut self) {
        if self.cursor + 1 < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn on_last_char(&self) -> bool {
        !self.chars.is_empty() && self.cursor + 1 == self.chars.len()
    }

    pub fn word(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Uppercase-normalizes a typed character for comparison with the target.
/// Key events that don't carry a single character never get this far.
pub fn normalize_key(key: char) -> char {
    key.to_ascii_uppercase()
}

/// One play session: screen, level, the round in progress, score, streak and
/// lives, plus the pending timed actions that drive the reward chains.
#[derive(Debug)]
pub struct Game {
    pub deck: Deck,
    pub screen: Screen,
    pub level: Level,
    pub phase: RoundPhase,
    pub round: Round,
    pub score: u32,
    pub streak: u32,
    pub lives: u32,
    pub starting_lives: u32,
    pub jumping: bool,
    pub coin_visible: bool,
    pub star_active: bool,
    pub error_flash: bool,
    pub summary: SessionSummary,
    scheduler: CueScheduler<TurnAction>,
}

impl Game {
    pub fn new(deck: Deck, starting_lives: u32) -> Self {
        Self {
            deck,
            screen: Screen::Menu,
            level: Level::One,
            phase: RoundPhase::AwaitingInput,
            round: Round::default(),
            score: 0,
            streak: 0,
            lives: starting_lives,
            starting_lives,
            jumping: false,
            coin_visible: false,
            star_active: false,
            error_flash: false,
            summary: SessionSummary::new(),
            scheduler: CueScheduler::new(),
        }
    }

    pub fn expected_char(&self) -> Option<char> {
        self.round.expected_char()
    }

    /// Starts a fresh session at the given level and queues the first
    /// announcement.
    pub fn start(&mut self, level: Level) -> Vec<AudioCue> {
        self.level = level;
        self.score = 0;
        self.streak = 0;
        self.lives = self.starting_lives;
        self.summary = SessionSummary::new();
        self.scheduler.clear();
        self.reset_transient_flags();
        self.deal_round();
        self.phase = RoundPhase::AwaitingInput;
        self.screen = Screen::Playing;
        self.scheduler
            .schedule(ROUND_ANNOUNCE_DELAY, TurnAction::AnnounceRound);
        vec![]
    }

    pub fn restart(&mut self) -> Vec<AudioCue> {
        self.start(self.level)
    }

    /// Leaves the playing screen. Everything pending is cancelled so no stale
    /// reward action can land in a later session.
    pub fn back_to_menu(&mut self) -> Vec<AudioCue> {
        self.scheduler.clear();
        self.reset_transient_flags();
        self.phase = RoundPhase::AwaitingInput;
        self.lives = self.starting_lives;
        self.screen = Screen::Menu;
        vec![AudioCue::StopAll]
    }

    /// Handles one typed character. Ignored outside the playing screen and
    /// while a reward chain is in flight.
    pub fn submit_key(&mut self, key: char) -> Vec<AudioCue> {
        if self.screen != Screen::Playing || self.phase != RoundPhase::AwaitingInput {
            return vec![];
        }
        let Some(expected) = self.round.expected_char() else {
            return vec![];
        };
        if normalize_key(key) == expected {
            self.begin_reward()
        } else {
            self.lose_life(expected)
        }
    }

    /// Repeats the current target out loud without touching any state.
    pub fn replay(&self) -> Vec<AudioCue> {
        if self.screen != Screen::Playing || self.phase != RoundPhase::AwaitingInput {
            return vec![];
        }
        match self.level {
            Level::One => self
                .round
                .expected_char()
                .map(AudioCue::Pronounce)
                .into_iter()
                .collect(),
            Level::Two => vec![AudioCue::Speak(self.round.word())],
        }
    }

    /// Advances the game clock, running whatever timed actions have come due.
    pub fn on_tick(&mut self, dt: Duration) -> Vec<AudioCue> {
        let mut cues = Vec::new();
        for action in self.scheduler.advance(dt) {
            self.apply(action, &mut cues);
        }
        cues
    }

    fn begin_reward(&mut self) -> Vec<AudioCue> {
        self.phase = RoundPhase::Celebrating;
        self.jumping = true;
        self.scheduler.schedule(JUMP_APEX, TurnAction::LandHit);
        vec![AudioCue::Jump]
    }

    fn lose_life(&mut self, expected: char) -> Vec<AudioCue> {
        self.streak = 0;
        self.lives = self.lives.saturating_sub(1);
        self.summary.record_miss(expected);
        if self.lives == 0 {
            self.finish_game();
            vec![AudioCue::GameOver]
        } else {
            self.error_flash = true;
            self.scheduler
                .schedule(ERROR_FLASH, TurnAction::ClearErrorFlash);
            self.scheduler
                .schedule(REPRONOUNCE_DELAY, TurnAction::Repronounce);
            vec![AudioCue::Bump]
        }
    }

    fn apply(&mut self, action: TurnAction, cues: &mut Vec<AudioCue>) {
        match action {
            TurnAction::LandHit => {
                self.score += 100;
                self.streak += 1;
                self.summary.record_hit();
                self.summary.note_streak(self.streak);
                self.round.mark_hit();
                self.coin_visible = true;
                if self.round.on_last_char() {
                    self.summary.record_round();
                    self.phase = RoundPhase::AdvancingRound;
                    let celebrate = self.streak % STREAK_CELEBRATION_EVERY == 0
                        || self.level == Level::Two;
                    if celebrate {
                        self.star_active = true;
                        self.scheduler
                            .schedule(NEXT_ROUND_CELEBRATION, TurnAction::DealNextRound);
                        if self.level == Level::Two {
                            self.scheduler
                                .schedule(WORD_SPELL_GAP, TurnAction::SpeakTarget);
                        }
                        cues.push(AudioCue::PowerUp);
                    } else {
                        self.scheduler
                            .schedule(NEXT_ROUND_SHORT, TurnAction::DealNextRound);
                        cues.push(AudioCue::Coin);
                    }
                } else {
                    self.scheduler
                        .schedule(MID_WORD_STEP, TurnAction::AdvanceCursor);
                    cues.push(AudioCue::Coin);
                }
            }
            TurnAction::AdvanceCursor => {
                self.jumping = false;
                self.coin_visible = false;
                self.round.advance_cursor();
                self.phase = RoundPhase::AwaitingInput;
                if let Some(c) = self.round.expected_char() {
                    cues.push(AudioCue::Pronounce(c));
                }
            }
            TurnAction::DealNextRound => {
                self.deal_round();
                self.reset_transient_flags();
                self.phase = RoundPhase::AwaitingInput;
                self.scheduler
                    .schedule(ROUND_ANNOUNCE_DELAY, TurnAction::AnnounceRound);
            }
            TurnAction::AnnounceRound => match self.level {
                Level::One => {
                    if let Some(c) = self.round.expected_char() {
                        cues.push(AudioCue::Pronounce(c));
                    }
                }
                Level::Two => {
                    cues.push(AudioCue::Speak(self.round.word()));
                    self.scheduler
                        .schedule(WORD_SPELL_GAP, TurnAction::PronounceCursor);
                }
            },
            // Both fire only if the player hasn't moved on in the meantime,
            // so a late callout never talks over a reward chain.
            TurnAction::PronounceCursor | TurnAction::Repronounce => {
                if self.phase == RoundPhase::AwaitingInput {
                    if let Some(c) = self.round.expected_char() {
                        cues.push(AudioCue::Pronounce(c));
                    }
                }
            }
            TurnAction::SpeakTarget => {
                cues.push(AudioCue::Speak(self.round.word()));
            }
            TurnAction::ClearErrorFlash => {
                self.error_flash = false;
            }
        }
    }

    fn deal_round(&mut self) {
        let chars: Vec<char> = match self.level {
            Level::One => vec![self.deck.random_char()],
            Level::Two => self.deck.random_word().chars().collect(),
        };
        self.round = Round::new(chars);
    }

    fn finish_game(&mut self) {
        self.scheduler.clear();
        self.reset_transient_flags();
        self.phase = RoundPhase::AwaitingInput;
        self.screen = Screen::GameOver;
    }

    fn reset_transient_flags(&mut self) {
        self.jumping = false;
        self.coin_visible = false;
        self.star_active = false;
        self.error_flash = false;
    }
}
