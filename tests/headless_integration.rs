use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use letterbros::content::Deck;
use letterbros::game::{AudioCue, Game, Level, RoundPhase, Screen};

// Headless integration using the internal runtime + Game without a TTY.
// A stepped ticker stamps each tick with more game time than wall time, so
// reward chains that take seconds on screen resolve in milliseconds here.

fn tiny_deck() -> Deck {
    Deck {
        name: "test".to_string(),
        letters: "K".to_string(),
        digits: "".to_string(),
        words: vec!["KAT".to_string()],
        letter_names: HashMap::new(),
    }
}

#[test]
fn headless_level_one_round_completes() {
    // Arrange: a deck with a single letter so the target is always 'K'
    let mut game = Game::new(tiny_deck(), 3);
    game.start(Level::One);

    // Channel for the test event source
    let (tx, rx) = mpsc::channel();

    let es = letterbros::runtime::TestEventSource::new(rx);
    let ticker =
        letterbros::runtime::SteppedTicker::new(Duration::from_millis(5), Duration::from_millis(50));
    let mut runner = letterbros::runtime::Runner::new(es, ticker);

    // Producer: press the one correct key
    tx.send(letterbros::runtime::LoopEvent::Key(KeyEvent::new(
        KeyCode::Char('k'),
        KeyModifiers::NONE,
    )))
    .unwrap();

    // Act: drive the loop until the round lands and the next one is dealt
    let mut cues = Vec::new();
    for _ in 0..200u32 {
        match runner.step() {
            letterbros::runtime::LoopEvent::Tick(dt) => {
                cues.extend(game.on_tick(dt));
            }
            letterbros::runtime::LoopEvent::Resize => {}
            letterbros::runtime::LoopEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    cues.extend(game.submit_key(c));
                }
            }
        }
        if game.summary.rounds_completed >= 1 && game.phase == RoundPhase::AwaitingInput {
            break;
        }
    }

    // Assert: the hit scored and the full jump/coin chain played out
    assert_eq!(game.summary.rounds_completed, 1, "round should have landed");
    assert_eq!(game.score, 100);
    assert_eq!(game.streak, 1);
    assert!(cues.contains(&AudioCue::Jump));
    assert!(cues.contains(&AudioCue::Coin));
    assert!(cues.contains(&AudioCue::Pronounce('K')));
}

#[test]
fn headless_wrong_keys_reach_game_over() {
    let mut game = Game::new(tiny_deck(), 2);
    game.start(Level::One);

    let (tx, rx) = mpsc::channel();
    let es = letterbros::runtime::TestEventSource::new(rx);
    let ticker =
        letterbros::runtime::SteppedTicker::new(Duration::from_millis(5), Duration::from_millis(50));
    let mut runner = letterbros::runtime::Runner::new(es, ticker);

    // Two wrong presses with two lives should end the session
    for _ in 0..2 {
        tx.send(letterbros::runtime::LoopEvent::Key(KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }

    let mut cues = Vec::new();
    for _ in 0..100u32 {
        match runner.step() {
            letterbros::runtime::LoopEvent::Tick(dt) => {
                cues.extend(game.on_tick(dt));
            }
            letterbros::runtime::LoopEvent::Resize => {}
            letterbros::runtime::LoopEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    cues.extend(game.submit_key(c));
                }
            }
        }
        if game.screen == Screen::GameOver {
            break;
        }
    }

    assert_eq!(game.screen, Screen::GameOver, "session should be over");
    assert_eq!(game.lives, 0);
    assert!(cues.contains(&AudioCue::Bump));
    assert!(cues.contains(&AudioCue::GameOver));

    // Nothing left pending once the game is over
    assert!(game.on_tick(Duration::from_millis(5000)).is_empty());
}

#[test]
fn headless_level_two_spells_word() {
    let mut game = Game::new(tiny_deck(), 3);
    game.start(Level::Two);

    let (tx, rx) = mpsc::channel();
    let es = letterbros::runtime::TestEventSource::new(rx);
    let ticker =
        letterbros::runtime::SteppedTicker::new(Duration::from_millis(5), Duration::from_millis(50));
    let mut runner = letterbros::runtime::Runner::new(es, ticker);

    // Keys typed mid-chain are dropped, so feed each letter only once the
    // game is waiting at that cursor.
    let mut sent_for_cursor: Option<usize> = None;
    let mut cues = Vec::new();
    for _ in 0..300u32 {
        if game.phase == RoundPhase::AwaitingInput && sent_for_cursor != Some(game.round.cursor) {
            if let Some(expected) = game.expected_char() {
                sent_for_cursor = Some(game.round.cursor);
                tx.send(letterbros::runtime::LoopEvent::Key(KeyEvent::new(
                    KeyCode::Char(expected.to_ascii_lowercase()),
                    KeyModifiers::NONE,
                )))
                .unwrap();
            }
        }

        match runner.step() {
            letterbros::runtime::LoopEvent::Tick(dt) => {
                cues.extend(game.on_tick(dt));
            }
            letterbros::runtime::LoopEvent::Resize => {}
            letterbros::runtime::LoopEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    cues.extend(game.submit_key(c));
                }
            }
        }
        if game.summary.rounds_completed >= 1 {
            break;
        }
    }

    // Three letters, 100 points each, a word celebration at the end
    assert_eq!(game.summary.rounds_completed, 1, "word should be spelled");
    assert_eq!(game.score, 300);
    assert!(cues.contains(&AudioCue::Speak("KAT".to_string())));
    assert!(cues.contains(&AudioCue::Pronounce('A')));
    assert!(cues.contains(&AudioCue::PowerUp));
}

#[test]
fn headless_escape_cancels_pending_rewards() {
    // Leaving for the menu mid-jump must drop the whole reward chain
    let mut game = Game::new(tiny_deck(), 3);
    game.start(Level::One);
    let _ = game.on_tick(Duration::from_millis(400));

    let cues = game.submit_key('k');
    assert_eq!(cues, vec![AudioCue::Jump]);
    assert_eq!(game.phase, RoundPhase::Celebrating);

    let cues = game.back_to_menu();
    assert_eq!(cues, vec![AudioCue::StopAll]);
    assert_eq!(game.screen, Screen::Menu);

    // The apex never lands: no score, no flags, no late cues
    assert!(game.on_tick(Duration::from_millis(5000)).is_empty());
    assert_eq!(game.score, 0);
    assert!(!game.jumping);
    assert!(!game.coin_visible);
}
