use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;
use std::error::Error;

use include_dir::{include_dir, Dir};

static CONTENT_DIR: Dir = include_dir!("src/content");

/// A practice deck: the characters a level can deal and the words the
/// spelling level draws from, plus the Dutch name of every character
/// ("Kaa" for K, "Negen" for 9) used for pronunciation hints.
#[derive(Deserialize, Clone, Debug)]
pub struct Deck {
    pub name: String,
    pub letters: String,
    pub digits: String,
    pub words: Vec<String>,
    pub letter_names: HashMap<char, String>,
}

impl Deck {
    pub fn load() -> Self {
        read_deck_from_file("nederlands.json").expect("Deck file not found")
    }

    /// Uniform pick over letters and digits combined.
    pub fn random_char(&self) -> char {
        let pool: Vec<char> = self.char_pool();
        let rng = &mut rand::thread_rng();
        *pool.choose(rng).expect("Deck has no characters")
    }

    pub fn random_word(&self) -> String {
        let rng = &mut rand::thread_rng();
        self.words.choose(rng).expect("Deck has no words").clone()
    }

    /// Dutch name of a character, if the deck knows it.
    pub fn letter_name(&self, c: char) -> Option<&str> {
        self.letter_names.get(&c).map(String::as_str)
    }

    pub fn char_pool(&self) -> Vec<char> {
        self.letters.chars().chain(self.digits.chars()).collect()
    }
}

fn read_deck_from_file(file_name: &str) -> Result<Deck, Box<dyn Error>> {
    let file = CONTENT_DIR
        .get_file(file_name)
        .expect("Deck file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let deck = from_str(file_as_str).expect("Unable to deserialize deck json");

    Ok(deck)
}
