use unicode_width::UnicodeWidthStr;

/// Frames for the jumping figure drawn under the letter blocks.
/// Rows share one width so the renderer can place them as a unit.
pub const HERO_STANDING: [&str; 5] = [
    r"  _____  ",
    r" | o.o | ",
    r" /|===|\ ",
    r"  |___|  ",
    r"  _| |_  ",
];

pub const HERO_JUMPING: [&str; 5] = [
    r"\ _____ /",
    r" \|o.o|/ ",
    r"  |===|  ",
    r"  |___|  ",
    r"   \_/   ",
];

/// Coin that pops out of a block on a correct keypress.
pub const COIN: char = '◉';

/// Remaining lives as filled hearts, spent lives as hollow ones.
pub fn hearts(lives: u32, starting_lives: u32) -> String {
    let full = lives.min(starting_lives) as usize;
    let lost = starting_lives.saturating_sub(lives) as usize;
    let mut glyphs = Vec::with_capacity(full + lost);
    glyphs.extend(std::iter::repeat("♥").take(full));
    glyphs.extend(std::iter::repeat("♡").take(lost));
    glyphs.join(" ")
}

/// Bordered prompt bubble. All rows have the same display width so the
/// caller can center them without per-row math.
pub fn speech_bubble(text: &str) -> Vec<String> {
    let inner = text.width();
    vec![
        format!(".{}.", "-".repeat(inner + 2)),
        format!("| {text} |"),
        format!("'{}'", "-".repeat(inner + 2)),
    ]
}
