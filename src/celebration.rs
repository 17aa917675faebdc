use rand::seq::SliceRandom;
use std::time::SystemTime;

/// Shown while the star reward is active, e.g. after a five-streak or a
/// completed word.
const CHEERS: [&str; 5] = ["LEVEL UP!", "SUPER!", "GOED ZO!", "KNAP ZEG!", "TOPPIE!"];

const STAR_SYMBOLS: [char; 6] = ['★', '✦', '✧', '*', '+', '·'];

/// One glyph of the star burst
#[derive(Debug, Clone)]
pub struct StarParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    pub is_text: bool,
    pub target_x: f64,
    pub target_y: f64,
}

impl StarParticle {
    fn star(x: f64, y: f64) -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-4.0..4.0),
            vel_y: rng.gen_range(-6.0..-2.0),
            symbol: *STAR_SYMBOLS.choose(&mut rng).unwrap_or(&'★'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.2),
            is_text: false,
            target_x: x,
            target_y: y,
        }
    }

    fn cheer_letter(x: f64, y: f64, target_x: f64, target_y: f64, symbol: char, color: usize) -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: target_x - x,
            vel_y: target_y - y,
            symbol,
            color_index: color,
            age: 0.0,
            // cheer letters hang around for the whole celebration window
            max_age: rng.gen_range(3.5..5.0),
            is_text: true,
            target_x,
            target_y,
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        if self.is_text {
            let dist = ((self.target_x - self.x).powi(2) + (self.target_y - self.y).powi(2)).sqrt();
            if dist > 0.8 {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_x *= 0.92;
                self.vel_y *= 0.92;
            } else {
                self.x = self.target_x;
                self.y = self.target_y;
                self.vel_x = 0.0;
                self.vel_y = 0.0;
            }
        } else {
            self.x += self.vel_x * dt;
            self.y += self.vel_y * dt;
            self.vel_y += 12.0 * dt; // stars fall back down
        }

        self.age += dt;
        self.age < self.max_age
    }
}

/// Star burst played on top of the playing field: a fountain of star glyphs
/// plus a cheer word assembling itself letter by letter. Runs as long as the
/// celebration round delay so the next round starts on a clean screen.
#[derive(Debug)]
pub struct StarAnimation {
    pub particles: Vec<StarParticle>,
    pub start_time: SystemTime,
    pub duration: f64,
    pub is_active: bool,
    pub terminal_width: f64,
    pub terminal_height: f64,
}

impl StarAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            start_time: SystemTime::now(),
            duration: 3.5,
            is_active: false,
            terminal_width: 80.0,
            terminal_height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.start_time = SystemTime::now();
        self.is_active = true;
        self.terminal_width = width as f64;
        self.terminal_height = height as f64;

        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;

        let cheer = CHEERS.choose(&mut rng).unwrap_or(&"SUPER!");
        self.spawn_cheer(cheer, center_x, center_y, &mut rng);

        for _ in 0..30 {
            let offset_x = rng.gen_range(-12.0..12.0);
            let offset_y = rng.gen_range(-4.0..4.0);
            self.particles
                .push(StarParticle::star(center_x + offset_x, center_y + offset_y));
        }
    }

    fn spawn_cheer(&mut self, text: &str, center_x: f64, center_y: f64, rng: &mut rand::rngs::ThreadRng) {
        use rand::Rng;

        let char_width = 2.0;
        let text_width = (text.chars().count() as f64 - 1.0) * char_width;
        let left = center_x - text_width / 2.0;

        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let target_x = left + i as f64 * char_width;
            let target_y = center_y - 3.0;
            let from_x = center_x + rng.gen_range(-10.0..10.0);
            let from_y = center_y + rng.gen_range(-5.0..5.0);
            let color = rng.gen_range(0..7);
            self.particles.push(StarParticle::cheer_letter(
                from_x, from_y, target_x, target_y, ch, color,
            ));
        }
    }

    /// Ends the animation early, for screen changes that outrun it.
    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        let elapsed = self.start_time.elapsed().unwrap_or_default().as_secs_f64();
        if elapsed >= self.duration {
            self.is_active = false;
            self.particles.clear();
            return;
        }

        let dt = 0.1;
        let width = self.terminal_width;
        let height = self.terminal_height;
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            if particle.is_text {
                alive
            } else {
                let buffer = 5.0;
                let off_screen = particle.y > height + buffer
                    || particle.x < -buffer
                    || particle.x > width + buffer;
                alive && !off_screen
            }
        });
    }
}

impl Default for StarAnimation {
    fn default() -> Self {
        Self::new()
    }
}
