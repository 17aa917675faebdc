/// Sound engine: chiptune cues via rodio, plus letter and word callouts.
///
/// Effects are generated as in-memory sample buffers at init time and played
/// fire-and-forget on detached sinks. Callouts prefer recordings from an
/// audio directory (letters/k.mp3, words/kat.mp3); without one they fall
/// back to a synthesized spelling chime. Callouts go through a dedicated
/// sink so the bump and the jingles can cut them off.
///
/// Compile with `--no-default-features` or without the "sound" feature to
/// disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::f32::consts::PI;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        audio_dir: Option<PathBuf>,
        file_cache: Mutex<HashMap<String, Option<Arc<Vec<u8>>>>>,
        speech_sink: Mutex<Option<Sink>>,
        sfx_coin: Arc<Vec<f32>>,
        sfx_jump: Arc<Vec<f32>>,
        sfx_bump: Arc<Vec<f32>>,
        sfx_power_up: Arc<Vec<f32>>,
        sfx_game_over: Arc<Vec<f32>>,
    }

    impl SoundEngine {
        pub fn new(audio_dir: Option<PathBuf>) -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                audio_dir,
                file_cache: Mutex::new(HashMap::new()),
                speech_sink: Mutex::new(None),
                sfx_coin: Arc::new(gen_coin()),
                sfx_jump: Arc::new(gen_jump()),
                sfx_bump: Arc::new(gen_bump()),
                sfx_power_up: Arc::new(gen_power_up()),
                sfx_game_over: Arc::new(gen_game_over()),
            })
        }

        fn play(&self, buf: &Arc<Vec<f32>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, buf.as_ref().clone()));
                sink.detach(); // fire-and-forget
            }
        }

        pub fn play_coin(&self) {
            self.play(&self.sfx_coin);
        }

        pub fn play_jump(&self) {
            self.play(&self.sfx_jump);
        }

        pub fn play_bump(&self) {
            self.stop_all();
            self.play(&self.sfx_bump);
        }

        pub fn play_power_up(&self) {
            self.stop_all();
            self.play(&self.sfx_power_up);
        }

        pub fn play_game_over(&self) {
            self.stop_all();
            self.play(&self.sfx_game_over);
        }

        /// Calls out a single character, from a recording when one exists.
        pub fn pronounce(&self, c: char) {
            let stem = format!("letters/{}", c.to_ascii_lowercase());
            if !self.speak_file(&stem) {
                self.speak_samples(gen_letter_tone(c.to_ascii_uppercase()));
            }
        }

        /// Speaks a whole word; the fallback chimes through its letters.
        pub fn speak(&self, word: &str) {
            let stem = format!("words/{}", word.to_ascii_lowercase());
            if !self.speak_file(&stem) {
                self.speak_samples(gen_word_run(word));
            }
        }

        /// Cuts off whatever callout is playing.
        pub fn stop_all(&self) {
            if let Ok(mut guard) = self.speech_sink.lock() {
                if let Some(sink) = guard.take() {
                    sink.stop();
                }
            }
        }

        fn speak_file(&self, stem: &str) -> bool {
            let Some(dir) = self.audio_dir.clone() else {
                return false;
            };
            let Some(bytes) = self.load_cached(&dir, stem) else {
                return false;
            };
            let cursor = Cursor::new(bytes.as_ref().clone());
            match rodio::Decoder::new(cursor) {
                Ok(source) => {
                    self.stop_all();
                    if let Ok(sink) = Sink::try_new(&self.handle) {
                        sink.append(source);
                        self.hold_speech(sink);
                        true
                    } else {
                        false
                    }
                }
                Err(_) => false,
            }
        }

        fn speak_samples(&self, samples: Vec<f32>) {
            self.stop_all();
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                self.hold_speech(sink);
            }
        }

        fn hold_speech(&self, sink: Sink) {
            if let Ok(mut guard) = self.speech_sink.lock() {
                *guard = Some(sink);
            } else {
                sink.detach();
            }
        }

        /// Reads a recording once and remembers the outcome either way, so a
        /// missing file is only probed on the first callout.
        fn load_cached(&self, dir: &Path, stem: &str) -> Option<Arc<Vec<u8>>> {
            let mut cache = self.file_cache.lock().ok()?;
            if let Some(cached) = cache.get(stem) {
                return cached.clone();
            }
            let mut loaded = None;
            for ext in ["mp3", "wav", "ogg"] {
                let path = dir.join(format!("{stem}.{ext}"));
                if let Ok(bytes) = std::fs::read(&path) {
                    loaded = Some(Arc::new(bytes));
                    break;
                }
            }
            cache.insert(stem.to_string(), loaded.clone());
            loaded
        }
    }

    // ── Waveform generators, all mono f32 at SAMPLE_RATE ──

    fn square(phase: f32) -> f32 {
        if phase.fract() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }

    fn triangle(phase: f32) -> f32 {
        let p = phase.fract();
        if p < 0.5 {
            4.0 * p - 1.0
        } else {
            3.0 - 4.0 * p
        }
    }

    /// Coin: square wave, B5 snapping up to E6, half-second decay.
    fn gen_coin() -> Vec<f32> {
        let duration = 0.5;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut samples = Vec::with_capacity(n);
        let mut phase = 0.0_f32;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let freq = if t < 0.08 { 987.77 } else { 1318.51 };
            phase += freq / SAMPLE_RATE as f32;
            let env = 0.25 * (0.004_f32).powf(t / duration);
            samples.push(square(phase) * env);
        }
        samples
    }

    /// Jump: square wave swept 150Hz to 450Hz.
    fn gen_jump() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut samples = Vec::with_capacity(n);
        let mut phase = 0.0_f32;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let freq = 150.0 * (3.0_f32).powf(t / duration);
            phase += freq / SAMPLE_RATE as f32;
            let env = 0.3 * (0.0033_f32).powf(t / duration);
            samples.push(square(phase) * env);
        }
        samples
    }

    /// Bump: square wave dropping 150Hz to 50Hz.
    fn gen_bump() -> Vec<f32> {
        let duration = 0.15;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut samples = Vec::with_capacity(n);
        let mut phase = 0.0_f32;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let freq = 150.0 * (1.0_f32 / 3.0).powf(t / duration);
            phase += freq / SAMPLE_RATE as f32;
            let env = 0.3 * (0.0033_f32).powf(t / duration);
            samples.push(square(phase) * env);
        }
        samples
    }

    /// Power-up: triangle arpeggio climbing two octaves of an A major run.
    fn gen_power_up() -> Vec<f32> {
        let notes = [
            440.00_f32, 554.37, 659.25, 880.00, 1108.73, 1318.51, 1760.00, 2217.46, 2637.02,
        ];
        let step = 0.12;
        let duration = 1.5;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut samples = Vec::with_capacity(n);
        let mut phase = 0.0_f32;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let idx = ((t / step) as usize).min(notes.len() - 1);
            phase += notes[idx] / SAMPLE_RATE as f32;
            let env = if t < 1.1 {
                0.22
            } else {
                0.22 * ((duration - t) / 0.4).max(0.0)
            };
            samples.push(triangle(phase) * env);
        }
        samples
    }

    /// Game over: the slow seven-note triangle jingle, rests included.
    fn gen_game_over() -> Vec<f32> {
        let notes = [
            (493.88_f32, 0.00_f32, 0.15_f32),
            (698.46, 0.15, 0.15),
            (698.46, 0.45, 0.15),
            (698.46, 0.60, 0.12),
            (659.25, 0.72, 0.12),
            (587.33, 0.84, 0.12),
            (523.25, 0.96, 0.30),
        ];
        let duration = 1.4;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut samples = vec![0.0_f32; n];
        let last_start = notes[notes.len() - 1].1;
        for &(freq, start, dur) in &notes {
            let start_idx = (SAMPLE_RATE as f32 * start) as usize;
            let len = (SAMPLE_RATE as f32 * dur) as usize;
            for j in 0..len {
                let idx = start_idx + j;
                if idx >= n {
                    break;
                }
                let t = j as f32 / SAMPLE_RATE as f32;
                let progress = j as f32 / len as f32;
                let env = if start == last_start {
                    0.28 * (1.0 - progress)
                } else {
                    0.28 * (1.0 - progress * 0.3)
                };
                samples[idx] = triangle(t * freq) * env;
            }
        }
        samples
    }

    fn pitch_index(c: char) -> u32 {
        match c {
            'A'..='Z' => c as u32 - 'A' as u32,
            '0'..='9' => 26 + (c as u32 - '0' as u32),
            _ => c as u32 % 12,
        }
    }

    /// Fallback callout: a two-note chime whose pitch walks a pentatonic
    /// scale, so every character keeps a stable, distinct voice.
    fn gen_letter_tone(c: char) -> Vec<f32> {
        let scale = [0_u32, 2, 4, 7, 9];
        let idx = pitch_index(c) as usize;
        let octave = (idx / scale.len()) as u32 % 3;
        let semitones = scale[idx % scale.len()] + 12 * octave;
        let base = 261.63 * (2.0_f32).powf(semitones as f32 / 12.0);
        let notes = [(base, 0.18_f32), (base * 1.5, 0.22)];
        let mut samples = Vec::new();
        for &(freq, dur) in &notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 0.3 * (1.0 - i as f32 / n as f32).powf(0.7);
                let wave = (t * freq * 2.0 * PI).sin() * 0.7
                    + (t * freq * 2.0 * 2.0 * PI).sin() * 0.3;
                samples.push(wave * env);
            }
        }
        samples
    }

    /// Fallback for a whole word: its letters chimed in order.
    fn gen_word_run(word: &str) -> Vec<f32> {
        let gap = (SAMPLE_RATE as f32 * 0.05) as usize;
        let mut samples = Vec::new();
        for (i, c) in word.chars().enumerate() {
            if i > 0 {
                samples.extend(std::iter::repeat(0.0_f32).take(gap));
            }
            samples.extend(gen_letter_tone(c.to_ascii_uppercase()));
        }
        samples
    }

}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_audio_dir: Option<std::path::PathBuf>) -> Option<Self> {
        Some(SoundEngine)
    }
    pub fn play_coin(&self) {}
    pub fn play_jump(&self) {}
    pub fn play_bump(&self) {}
    pub fn play_power_up(&self) {}
    pub fn play_game_over(&self) {}
    pub fn pronounce(&self, _c: char) {}
    pub fn speak(&self, _word: &str) {}
    pub fn stop_all(&self) {}
}
