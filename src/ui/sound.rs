/// Sound engine: procedural sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    /// Dial turned.
    Click,
    /// Paint, marker, dismiss, small changes.
    Bloop,
    /// Hint, level solved.
    Chime,
    Door,
    /// Personality result.
    Fanfare,
}

/// Sound cue for one simulation event, if any.
pub fn cue(event: &GameEvent) -> Option<Sfx> {
    match event {
        GameEvent::ButtonPressed { .. } => Some(Sfx::Click),
        GameEvent::PaintPicked { .. }
        | GameEvent::PaintApplied { .. }
        | GameEvent::PaintCleared { .. }
        | GameEvent::GridInverted
        | GameEvent::DecoyVanished { .. }
        | GameEvent::MarkerCollected { .. }
        | GameEvent::DoorLocked
        | GameEvent::GameRestarted => Some(Sfx::Bloop),
        GameEvent::LevelCompleted { .. }
        | GameEvent::CanvasRevealed { .. }
        | GameEvent::EpilogueStarted => Some(Sfx::Chime),
        GameEvent::DoorTaken { .. } => Some(Sfx::Door),
        GameEvent::GameFinished { .. } => Some(Sfx::Fanfare),
        GameEvent::WallsVanished | GameEvent::LevelLoaded { .. } => None,
    }
}

/// Distinct cues for one cycle, in event order.
pub fn cues(events: &[GameEvent]) -> Vec<Sfx> {
    let mut out = Vec::new();
    for sfx in events.iter().filter_map(cue) {
        if !out.contains(&sfx) {
            out.push(sfx);
        }
    }
    out
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_click: Arc<Vec<u8>>,
        sfx_bloop: Arc<Vec<u8>>,
        sfx_chime: Arc<Vec<u8>>,
        sfx_door: Arc<Vec<u8>>,
        sfx_fanfare: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_click: Arc::new(make_wav(&gen_click())),
                sfx_bloop: Arc::new(make_wav(&gen_bloop())),
                sfx_chime: Arc::new(make_wav(&gen_chime())),
                sfx_door: Arc::new(make_wav(&gen_door())),
                sfx_fanfare: Arc::new(make_wav(&gen_fanfare())),
            })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = match sfx {
                Sfx::Click => &self.sfx_click,
                Sfx::Bloop => &self.sfx_bloop,
                Sfx::Chime => &self.sfx_chime,
                Sfx::Door => &self.sfx_door,
                Sfx::Fanfare => &self.sfx_fanfare,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, t: f32) -> f32 {
        (t * freq * 2.0 * std::f32::consts::PI).sin()
    }

    /// Dial click: very short square-ish tick
    fn gen_click() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.025) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                let wave = tone(1800.0, t) * 0.7 + tone(5400.0, t) * 0.3;
                wave * env * 0.25
            })
            .collect()
    }

    /// Bloop: quick upward pitch bend
    fn gen_bloop() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.09) as usize;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 300.0 + p * 500.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                tone(freq, t) * (1.0 - p).powf(0.7) * 0.3
            })
            .collect()
    }

    /// Chime: bell-like G5 + C6 with slow decay
    fn gen_chime() -> Vec<f32> {
        let pairs = [(784.0_f32, 0.08), (1047.0, 0.3)];
        let mut samples = Vec::new();
        for &(freq, dur) in &pairs {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = tone(freq, t) * 0.6 + tone(freq * 2.76, t) * 0.25 + tone(freq * 5.4, t) * 0.15;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Door: low thud with a short creak on top
    fn gen_door() -> Vec<f32> {
        let duration = 0.22;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 4242;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let t = i as f32 / SAMPLE_RATE as f32;
                let thud = tone(90.0 - p * 30.0, t) * (1.0 - p).powf(2.0);
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let creak = tone(420.0 + p * 180.0, t) * noise.abs() * (1.0 - p);
                (thud * 0.7 + creak * 0.2) * 0.4
            })
            .collect()
    }

    /// Result fanfare: C5→E5→G5→C6, last note held
    fn gen_fanfare() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0];
        let note_dur = 0.12;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = tone(freq, t) * 0.6 + tone(freq * 2.0, t) * 0.3 + tone(freq * 3.0, t) * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        let n = (SAMPLE_RATE as f32 * 0.4) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            samples.push(tone(1047.0, t) * env * 0.3);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let samples = gen_click();
            let wav = make_wav(&samples);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(wav.len(), 44 + samples.len() * 2);
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
            assert_eq!(data_size as usize, samples.len() * 2);
        }

        #[test]
        fn effects_stay_in_range() {
            for s in [gen_click(), gen_bloop(), gen_chime(), gen_door(), gen_fanfare()] {
                assert!(!s.is_empty());
                assert!(s.iter().all(|v| v.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Hue;
    use crate::domain::rules::DoorSide;

    #[test]
    fn door_transition_cues() {
        let events = [
            GameEvent::DoorTaken { level: 8, side: DoorSide::Yes, vote: Some(Hue::Blue) },
            GameEvent::LevelLoaded { level: 9 },
            GameEvent::GameFinished { result: Hue::Blue },
        ];
        assert_eq!(cues(&events), vec![Sfx::Door, Sfx::Fanfare]);
    }

    #[test]
    fn repeated_cues_play_once() {
        let events = [
            GameEvent::ButtonPressed { hue: Hue::Red, value: 1 },
            GameEvent::PaintApplied { pos: crate::domain::entity::Pos::new(1, 2), hue: Hue::Red },
            GameEvent::PaintPicked { paint: None },
        ];
        assert_eq!(cues(&events), vec![Sfx::Click, Sfx::Bloop]);
    }

    #[test]
    fn silent_events() {
        assert_eq!(cue(&GameEvent::WallsVanished), None);
        assert_eq!(cue(&GameEvent::LevelLoaded { level: 1 }), None);
    }
}
