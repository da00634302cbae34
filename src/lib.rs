use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rubato::{FastFixedIn, PolynomialDegree, Resampler};

/// Sample rate every clip is normalised to before concatenation
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

/// Length of the silence appended after each character clip, in milliseconds
pub const GAP_MS: u32 = 15;

/// The 15ms gap expressed in samples at the target rate
pub const GAP_SAMPLES: usize = (TARGET_SAMPLE_RATE as usize * GAP_MS as usize) / 1000;

/// Folder layout for one generation run
#[derive(Debug, Clone)]
pub struct TalkConfig {
    /// Directory the voice clips are loaded from
    pub sound_dir: PathBuf,
    /// Directory the finished WAV is written into (created if missing)
    pub output_dir: PathBuf,
}

impl Default for TalkConfig {
    fn default() -> Self {
        Self {
            sound_dir: PathBuf::from("sounds"),
            output_dir: PathBuf::from("outputs"),
        }
    }
}

/// A single decoded voice clip
#[derive(Debug, Clone)]
pub struct Clip {
    /// Mono samples in the [-1.0, 1.0] range
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Clip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Build a seeded clip picker, or a fresh nondeterministic one
pub fn clip_picker(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Load every .wav file from the sound folder, sorted by file name, and make
/// sure the output folder exists. Fails if the sound folder is unreadable or
/// holds no clips.
pub fn load_clips(config: &TalkConfig) -> Result<Vec<Clip>, Box<dyn Error>> {
    fs::create_dir_all(&config.output_dir).map_err(|e| {
        format!(
            "failed to create output directory {}: {}",
            config.output_dir.display(),
            e
        )
    })?;

    let entries = fs::read_dir(&config.sound_dir).map_err(|e| {
        format!(
            "failed to read sound directory {}: {}",
            config.sound_dir.display(),
            e
        )
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("wav") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(format!("no .wav clips found in {}", config.sound_dir.display()).into());
    }

    let mut clips = Vec::with_capacity(paths.len());
    for path in &paths {
        clips.push(load_wav(path)?);
    }
    Ok(clips)
}

/// Decode a WAV file into a mono Clip at its native sample rate
pub fn load_wav(path: &Path) -> Result<Clip, Box<dyn Error>> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    // Mix multi-channel sources down to mono
    let samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok(Clip::new(samples, spec.sample_rate))
}

/// Pitch shift a clip by resampling: the samples are reinterpreted at a rate
/// scaled by 2^(semitones/12), then resampled back to the target rate. Pitch
/// and duration move together, which is what gives the voice its glitchy
/// character. The shift magnitude is not clamped.
pub fn distort_clip(clip: &Clip, semitones: f32) -> Result<Clip, Box<dyn Error>> {
    let shifted_rate = (clip.sample_rate as f64 * 2f64.powf(semitones as f64 / 12.0)) as u32;
    let samples = resample(&clip.samples, shifted_rate, TARGET_SAMPLE_RATE)?;
    Ok(Clip::new(samples, TARGET_SAMPLE_RATE))
}

/// Resample mono samples between rates with cubic interpolation
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, Box<dyn Error>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_rate == 0 {
        return Err("pitch shift drove the sample rate to zero".into());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;
    let mut resampler = FastFixedIn::<f32>::new(ratio, 1.0, PolynomialDegree::Cubic, chunk_size, 1)
        .map_err(|e| format!("failed to create resampler: {}", e))?;

    // The resampler delays its output by a fixed number of frames; collect
    // that many extra frames and cut them from the head so the result holds
    // exactly len * ratio samples of real signal.
    let expected = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();

    let mut output: Vec<f32> = Vec::with_capacity(expected + delay + chunk_size);
    let mut pos = 0;
    while pos + chunk_size <= samples.len() {
        let frames = resampler.process(&[&samples[pos..pos + chunk_size]], None)?;
        output.extend_from_slice(&frames[0]);
        pos += chunk_size;
    }
    if pos < samples.len() {
        let frames = resampler.process_partial(Some(&[&samples[pos..]]), None)?;
        output.extend_from_slice(&frames[0]);
    }
    while output.len() < delay + expected {
        let frames = resampler.process_partial(Option::<&[&[f32]]>::None, None)?;
        if frames[0].is_empty() {
            break;
        }
        output.extend_from_slice(&frames[0]);
    }

    output.drain(..delay.min(output.len()));
    output.truncate(expected);
    Ok(output)
}

/// Build the talk buffer: one random pitch-distorted clip per alphanumeric
/// character, each followed by a short silence. Everything else in the text
/// is skipped outright.
pub fn generate_talk_audio(
    clips: &[Clip],
    text: &str,
    semitones: f32,
    rng: &mut StdRng,
) -> Result<Vec<f32>, Box<dyn Error>> {
    let mut output: Vec<f32> = Vec::new();
    for ch in text.chars() {
        if !ch.is_alphanumeric() {
            continue;
        }
        let clip = clips.choose(rng).ok_or("clip library is empty")?;
        let glitched = distort_clip(clip, semitones)?;
        output.extend_from_slice(&glitched.samples);
        output.resize(output.len() + GAP_SAMPLES, 0.0);
    }
    Ok(output)
}

/// Time-stretch the finished buffer by a playback speed factor using
/// Hann-windowed overlap-add. Speeds above 1.0 shorten the result; the pitch
/// baked in by the distorter is left alone. Buffers no longer than one
/// window pass through unchanged, so empty input stays empty. Nonpositive
/// speeds are treated as no stretch at all.
pub fn speedup(samples: &[f32], playback_speed: f32) -> Vec<f32> {
    const WINDOW: usize = 2048;
    const SLIDE: usize = WINDOW / 2;

    if playback_speed <= 0.0
        || (playback_speed - 1.0).abs() < 1e-3
        || samples.len() <= WINDOW
    {
        return samples.to_vec();
    }

    // Hann window: adjacent windows at 50% overlap sum to unity
    let window: Vec<f32> = (0..WINDOW)
        .map(|i| {
            let s = (std::f32::consts::PI * i as f32 / WINDOW as f32).sin();
            s * s
        })
        .collect();

    let stretched_len = (samples.len() as f64 / playback_speed as f64) as usize;
    let mut output = vec![0.0f32; stretched_len + WINDOW];
    let step = SLIDE as f64 * playback_speed as f64;
    let mut out_pos = 0usize;
    let mut in_pos = 0f64;

    while (in_pos as usize) + WINDOW <= samples.len() && out_pos + WINDOW <= output.len() {
        let start = in_pos as usize;
        for i in 0..WINDOW {
            output[out_pos + i] += samples[start + i] * window[i];
        }
        out_pos += SLIDE;
        in_pos += step;
    }

    output.truncate(stretched_len);
    output
}

/// Write the finished buffer as a 16-bit mono WAV file at the target rate,
/// overwriting any existing file
pub fn export_wav(path: &Path, samples: &[f32]) -> Result<(), Box<dyn Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| format!("failed to create {}: {}", path.display(), e))?;

    for &sample in samples {
        // Convert f32 to i16 and clamp to valid range
        let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(sample_i16)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Play a finished buffer through the default audio device, blocking until
/// playback ends
pub fn play_buffer(samples: Vec<f32>) -> Result<(), Box<dyn Error>> {
    let (_stream, handle) = rodio::OutputStream::try_default()?;
    let sink = rodio::Sink::try_new(&handle)?;
    let buf = rodio::buffer::SamplesBuffer::new(1, TARGET_SAMPLE_RATE, samples);
    sink.append(buf);
    sink.sleep_until_end();
    Ok(())
}
