use clap::Parser;
use colored::Colorize;
use undertalk::{
    TalkConfig, clip_picker, export_wav, generate_talk_audio, load_clips, play_buffer, speedup,
};

#[derive(Parser)]
#[command(name = "undertalk")]
#[command(about = "Generate a game-style talking sound effect from short voice clips")]
#[command(version)]
struct Cli {
    /// Text to vocalize (one clip per letter or digit, the rest is skipped)
    #[arg(default_value = "hello. this is default undertalk.")]
    text: String,

    /// Output WAV filename, written into the outputs folder
    #[arg(default_value = "talk_output.wav")]
    filename: String,

    /// Pitch shift in semitones (12 = one octave up)
    #[arg(default_value_t = 0.0, allow_negative_numbers = true)]
    pitch: f32,

    /// Playback speed applied to the finished take (1.0 = unchanged)
    #[arg(default_value_t = 1.25, allow_negative_numbers = true)]
    speed: f32,

    /// Seed the clip picker for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Play the result after exporting
    #[arg(long)]
    play: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.speed <= 0.0 {
        return Err(format!("speed must be positive, got {}", cli.speed).into());
    }

    let config = TalkConfig::default();
    let clips = load_clips(&config)?;
    println!(
        "🔊 Generating '{}' with pitch {} and speed {}x ({} clips loaded)",
        cli.filename,
        cli.pitch,
        cli.speed,
        clips.len()
    );

    let mut rng = clip_picker(cli.seed);
    let talk = generate_talk_audio(&clips, &cli.text, cli.pitch, &mut rng)?;
    let talk = speedup(&talk, cli.speed);

    let out_path = config.output_dir.join(&cli.filename);
    export_wav(&out_path, &talk)?;
    println!("✅ Exported: {}", out_path.display().to_string().green());

    if cli.play {
        play_buffer(talk)?;
    }
    Ok(())
}
