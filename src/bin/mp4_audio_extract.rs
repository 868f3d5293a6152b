use log::{error, info};
use mp4audio::{extract_audio, FourCC};
use std::env;
use std::io::{self, BufWriter};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: mp4_audio_extract <file.mp4|url> [codec...]");
        eprintln!("Example: mp4_audio_extract movie.mp4 mp4a > audio.raw");
        process::exit(2);
    }
    let location = &args[1];

    let parsed: Result<Vec<FourCC>, _> = args[2..].iter().map(|c| c.parse()).collect();
    let codecs = match parsed {
        Ok(codecs) => codecs,
        Err(e) => {
            error!("❌ {}", e);
            process::exit(2);
        }
    };

    let stdout = io::stdout();
    let mut sink = BufWriter::new(stdout.lock());
    match extract_audio(location, &codecs, &mut sink) {
        Ok(0) => {
            error!("❌ No matching audio track in {}", location);
            process::exit(1);
        }
        Ok(count) => info!("✅ Extracted {} audio tracks", count),
        Err(e) => {
            error!("❌ Extraction failed: {}", e);
            process::exit(1);
        }
    }
}
