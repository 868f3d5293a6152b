use log::{error, info};
use mp4audio::{dump_boxes, open_source};
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: mp4_box_dump <file.mp4|url>");
        eprintln!("Example: RUST_LOG=debug mp4_box_dump movie.mp4");
        process::exit(2);
    }
    let location = &args[1];
    info!("🔍 {}", location);

    let result = open_source(location).and_then(|mut stream| {
        dump_boxes(stream.as_mut())?;
        stream.print_stats();
        Ok(())
    });
    if let Err(e) = result {
        error!("❌ Scan failed: {}", e);
        process::exit(1);
    }
}
