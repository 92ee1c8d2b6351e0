//! Proctoring Engine CLI
//!
//! Serves the analyze endpoints or runs the rules once from the command line.

use clap::{Parser, Subcommand};
use proctoring_engine::{
    analyze_audio,
    config::Config,
    detector::{DetectionAdapter, LandmarkCapability, SkinRegionDetector},
    signal::decode_image_bytes,
    AnalyzeResponse, AudioSignal, FrameAnalyzer, VERSION,
};
use std::path::{Path, PathBuf};
#[cfg(feature = "server")]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
#[cfg(feature = "server")]
use std::thread;
#[cfg(feature = "server")]
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "proctoring-engine")]
#[command(version = VERSION)]
#[command(about = "Turns proctoring session signals into risk findings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run face and gaze rules on an image file
    AnalyzeFrame {
        /// Path to a PNG or JPEG frame
        path: PathBuf,
    },

    /// Run audio rules on a measured audio summary
    AnalyzeAudio {
        /// Audio level, nominally between 0 and 1
        #[arg(long, default_value = "0.0")]
        level: f64,

        /// Number of distinct voices detected
        #[arg(long)]
        voices: Option<u32>,

        /// Whether a mobile device sound was detected
        #[arg(long)]
        mobile: bool,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config, using defaults: {e}");
        Config::default()
    });
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, host, port);
        }
        Commands::AnalyzeFrame { path } => {
            cmd_analyze_frame(&config, &path);
        }
        Commands::AnalyzeAudio {
            level,
            voices,
            mobile,
        } => {
            cmd_analyze_audio(level, voices, mobile);
        }
        Commands::Config => {
            cmd_config(&config);
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` or the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "server")]
fn cmd_serve(mut config: Config, host: Option<String>, port: Option<u16>) {
    use proctoring_engine::server::{run, ServerConfig};

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    println!("Proctoring Engine v{VERSION}");
    println!();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting async runtime: {e}");
            std::process::exit(1);
        }
    };

    let (addr, shutdown_tx) = match runtime.block_on(run(ServerConfig::from_config(&config))) {
        Ok(started) => started,
        Err(e) => {
            eprintln!("Error starting server: {e}");
            std::process::exit(1);
        }
    };

    println!("Listening on http://{addr}");
    println!("Press Ctrl+C to stop");

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(100));
    }

    println!();
    println!("Shutting down...");
    let _ = shutdown_tx.send(());
    runtime.shutdown_timeout(Duration::from_secs(5));
}

#[cfg(not(feature = "server"))]
fn cmd_serve(_config: Config, _host: Option<String>, _port: Option<u16>) {
    eprintln!("Error: serve requires the server feature (not enabled at compile time)");
    std::process::exit(1);
}

fn cmd_analyze_frame(config: &Config, path: &Path) {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {path:?}: {e}");
            std::process::exit(1);
        }
    };

    let frame = match decode_image_bytes(&bytes) {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("Invalid frame: {e}");
            std::process::exit(1);
        }
    };

    let faces = Arc::new(SkinRegionDetector::new(config.detector.clone()));
    let analyzer = FrameAnalyzer::new(DetectionAdapter::new(
        faces,
        LandmarkCapability::Unavailable,
    ));

    print_response(&analyzer.analyze(&frame));
}

fn cmd_analyze_audio(level: f64, voices: Option<u32>, mobile: bool) {
    let signal = AudioSignal {
        audio_level: level,
        voice_count: voices,
        mobile_sound_detected: mobile,
    };
    print_response(&analyze_audio(&signal));
}

fn print_response(response: &AnalyzeResponse) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config(config: &Config) {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
#[cfg(feature = "server")]
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
