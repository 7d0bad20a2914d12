//! Reads a WAV file and runs it through the slot controller as if it were a
//! live audio feed, printing each `DecodeResult` as a JSON line.
//!
//! Grounded on `ft8detect.rs`'s WAV-to-samples flow, switched from manual
//! 44-byte-header slicing to `hound` (already a teacher dependency, used
//! elsewhere for reading captures) and fed through chunk-by-chunk like a
//! real producer instead of decoding the whole buffer in one call.

use std::sync::Arc;

use clap::Parser;
use rustyft8::{AudioSample, CallsignHashTable, DecoderConfig, Protocol, SlotController};

/// Chunk size the synthetic producer delivers at a time, in samples.
const CHUNK_SAMPLES: usize = 4096;

#[derive(Parser, Debug)]
#[command(name = "ft8watch", about = "Decode FT8/FT4 from a WAV capture")]
struct Args {
    /// Path to a mono 16-bit PCM WAV file.
    input: String,

    #[arg(long, value_enum, default_value = "ft8")]
    protocol: ProtocolArg,

    /// Unix timestamp (seconds) of the first sample in the file.
    #[arg(long, default_value_t = 0)]
    start_unix: i64,

    #[arg(long, default_value_t = 0)]
    min_score: i16,

    #[arg(long, default_value_t = 140)]
    max_candidates: usize,

    #[arg(long, default_value_t = 25)]
    ldpc_iterations: usize,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ProtocolArg {
    Ft8,
    Ft4,
}

impl From<ProtocolArg> for Protocol {
    fn from(p: ProtocolArg) -> Self {
        match p {
            ProtocolArg::Ft8 => Protocol::Ft8,
            ProtocolArg::Ft4 => Protocol::Ft4,
        }
    }
}

fn main() {
    rustyft8::tracing_init::init_tracing();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        tracing::error!(error = %err, "ft8watch failed");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let mut reader = hound::WavReader::open(&args.input).map_err(|e| format!("failed to open '{}': {e}", args.input))?;
    let spec = reader.spec();

    let protocol: Protocol = args.protocol.into();
    let config = DecoderConfig {
        protocol,
        min_score: args.min_score,
        max_candidates: args.max_candidates,
        ldpc_iterations: args.ldpc_iterations,
        ..DecoderConfig::default()
    };

    let hash_table = Arc::new(CallsignHashTable::default());
    let mut controller = SlotController::new(config, hash_table);

    let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>().map_err(|e| format!("failed to read samples: {e}"))?;

    let ns_per_sample = 1_000_000_000f64 / spec.sample_rate as f64;
    let mut offset = 0usize;
    while offset < samples.len() {
        let end = (offset + CHUNK_SAMPLES).min(samples.len());
        let chunk = samples[offset..end].to_vec();
        let t_ns = args.start_unix * 1_000_000_000 + (offset as f64 * ns_per_sample) as i64;

        let audio_sample = AudioSample::from_wav_frame(chunk, spec.sample_rate, spec.channels, spec.bits_per_sample, t_ns)
            .map_err(|e| format!("audio chunk rejected: {e}"))?;

        for result in controller.ingest(&audio_sample) {
            match serde_json::to_string(&result) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to serialize result"),
            }
        }

        offset = end;
    }

    Ok(())
}
