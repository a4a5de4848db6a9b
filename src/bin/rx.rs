use anyhow::Result;
use clap::Parser;
use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;

use openlst::parse_byte;
use openlst::Decoder;
use openlst::FramerConfigBuilder;

#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// File with concatenated transmit units (stdin if omitted)
    #[clap(short, long)]
    input: Option<PathBuf>,
    /// Payload output file (stdout if omitted)
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Preamble bytes
    #[clap(long)]
    preamble_bytes: Option<usize>,
    /// First sync byte
    #[clap(long, value_parser = parse_byte)]
    sync_byte0: Option<u8>,
    /// Second sync byte
    #[clap(long, value_parser = parse_byte)]
    sync_byte1: Option<u8>,
    /// Sync word repetitions
    #[clap(long)]
    sync_words: Option<usize>,
    /// Forward error correction
    #[clap(long)]
    fec: Option<bool>,
    /// PN9 whitening
    #[clap(long)]
    whitening: Option<bool>,
}

fn main() -> Result<()> {
    openlst::runtime::init();
    let args = Args::parse();

    let mut b = FramerConfigBuilder::from_runtime_config()?;
    if let Some(v) = args.preamble_bytes {
        b = b.preamble_bytes(v);
    }
    if let Some(v) = args.sync_byte0 {
        b = b.sync_byte0(v);
    }
    if let Some(v) = args.sync_byte1 {
        b = b.sync_byte1(v);
    }
    if let Some(v) = args.sync_words {
        b = b.sync_words(v);
    }
    if let Some(v) = args.fec {
        b = b.fec(v);
    }
    if let Some(v) = args.whitening {
        b = b.whitening(v);
    }
    let config = b.build()?;

    let data = match &args.input {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let (frames, err) = Decoder::new(config).decode_all(&data);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    for frame in frames.iter() {
        let h = frame.header();
        tracing::info!(
            "frame seq {:#06x} flags {:#04x} length {}",
            h.sequence,
            h.flags,
            h.length
        );
        out.write_all(frame.payload())?;
    }
    out.flush()?;

    if let Some(e) = err {
        tracing::warn!("stopped after {} frames: {}", frames.len(), e);
        return Err(e.into());
    }
    Ok(())
}
