use anyhow::Result;
use clap::Parser;
use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;

use openlst::parse_byte;
use openlst::Encoder;
use openlst::FramerConfigBuilder;
use openlst::MAX_PAYLOAD_LEN;

#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// Input file (stdin if omitted)
    #[clap(short, long)]
    input: Option<PathBuf>,
    /// Output file (stdout if omitted)
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Payload bytes per frame
    #[clap(short, long, default_value_t = MAX_PAYLOAD_LEN)]
    chunk_size: usize,
    /// Write hex, one transmit unit per line
    #[clap(long)]
    hex: bool,
    /// Print the effective configuration as JSON and exit
    #[clap(long)]
    print_config: bool,
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
    /// Header flags
    #[clap(long, value_parser = parse_byte)]
    flags: Option<u8>,
    /// Forward error correction
    #[clap(long)]
    fec: Option<bool>,
    /// PN9 whitening
    #[clap(long)]
    whitening: Option<bool>,
    /// First sequence number
    #[clap(long)]
    seq: Option<u16>,
}

fn builder(args: &Args) -> Result<FramerConfigBuilder> {
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
    if let Some(v) = args.flags {
        b = b.flags(v);
    }
    if let Some(v) = args.fec {
        b = b.fec(v);
    }
    if let Some(v) = args.whitening {
        b = b.whitening(v);
    }
    if let Some(v) = args.seq {
        b = b.sequence_seed(v);
    }
    Ok(b)
}

fn main() -> Result<()> {
    openlst::runtime::init();
    let args = Args::parse();

    let config = builder(&args)?.build()?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    if args.chunk_size == 0 || args.chunk_size > MAX_PAYLOAD_LEN {
        anyhow::bail!("chunk size must be in 1..={MAX_PAYLOAD_LEN}");
    }

    let data = match &args.input {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut encoder = Encoder::new(config);
    let mut n_units = 0;
    for chunk in data.chunks(args.chunk_size) {
        let unit = encoder.encode(chunk)?;
        if args.hex {
            let line: Vec<String> = unit.iter().map(|b| format!("{b:02x}")).collect();
            writeln!(out, "{}", line.join(" "))?;
        } else {
            out.write_all(&unit)?;
        }
        n_units += 1;
    }
    out.flush()?;

    tracing::info!(
        "encoded {} bytes into {} transmit units, next sequence {:#06x}",
        data.len(),
        n_units,
        encoder.sequence()
    );
    Ok(())
}
