// cli/commands.rs — execution of each lz4chain subcommand.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::{bail, Context};

use crate::block::{decompress_block, CompressionLevel};
use crate::cli::args::{Cli, Commands, IoArgs, LevelArgs};
use crate::cli::constants::{
    BLOCK_EXTENSION, COMPRESSOR_NAME, LZ4_EXTENSION, STDIN_MARK, STDOUT_MARK,
};
use crate::frame::{BlockSizeId, FrameOptions, FrameReader, FrameWriter};
use crate::parallel::{DispatcherConfig, ParallelCompressor};

/// Byte-counting pass-through writer for the end-of-run summary.
struct CountingWriter<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_input(path: &str) -> anyhow::Result<Box<dyn Read>> {
    if path == STDIN_MARK {
        if io::stdin().is_terminal() {
            bail!("refusing to read from a console");
        }
        return Ok(Box::new(BufReader::new(io::stdin().lock())));
    }
    let file = File::open(path).with_context(|| format!("{path}: cannot open input"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &str, force: bool) -> anyhow::Result<Box<dyn Write>> {
    if path == STDOUT_MARK {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    if !force && Path::new(path).exists() {
        bail!("{path} already exists; use --force to overwrite");
    }
    let file = File::create(path).with_context(|| format!("{path}: cannot create output"))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Output name: explicit `-o`, stdout for stdin, else derived from the input.
fn output_name(paths: &IoArgs, derive: impl FnOnce(&str) -> Option<String>) -> anyhow::Result<String> {
    if let Some(out) = &paths.output {
        return Ok(out.clone());
    }
    if paths.input == STDIN_MARK {
        return Ok(STDOUT_MARK.to_owned());
    }
    match derive(&paths.input) {
        Some(name) => {
            crate::displaylevel!(3, "output file will be: {}\n", name);
            Ok(name)
        }
        None => bail!("cannot determine an output filename for {}", paths.input),
    }
}

fn read_all(path: &str) -> anyhow::Result<Vec<u8>> {
    let mut data = Vec::new();
    open_input(path)?
        .read_to_end(&mut data)
        .with_context(|| format!("{path}: read error"))?;
    Ok(data)
}

fn summary(label: &str, from: u64, to: u64) {
    let ratio = if from == 0 { 0.0 } else { to as f64 / from as f64 * 100.0 };
    crate::displaylevel!(2, "{label} {from} bytes into {to} bytes ({ratio:.2}%)\n");
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn compress(
    paths: &IoArgs,
    level: &LevelArgs,
    block_size: u8,
    content_checksum: bool,
    block_checksum: bool,
    content_size: bool,
) -> anyhow::Result<()> {
    let mut options = FrameOptions::new(level.level)?
        .with_block_size(BlockSizeId::from_code(block_size)?)
        .with_variant(level.variant())
        .with_content_checksum(content_checksum)
        .with_block_checksum(block_checksum);
    if content_size {
        if paths.input == STDIN_MARK {
            crate::displaylevel!(2, "warning: content size unknown for stdin, not recorded\n");
        } else {
            let len = std::fs::metadata(&paths.input)
                .with_context(|| format!("{}: cannot stat input", paths.input))?
                .len();
            options = options.with_content_size(len);
        }
    }

    let out_name = output_name(paths, |input| Some(format!("{input}{LZ4_EXTENSION}")))?;
    let mut input = open_input(&paths.input)?;
    let sink = CountingWriter {
        inner: open_output(&out_name, paths.force)?,
        count: 0,
    };
    let mut writer = FrameWriter::new(sink, options);
    io::copy(&mut input, &mut writer).with_context(|| format!("{}: compression failed", paths.input))?;
    let consumed = writer.bytes_written();
    let mut sink = writer.finish()?;
    sink.flush()?;
    summary("compressed", consumed, sink.count);
    Ok(())
}

fn decompress(paths: &IoArgs) -> anyhow::Result<()> {
    let out_name = output_name(paths, |input| input.strip_suffix(LZ4_EXTENSION).map(str::to_owned))?;
    let mut reader = FrameReader::new(open_input(&paths.input)?);
    let info = *reader.frame_info().with_context(|| format!("{}: not an LZ4 frame", paths.input))?;
    crate::displaylevel!(4, "block size: {} KB\n", info.block_size_id.block_size() >> 10);

    let mut output = open_output(&out_name, paths.force)?;
    let produced = io::copy(&mut reader, &mut output)
        .with_context(|| format!("{}: decompression failed", paths.input))?;
    output.flush()?;
    crate::displaylevel!(2, "decoded {} bytes\n", produced);
    Ok(())
}

fn info(input: &str) -> anyhow::Result<()> {
    let mut reader = FrameReader::new(open_input(input)?);
    let info = *reader.frame_info().with_context(|| format!("{input}: not an LZ4 frame"))?;
    let mut out = io::stdout().lock();
    writeln!(out, "{input}")?;
    writeln!(out, "  block size       : {} KB", info.block_size_id.block_size() >> 10)?;
    writeln!(
        out,
        "  block mode       : {}",
        if info.independent_blocks { "independent" } else { "linked" }
    )?;
    writeln!(out, "  block checksum   : {}", info.block_checksum)?;
    writeln!(out, "  content checksum : {}", info.content_checksum)?;
    match info.content_size {
        Some(size) => writeln!(out, "  content size     : {size}")?,
        None => writeln!(out, "  content size     : unknown")?,
    }
    if let Some(id) = info.dict_id {
        writeln!(out, "  dictionary id    : {id:#010x}")?;
    }
    Ok(())
}

fn block(paths: &IoArgs, level: &LevelArgs, threads: u32, chunk_size: usize) -> anyhow::Result<()> {
    let level_value = CompressionLevel::new(level.level)?;
    let out_name = output_name(paths, |input| Some(format!("{input}{BLOCK_EXTENSION}")))?;
    let data = read_all(&paths.input)?;

    let dispatcher = ParallelCompressor::new(DispatcherConfig::new(threads as usize, chunk_size))?
        .with_variant(level.variant());
    dispatcher.start();
    let packed = dispatcher.compress(&data, level_value.get())?;
    dispatcher.stop();

    let mut output = open_output(&out_name, paths.force)?;
    output.write_all(&packed)?;
    output.flush()?;
    summary("compressed", data.len() as u64, packed.len() as u64);
    Ok(())
}

fn unblock(paths: &IoArgs, max_size: usize) -> anyhow::Result<()> {
    let out_name = output_name(paths, |input| input.strip_suffix(BLOCK_EXTENSION).map(str::to_owned))?;
    let data = read_all(&paths.input)?;
    let raw = decompress_block(&data, max_size)?;
    let mut output = open_output(&out_name, paths.force)?;
    output.write_all(&raw)?;
    output.flush()?;
    crate::displaylevel!(2, "decoded {} bytes\n", raw.len());
    Ok(())
}

/// Execute the parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    crate::display::set_display_level(cli.display_level());
    crate::displaylevel!(
        3,
        "*** {} v{} {}-bit, {} workers available ***\n",
        COMPRESSOR_NAME,
        crate::VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8,
        crate::config::default_nb_workers()
    );

    match &cli.command {
        Commands::Compress {
            io: paths,
            level,
            block_size,
            content_checksum,
            block_checksum,
            content_size,
        } => compress(paths, level, *block_size, *content_checksum, *block_checksum, *content_size),
        Commands::Decompress { io: paths } => decompress(paths),
        Commands::Info { input } => info(input),
        Commands::Block {
            io: paths,
            level,
            threads,
            chunk_size,
        } => block(paths, level, *threads, *chunk_size),
        Commands::Unblock { io: paths, max_size } => unblock(paths, *max_size),
    }
}
