#[macro_use]
extern crate tracing;

use anyhow::Context;
use bgrdump_common::{Decode, ImageCodec, PixelGrid};
use rkyv::ser::writer::IoWriter;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(argh::FromArgs)]
/// decode an image once into a pixel archive for `bgrdump --archive`
struct Args {
    #[argh(positional)]
    /// path to the image file
    path: PathBuf,

    #[argh(option)]
    /// path to output file
    output: PathBuf,
}

fn write_archive<W: Write>(grid: &PixelGrid, writer: W) -> anyhow::Result<W> {
    let writer = rkyv::api::high::to_bytes_in::<_, rkyv::rancor::Error>(grid, IoWriter::new(writer))?;
    Ok(writer.into_inner())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    let grid = fs::read(&args.path)
        .map_err(anyhow::Error::from)
        .and_then(|data| Ok(ImageCodec.decode(&data)?))
        .with_context(|| format!("Cannot load image: {}", args.path.display()))?;

    info!(dimensions = %grid.dimensions(), "decoded image");

    let file = File::create(&args.output)?;
    let mut file = write_archive(&grid, BufWriter::new(file))?;
    file.flush()?;

    info!(output = %args.output.display(), "wrote pixel archive");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgrdump_common::{ArchiveCodec, Pixel};

    #[test]
    fn test_archive_reads_back() {
        let grid = PixelGrid::from_fn(7, 9, |x, y| Pixel {
            r: x as u8,
            g: y as u8,
            b: (x * y) as u8,
        });

        let bytes = write_archive(&grid, Vec::new()).unwrap();
        assert_eq!(ArchiveCodec.decode(&bytes).unwrap(), grid);
    }
}
