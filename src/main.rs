#[macro_use]
extern crate tracing;

use anyhow::Context;
use bgrdump_common::{ArchiveCodec, Bounds, DEFAULT_EXTENT, Decode, ImageCodec, PixelGrid, Region};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_IMAGE: &str = "nyancat.png";

#[derive(argh::FromArgs)]
/// Print the pixels of an image as BGR hex triplets, one per line
struct Args {
    #[argh(positional)]
    /// image to read (default: nyancat.png)
    path: Option<PathBuf>,

    #[argh(option, default = "DEFAULT_EXTENT")]
    /// number of columns to print
    width: u32,

    #[argh(option, default = "DEFAULT_EXTENT")]
    /// number of rows to print
    height: u32,

    #[argh(switch)]
    /// print only the part of the region the image covers instead of failing
    clamp: bool,

    #[argh(switch)]
    /// read a pixel archive written by bgrdump-process instead of an image
    archive: bool,
}

impl Args {
    fn path(&self) -> &Path {
        self.path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_IMAGE))
    }

    fn bounds(&self) -> Bounds {
        if self.clamp { Bounds::Clamp } else { Bounds::Strict }
    }

    fn codec(&self) -> &'static dyn Decode {
        if self.archive { &ArchiveCodec } else { &ImageCodec }
    }
}

fn map_file(path: &Path) -> anyhow::Result<memmap2::Mmap> {
    let file = File::open(path)?;
    let data = unsafe { memmap2::Mmap::map(&file)? };
    Ok(data)
}

fn load_grid(path: &Path, codec: &dyn Decode) -> anyhow::Result<PixelGrid> {
    info!(path = %path.display(), "loading image..");

    let grid = map_file(path)
        .and_then(|data| Ok(codec.decode(&data)?))
        .with_context(|| format!("Cannot load image: {}", path.display()))?;

    info!(dimensions = %grid.dimensions(), "loaded image successfully");
    Ok(grid)
}

fn run(args: &Args, out: &mut impl Write) -> anyhow::Result<usize> {
    let grid = load_grid(args.path(), args.codec())?;
    let window = grid.window(Region::new(args.width, args.height), args.bounds())?;

    let written = bgrdump_common::write_lines(window, out)?;
    out.flush()?;

    Ok(written)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args: Args = argh::from_env();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = run(&args, &mut out)?;

    info!("printed {written} pixels");

    Ok(())
}
