use crate::{Pixel, Window};
use std::io::{self, Write};

impl Pixel {
    /// Blue, green and red as six lowercase hex digits.
    pub fn bgr_hex(&self) -> String {
        let Self { r, g, b } = *self;
        format!("{b:02x}{g:02x}{r:02x}")
    }
}

/// Writes one BGR hex line per pixel of the window and returns how many were written.
pub fn write_lines<W: Write>(window: Window<'_>, out: &mut W) -> io::Result<usize> {
    let mut written = 0;

    for pixel in window.pixels() {
        out.write_all(pixel.bgr_hex().as_bytes())?;
        out.write_all(b"\n")?;
        written += 1;
    }

    debug!(lines = written, region = %window.region(), "wrote window");

    Ok(written)
}
