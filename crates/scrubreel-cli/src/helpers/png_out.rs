// crates/scrubreel-cli/src/helpers/png_out.rs
//
// Write an RgbaFrame to disk as an 8-bit RGBA PNG.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use scrubreel_core::RgbaFrame;

pub fn write_png(dest: &Path, frame: &RgbaFrame) -> Result<()> {
    let expected = frame.width as usize * frame.height as usize * 4;
    ensure!(
        frame.data.len() == expected,
        "frame is {}x{} but holds {} bytes (want {expected})",
        frame.width, frame.height, frame.data.len()
    );

    let file = File::create(dest)
        .with_context(|| format!("create {}", dest.display()))?;
    let w = &mut BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame.data)?;
    writer.finish()?;
    log::info!("[png] saved {}x{} → {}", frame.width, frame.height, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn written_pixels_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = RgbaFrame {
            width:  2,
            height: 1,
            data:   vec![255, 0, 0, 255, 0, 0, 255, 128],
        };
        write_png(&path, &frame).unwrap();

        let decoder = png::Decoder::new(BufReader::new(File::open(&path).unwrap()));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0u8; reader.output_buffer_size().unwrap()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (2, 1));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&buf[..info.buffer_size()], frame.data.as_slice());
    }

    #[test]
    fn short_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let frame = RgbaFrame { width: 4, height: 4, data: vec![0; 10] };
        assert!(write_png(&dir.path().join("bad.png"), &frame).is_err());
    }
}
