//! Writing finished renders to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use kiln_renderer::ImageBuffer;

/// Saves `image` to `path`. A `.ppm` or extensionless path gets plain-text
/// PPM; anything else is encoded by the `image` crate from its extension.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .map_or(true, |ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        image.write_ppm(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    let rgb = image::RgbImage::from_raw(image.width(), image.height(), image.as_bytes().to_vec())
        .context("pixel buffer does not match image size")?;
    rgb.save(path)
        .with_context(|| format!("failed to encode {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("kiln-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_ppm_is_plain_text() {
        let path = temp_path("out.ppm");
        let image = ImageBuffer::new(2, 1);
        save(&image, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n0 0 0\n0 0 0\n");
    }

    #[test]
    fn test_png_round_trips_size() {
        let path = temp_path("out.png");
        save(&ImageBuffer::new(3, 2), &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }
}
