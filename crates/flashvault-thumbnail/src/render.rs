//! Thumbnail rendering

use crate::ThumbnailError;
use crate::font::{self, GLYPH_HEIGHT};
use flashvault_config::ThumbnailStyle;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops};
use std::path::Path;

/// Card thumbnail width
pub const TARGET_WIDTH: u32 = 180;

/// Card thumbnail height
pub const TARGET_HEIGHT: u32 = 140;

/// Greedy word wrap threshold for the title block
const MAX_LINE_CHARS: usize = 15;

const TITLE_SCALE: u32 = 2;
const CAPTION_SCALE: u32 = 1;
const CAPTION: &str = "FLASH GAME";

/// Synthesize a placeholder thumbnail for a game without a custom cover
///
/// `name_background` renders the title over a gradient; `default_picture`
/// scales the shared default cover to fit. Both are deterministic for a
/// given input. A missing or unreadable default cover falls back to the
/// name background so a render pass never fails.
pub fn synthesize(title: &str, style: ThumbnailStyle, default_cover: Option<&Path>) -> RgbaImage {
    match style {
        ThumbnailStyle::NameBackground => name_background(title),
        ThumbnailStyle::DefaultPicture => match default_cover.map(image::open) {
            Some(Ok(img)) => scale_to_fit(&img),
            Some(Err(e)) => {
                tracing::warn!("Default cover unreadable ({}), using name background", e);
                name_background(title)
            }
            None => name_background(title),
        },
    }
}

/// Resolve the thumbnail for a game card
///
/// A custom cover wins when it exists and loads; everything else goes
/// through [`synthesize`].
pub fn thumbnail_for(
    custom: Option<&Path>,
    title: &str,
    style: ThumbnailStyle,
    default_cover: Option<&Path>,
) -> RgbaImage {
    if let Some(path) = custom {
        match image::open(path) {
            Ok(img) => return scale_to_fit(&img),
            Err(e) => {
                tracing::warn!("Custom cover {} unreadable: {}", path.display(), e);
            }
        }
    }

    synthesize(title, style, default_cover)
}

/// Scale an image to fit inside the target size, preserving aspect ratio
pub fn scale_to_fit(img: &DynamicImage) -> RgbaImage {
    let (w, h) = (img.width().max(1), img.height().max(1));

    let scale = (TARGET_WIDTH as f64 / w as f64).min(TARGET_HEIGHT as f64 / h as f64);
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);

    imageops::resize(&img.to_rgba8(), nw, nh, imageops::FilterType::Triangle)
}

/// Encode an image as PNG at `path`
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), ThumbnailError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Create the shared default cover image if it does not exist yet
pub fn ensure_default_cover(path: &Path) -> Result<(), ThumbnailError> {
    if path.exists() {
        return Ok(());
    }

    let img = default_cover_image();
    save_png(&img, path)?;
    tracing::info!("Created default cover at {}", path.display());
    Ok(())
}

/// Title-on-gradient placeholder
fn name_background(title: &str) -> RgbaImage {
    let mut img = RgbaImage::new(TARGET_WIDTH, TARGET_HEIGHT);

    fill_gradient(&mut img, [70, 70, 120], [30, 30, 60]);

    // Decorative glyph behind the text block
    blend_circle(
        &mut img,
        120,
        80,
        30,
        Rgba([100, 200, 255, 50]),
        Rgba([100, 200, 255, 150]),
    );

    let lines = wrap_title(title);
    let line_height = (GLYPH_HEIGHT + 1) * TITLE_SCALE;
    let total_height = lines.len() as u32 * line_height;
    let start_y = (TARGET_HEIGHT as i32 - total_height as i32) / 2;

    for (i, line) in lines.iter().enumerate() {
        let width = font::text_width(line, TITLE_SCALE);
        let x = (TARGET_WIDTH as i32 - width as i32) / 2;
        let y = start_y + i as i32 * line_height as i32;
        font::draw_text(&mut img, line, x, y, TITLE_SCALE, Rgba([255, 255, 255, 255]));
    }

    draw_caption(&mut img, CAPTION);

    img
}

/// The image written as the shared default cover
fn default_cover_image() -> RgbaImage {
    let mut img = RgbaImage::new(TARGET_WIDTH, TARGET_HEIGHT);

    fill_gradient(&mut img, [50, 50, 80], [20, 20, 40]);

    // Stylized controller: two circles joined by a body
    blend_circle(
        &mut img,
        90,
        60,
        30,
        Rgba([100, 200, 255, 100]),
        Rgba([100, 200, 255, 255]),
    );
    blend_circle(
        &mut img,
        150,
        60,
        30,
        Rgba([100, 200, 255, 100]),
        Rgba([100, 200, 255, 255]),
    );
    blend_rect(
        &mut img,
        80,
        50,
        80,
        40,
        Rgba([100, 200, 255, 100]),
        Rgba([100, 200, 255, 255]),
    );

    let width = font::text_width(CAPTION, TITLE_SCALE);
    let x = (TARGET_WIDTH as i32 - width as i32) / 2;
    let y = (TARGET_HEIGHT as i32 - (GLYPH_HEIGHT * TITLE_SCALE) as i32) / 2;
    font::draw_text(
        &mut img,
        CAPTION,
        x,
        y,
        TITLE_SCALE,
        Rgba([255, 255, 255, 255]),
    );

    draw_caption(&mut img, "DEFAULT COVER");

    img
}

/// Greedy word wrap: accumulate words while a line stays within the limit
fn wrap_title(title: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in title.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if candidate_len <= MAX_LINE_CHARS {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(current.clone());
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn draw_caption(img: &mut RgbaImage, text: &str) {
    let width = font::text_width(text, CAPTION_SCALE);
    let x = (TARGET_WIDTH as i32 - width as i32) / 2;
    let y = TARGET_HEIGHT as i32 - (GLYPH_HEIGHT * CAPTION_SCALE) as i32 - 3;
    font::draw_text(img, text, x, y, CAPTION_SCALE, Rgba([200, 200, 200, 255]));
}

/// Two-stop diagonal gradient across the whole canvas
fn fill_gradient(img: &mut RgbaImage, from: [u32; 3], to: [u32; 3]) {
    let (w, h) = (img.width(), img.height());
    let span = w + h - 2;

    for y in 0..h {
        for x in 0..w {
            let t = x + y;
            let mut px = [0u8; 4];
            for c in 0..3 {
                px[c] = ((from[c] * (span - t) + to[c] * t) / span) as u8;
            }
            px[3] = 255;
            img.put_pixel(x, y, Rgba(px));
        }
    }
}

/// Source-over blend of one pixel, integer math only
fn blend_px(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }

    let dst = img.get_pixel(x as u32, y as u32).0;
    let a = color.0[3] as u32;
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = ((color.0[c] as u32 * a + dst[c] as u32 * (255 - a)) / 255) as u8;
    }
    out[3] = 255;
    img.put_pixel(x as u32, y as u32, Rgba(out));
}

/// Filled circle with a one-pixel outline ring
fn blend_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, fill: Rgba<u8>, ring: Rgba<u8>) {
    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = dx * dx + dy * dy;
            if d2 <= (r - 1) * (r - 1) {
                blend_px(img, cx + dx, cy + dy, fill);
            } else if d2 <= r * r {
                blend_px(img, cx + dx, cy + dy, ring);
            }
        }
    }
}

/// Filled rectangle with a one-pixel outline
fn blend_rect(img: &mut RgbaImage, x0: i32, y0: i32, w: i32, h: i32, fill: Rgba<u8>, ring: Rgba<u8>) {
    for dy in 0..h {
        for dx in 0..w {
            let edge = dx == 0 || dy == 0 || dx == w - 1 || dy == h - 1;
            let color = if edge { ring } else { fill };
            blend_px(img, x0 + dx, y0 + dy, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_wrap_title_short() {
        assert_eq!(wrap_title("Bubble"), vec!["Bubble"]);
        assert_eq!(wrap_title("My Game"), vec!["My Game"]);
    }

    #[test]
    fn test_wrap_title_long() {
        assert_eq!(
            wrap_title("Super Adventure Island Deluxe"),
            vec!["Super Adventure", "Island Deluxe"]
        );
    }

    #[test]
    fn test_wrap_title_single_long_word() {
        // A word beyond the limit still gets its own line
        assert_eq!(
            wrap_title("Supercalifragilistic Game"),
            vec!["Supercalifragilistic", "Game"]
        );
    }

    #[test]
    fn test_synthesize_deterministic() {
        let a = synthesize("My Game", ThumbnailStyle::NameBackground, None);
        let b = synthesize("My Game", ThumbnailStyle::NameBackground, None);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_synthesize_differs_by_title() {
        let a = synthesize("Alpha", ThumbnailStyle::NameBackground, None);
        let b = synthesize("Beta", ThumbnailStyle::NameBackground, None);
        assert_ne!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_synthesize_dimensions() {
        let img = synthesize("Anything", ThumbnailStyle::NameBackground, None);
        assert_eq!(img.dimensions(), (TARGET_WIDTH, TARGET_HEIGHT));
    }

    #[test]
    fn test_default_picture_falls_back_without_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("default_cover.png");

        let img = synthesize("Foo", ThumbnailStyle::DefaultPicture, Some(&missing));
        let fallback = synthesize("Foo", ThumbnailStyle::NameBackground, None);
        assert_eq!(img.as_raw(), fallback.as_raw());
    }

    #[test]
    fn test_ensure_default_cover_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("default_cover.png");

        ensure_default_cover(&path).unwrap();
        assert!(path.exists());
        let first = std::fs::read(&path).unwrap();

        ensure_default_cover(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_scale_to_fit_preserves_aspect() {
        let wide = DynamicImage::new_rgba8(360, 140);
        let fitted = scale_to_fit(&wide);
        assert_eq!(fitted.dimensions(), (TARGET_WIDTH, 70));

        let tall = DynamicImage::new_rgba8(140, 280);
        let fitted = scale_to_fit(&tall);
        assert_eq!(fitted.dimensions(), (70, TARGET_HEIGHT));
    }

    #[test]
    fn test_default_picture_uses_cover_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("default_cover.png");
        ensure_default_cover(&path).unwrap();

        let img = synthesize("Foo", ThumbnailStyle::DefaultPicture, Some(&path));
        assert_eq!(img.dimensions(), (TARGET_WIDTH, TARGET_HEIGHT));
    }

    #[test]
    fn test_thumbnail_for_prefers_custom() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("cover.png");

        let solid = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        save_png(&solid, &custom).unwrap();

        let img = thumbnail_for(Some(&custom), "Foo", ThumbnailStyle::NameBackground, None);
        // Scaled-up solid red, not a gradient
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(0, 0).0[2], 0);
    }
}
