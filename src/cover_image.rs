use std::io::Cursor;

use ab_glyph::{Font, FontRef, GlyphId, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

pub const COVER_WIDTH: u32 = 1200;
pub const COVER_HEIGHT: u32 = 630;
const LOGO_SIZE: u32 = 200;
const AWAY_LOGO_X: i64 = 250;
const HOME_LOGO_X: i64 = 750;
const LOGO_Y: i64 = 215;

const TITLE_Y: f32 = 100.0;
const VS_Y: f32 = 300.0;
const NAME_GAP: f32 = 20.0;
const TITLE_PX: f32 = 32.0;
const VS_PX: f32 = 48.0;
const NAME_PX: f32 = 24.0;

const BACKGROUND: Rgba<u8> = Rgba([0x1a, 0x1a, 0x1a, 0xff]);
const TEXT: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

static FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

fn load_logo(bytes: &[u8], side: &str) -> Result<RgbaImage> {
    let logo = image::load_from_memory(bytes)
        .with_context(|| format!("decode {side} logo"))?
        .to_rgba8();
    Ok(imageops::resize(&logo, LOGO_SIZE, LOGO_SIZE, FilterType::Lanczos3))
}

/// Advance width of a laid-out line, kerning included.
fn text_width(font: &FontRef<'_>, px: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

fn blend(pixel: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let c = coverage.clamp(0.0, 1.0);
    for i in 0..3 {
        let mixed = f32::from(pixel.0[i]) * (1.0 - c) + f32::from(color.0[i]) * c;
        pixel.0[i] = mixed.round() as u8;
    }
}

/// White text with its top edge at `top`.
fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontRef<'_>,
    px: f32,
    left: f32,
    top: f32,
    text: &str,
) {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let baseline = top + scaled.ascent();
    let (width, height) = canvas.dimensions();

    let mut caret = left;
    let mut previous: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outline) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outline.px_bounds();
        outline.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + i64::from(gx);
            let y = bounds.min.y as i64 + i64::from(gy);
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                return;
            }
            blend(canvas.get_pixel_mut(x as u32, y as u32), TEXT, coverage);
        });
    }
}

fn draw_centered(
    canvas: &mut RgbaImage,
    font: &FontRef<'_>,
    px: f32,
    center_x: f32,
    top: f32,
    text: &str,
) {
    let left = center_x - text_width(font, px, text) / 2.0;
    draw_text(canvas, font, px, left, top, text);
}

/// Social-card cover on a dark 1200x630 canvas: a title line, both logos
/// side by side with "VS" between them and each team's name underneath,
/// PNG encoded.
pub fn compose_cover(
    away_png: &[u8],
    home_png: &[u8],
    away_team: &str,
    home_team: &str,
) -> Result<Vec<u8>> {
    let away = load_logo(away_png, "away")?;
    let home = load_logo(home_png, "home")?;
    let font = FontRef::try_from_slice(FONT_BYTES).context("load cover font")?;

    let mut canvas = RgbaImage::from_pixel(COVER_WIDTH, COVER_HEIGHT, BACKGROUND);
    imageops::overlay(&mut canvas, &away, AWAY_LOGO_X, LOGO_Y);
    imageops::overlay(&mut canvas, &home, HOME_LOGO_X, LOGO_Y);

    let mid = COVER_WIDTH as f32 / 2.0;
    let half_logo = LOGO_SIZE as f32 / 2.0;
    let name_y = (LOGO_Y + i64::from(LOGO_SIZE)) as f32 + NAME_GAP;
    let title = format!("{away_team} vs {home_team} - MLB Preview");
    draw_centered(&mut canvas, &font, TITLE_PX, mid, TITLE_Y, &title);
    draw_centered(&mut canvas, &font, VS_PX, mid, VS_Y, "VS");
    let away_center = AWAY_LOGO_X as f32 + half_logo;
    let home_center = HOME_LOGO_X as f32 + half_logo;
    draw_centered(&mut canvas, &font, NAME_PX, away_center, name_y, away_team);
    draw_centered(&mut canvas, &font, NAME_PX, home_center, name_y, home_team);

    let flattened = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(flattened)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .context("encode cover png")?;
    Ok(out)
}
