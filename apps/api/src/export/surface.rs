//! Render surfaces handed to the export pipeline.
//!
//! The pipeline knows nothing about documents: it only asks a surface for a bitmap at a
//! given supersampling factor. Template layout happens upstream and arrives either as
//! an [`ElementTree`] of sized, styled boxes or as an already captured snapshot.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::export::ExportError;
use crate::models::resume::Theme;

/// Largest bitmap side the pipeline will allocate, in device pixels.
pub const MAX_BITMAP_SIDE: u32 = 16_384;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub trait RenderSurface: Send + Sync {
    /// Size in layout (CSS) pixels.
    fn logical_size(&self) -> (u32, u32);

    /// Paints the surface at `scale` device pixels per layout pixel.
    fn rasterize(&self, scale: u32) -> Result<RgbaImage, ExportError>;
}

fn checked_canvas(width: u32, height: u32, scale: u32) -> Result<(u32, u32), ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::Rasterize("surface has no area".to_string()));
    }
    let w = width.checked_mul(scale).filter(|&w| w <= MAX_BITMAP_SIDE);
    let h = height.checked_mul(scale).filter(|&h| h <= MAX_BITMAP_SIDE);
    match (w, h) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(ExportError::Rasterize(format!(
            "{width}x{height} at {scale}x exceeds {MAX_BITMAP_SIDE}px"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Colour
// ────────────────────────────────────────────────────────────────────────────

/// Opaque RGB colour, written as `#rrggbb` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    fn rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| format!("expected #rrggbb colour, got '{value}'"))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("invalid hex digits in colour '{value}'"))
        };
        Ok(Color([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        let [r, g, b] = color.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<Theme> for Color {
    fn from(theme: Theme) -> Self {
        Color(theme.primary_rgb())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Element tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Column,
    Row,
}

/// A sized box. Children flow inside the padding box along `direction`, separated by
/// `gap`, and are clipped to their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default)]
    pub padding: u32,
    #[serde(default)]
    pub gap: u32,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            padding: 0,
            gap: 0,
            direction: Direction::Column,
            children: Vec::new(),
        }
    }

    pub fn with_background(mut self, color: impl Into<Color>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

/// Axis-aligned rectangle in layout pixels. `x1`/`y1` are exclusive.
#[derive(Debug, Clone, Copy)]
struct Rect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Rect {
    fn intersect(self, other: Rect) -> Rect {
        Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

/// A laid-out visual tree rooted at one element. Unpainted areas are white.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementTree {
    pub root: Element,
}

impl ElementTree {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    fn paint(canvas: &mut RgbaImage, element: &Element, x: i64, y: i64, clip: Rect, scale: u32) {
        let bounds = Rect {
            x0: x,
            y0: y,
            x1: x + i64::from(element.width),
            y1: y + i64::from(element.height),
        };
        let visible = bounds.intersect(clip);
        if visible.is_empty() {
            return;
        }

        if let Some(color) = element.background {
            fill(canvas, visible, scale, color.rgba());
        }

        let pad = i64::from(element.padding);
        let inner = Rect {
            x0: bounds.x0 + pad,
            y0: bounds.y0 + pad,
            x1: bounds.x1 - pad,
            y1: bounds.y1 - pad,
        }
        .intersect(visible);

        let (mut cx, mut cy) = (inner.x0, inner.y0);
        for child in &element.children {
            Self::paint(canvas, child, cx, cy, inner, scale);
            match element.direction {
                Direction::Column => cy += i64::from(child.height) + i64::from(element.gap),
                Direction::Row => cx += i64::from(child.width) + i64::from(element.gap),
            }
        }
    }
}

fn fill(canvas: &mut RgbaImage, rect: Rect, scale: u32, color: Rgba<u8>) {
    let s = i64::from(scale);
    let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let x0 = (rect.x0 * s).clamp(0, w) as u32;
    let x1 = (rect.x1 * s).clamp(0, w) as u32;
    let y0 = (rect.y0 * s).clamp(0, h) as u32;
    let y1 = (rect.y1 * s).clamp(0, h) as u32;
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, color);
        }
    }
}

impl RenderSurface for ElementTree {
    fn logical_size(&self) -> (u32, u32) {
        (self.root.width, self.root.height)
    }

    fn rasterize(&self, scale: u32) -> Result<RgbaImage, ExportError> {
        let (w, h) = checked_canvas(self.root.width, self.root.height, scale)?;
        let mut canvas = RgbaImage::from_pixel(w, h, WHITE);
        let clip = Rect {
            x0: 0,
            y0: 0,
            x1: i64::from(self.root.width),
            y1: i64::from(self.root.height),
        };
        Self::paint(&mut canvas, &self.root, 0, 0, clip, scale);
        Ok(canvas)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshot
// ────────────────────────────────────────────────────────────────────────────

/// A bitmap captured upstream at `device_scale` pixels per layout pixel.
#[derive(Debug, Clone)]
pub struct SnapshotSurface {
    image: RgbaImage,
    device_scale: u32,
}

impl SnapshotSurface {
    pub fn new(image: RgbaImage, device_scale: u32) -> Result<Self, ExportError> {
        if device_scale == 0 {
            return Err(ExportError::Rasterize("device scale must be positive".to_string()));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(ExportError::MissingSurface);
        }
        checked_canvas(image.width(), image.height(), 1)?;
        Ok(Self {
            image,
            device_scale,
        })
    }

    /// Decodes a PNG or JPEG capture.
    pub fn decode(bytes: &[u8], device_scale: u32) -> Result<Self, ExportError> {
        if bytes.is_empty() {
            return Err(ExportError::MissingSurface);
        }
        let image = image::load_from_memory(bytes)
            .map_err(|e| ExportError::Rasterize(format!("snapshot decode failed: {e}")))?
            .to_rgba8();
        Self::new(image, device_scale)
    }
}

impl RenderSurface for SnapshotSurface {
    fn logical_size(&self) -> (u32, u32) {
        (
            (self.image.width() / self.device_scale).max(1),
            (self.image.height() / self.device_scale).max(1),
        )
    }

    fn rasterize(&self, scale: u32) -> Result<RgbaImage, ExportError> {
        if scale == self.device_scale {
            return Ok(self.image.clone());
        }
        let (lw, lh) = self.logical_size();
        let (w, h) = checked_canvas(lw, lh, scale)?;
        Ok(imageops::resize(&self.image, w, h, FilterType::Triangle))
    }
}
