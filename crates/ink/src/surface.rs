//! Raster surfaces that ink is drawn onto

use std::io::Cursor;

use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::renderer::Dab;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// What the pad needs from a raster target
pub trait InkSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fill a disc of `radius` centred at (x, y)
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: [f32; 4]);

    /// Fill the union of several discs as one shape
    fn fill_dabs(&mut self, dabs: &[Dab], color: [f32; 4]) {
        for dab in dabs {
            self.fill_circle(dab.x, dab.y, dab.radius, color);
        }
    }

    /// Replace every pixel with `color`
    fn clear(&mut self, color: [f32; 4]);

    /// Change dimensions. Existing content is discarded.
    fn resize(&mut self, width: u32, height: u32);
}

/// Pixel rectangle (x, y, width, height)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DirtyRect {
    /// Smallest rectangle containing both
    pub fn union(&self, other: &DirtyRect) -> DirtyRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let x_end = (self.x + self.width).max(other.x + other.width);
        let y_end = (self.y + self.height).max(other.y + other.height);
        DirtyRect {
            x,
            y,
            width: x_end - x,
            height: y_end - y,
        }
    }
}

/// Antialiased coverage of a pixel whose centre is `distance` from a disc centre
#[inline]
pub fn disc_coverage(distance: f32, radius: f32) -> f32 {
    (radius + 0.5 - distance).clamp(0.0, 1.0)
}

/// A float RGBA CPU surface
/// Stores pixels as straight-alpha [f32; 4] (Rgba16Float compatible)
pub struct CpuSurface {
    width: u32,
    height: u32,
    /// Pixel data in row-major order
    pixels: Vec<[f32; 4]>,
    dirty: Option<DirtyRect>,
}

impl CpuSurface {
    /// Create a new surface initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
            dirty: None,
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get a pixel, None if out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Set a pixel, ignored if out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Source-over composite of `color` scaled by `coverage`
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.index(x, y);
        let dst = self.pixels[index];

        let src_alpha = color[3] * coverage;
        let dst_weight = dst[3] * (1.0 - src_alpha);
        let out_alpha = src_alpha + dst_weight;

        if out_alpha <= 0.0 {
            self.pixels[index] = [0.0, 0.0, 0.0, 0.0];
            return;
        }

        let mix = |s: f32, d: f32| (s * src_alpha + d * dst_weight) / out_alpha;
        self.pixels[index] = [
            mix(color[0], dst[0]),
            mix(color[1], dst[1]),
            mix(color[2], dst[2]),
            out_alpha,
        ];
    }

    /// Raw pixel data for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Number of pixels with any alpha
    pub fn inked_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0.0).count()
    }

    /// Region modified since the last call, clearing the dirty state
    pub fn take_dirty_rect(&mut self) -> Option<DirtyRect> {
        self.dirty.take()
    }

    pub fn has_dirty_region(&self) -> bool {
        self.dirty.is_some()
    }

    fn mark_dirty(&mut self, rect: DirtyRect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(&rect),
            None => rect,
        });
    }

    fn mark_all_dirty(&mut self) {
        self.mark_dirty(DirtyRect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        });
    }

    /// Pixel bounds touched by a disc, clamped to the surface
    fn dab_bounds(&self, dab: &Dab) -> Option<(u32, u32, u32, u32)> {
        let reach = dab.radius.max(0.0) + 0.5;
        let x_min = (dab.x - reach).floor().max(0.0);
        let y_min = (dab.y - reach).floor().max(0.0);
        let x_max = (dab.x + reach).ceil().min(self.width as f32);
        let y_max = (dab.y + reach).ceil().min(self.height as f32);

        if !(x_min < x_max && y_min < y_max) {
            return None;
        }
        Some((x_min as u32, y_min as u32, x_max as u32, y_max as u32))
    }

    /// Convert to an 8-bit image
    pub fn to_rgba_image(&self) -> RgbaImage {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[self.index(x, y)];
            Rgba([to_u8(p[0]), to_u8(p[1]), to_u8(p[2]), to_u8(p[3])])
        })
    }

    /// Encode the surface as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        debug!(
            "CpuSurface::encode_png: {}x{} -> {} bytes",
            self.width,
            self.height,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Decode PNG bytes into an image
    pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, SurfaceError> {
        Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
    }

    /// Composite an image over the surface, scaled to fill it
    pub fn draw_image(&mut self, image: &RgbaImage) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let scaled;
        let source = if image.dimensions() == (self.width, self.height) {
            image
        } else {
            scaled = image::imageops::resize(image, self.width, self.height, FilterType::Triangle);
            &scaled
        };

        for (x, y, pixel) in source.enumerate_pixels() {
            let [r, g, b, a] = pixel.0.map(|c| c as f32 / 255.0);
            self.blend_pixel(x, y, [r, g, b, 1.0], a);
        }
        self.mark_all_dirty();
    }
}

impl InkSurface for CpuSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: [f32; 4]) {
        self.fill_dabs(&[Dab { x, y, radius }], color);
    }

    /// Discs are merged by maximum coverage and composited once, so overlap
    /// inside a segment never darkens a translucent pen.
    fn fill_dabs(&mut self, dabs: &[Dab], color: [f32; 4]) {
        let placed: Vec<(&Dab, (u32, u32, u32, u32))> = dabs
            .iter()
            .filter_map(|dab| self.dab_bounds(dab).map(|bounds| (dab, bounds)))
            .collect();
        let Some(&(_, first)) = placed.first() else {
            return;
        };

        let (x_min, y_min, x_max, y_max) = placed
            .iter()
            .fold(first, |(x0, y0, x1, y1), &(_, (bx0, by0, bx1, by1))| {
                (x0.min(bx0), y0.min(by0), x1.max(bx1), y1.max(by1))
            });

        let region_width = (x_max - x_min) as usize;
        let region_height = (y_max - y_min) as usize;
        let mut coverage = vec![0.0f32; region_width * region_height];

        for (dab, (bx0, by0, bx1, by1)) in placed {
            for py in by0..by1 {
                let row = (py - y_min) as usize * region_width;
                for px in bx0..bx1 {
                    let dx = (px as f32 + 0.5) - dab.x;
                    let dy = (py as f32 + 0.5) - dab.y;
                    let c = disc_coverage((dx * dx + dy * dy).sqrt(), dab.radius);
                    let cell = &mut coverage[row + (px - x_min) as usize];
                    *cell = cell.max(c);
                }
            }
        }

        for row in 0..region_height {
            for col in 0..region_width {
                let c = coverage[row * region_width + col];
                if c > 0.0 {
                    self.blend_pixel(x_min + col as u32, y_min + row as u32, color, c);
                }
            }
        }

        debug!(
            "CpuSurface::fill_dabs: {} dabs -> region ({}, {}) {}x{}",
            dabs.len(),
            x_min,
            y_min,
            region_width,
            region_height
        );

        self.mark_dirty(DirtyRect {
            x: x_min,
            y: y_min,
            width: region_width as u32,
            height: region_height as u32,
        });
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
        self.mark_all_dirty();
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = CpuSurface::new(width, height);
        self.mark_all_dirty();
    }
}
