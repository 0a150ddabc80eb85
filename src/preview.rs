// Preview module: decodes an image and renders it as true-colour half-block lines

use image::{DynamicImage, GenericImageView, Pixel};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::io;
use std::path::{Path, PathBuf};

/// What to render and how much room there is, in image pixels.
///
/// One terminal cell holds two vertical pixels, so `max_height` is twice the
/// row count of the target area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRequest {
    pub path: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
}

impl PreviewRequest {
    /// Request sized to a terminal area of `cols` x `rows` cells
    pub fn for_area(path: &Path, cols: u16, rows: u16) -> Self {
        Self {
            path: path.to_path_buf(),
            max_width: u32::from(cols.max(1)),
            max_height: u32::from(rows.max(1)) * 2,
        }
    }
}

/// A decoded, scaled image ready to draw
#[derive(Debug, Clone)]
pub struct ImagePreview {
    pub original_width: u32,
    pub original_height: u32,
    pub lines: Vec<Line<'static>>,
}

impl ImagePreview {
    pub fn dimensions_label(&self) -> String {
        format!("{}×{} px", self.original_width, self.original_height)
    }
}

/// Loads an image from a file path
pub fn load_image(path: &Path) -> io::Result<DynamicImage> {
    image::open(path).map_err(|e| io::Error::other(format!("Image loading error: {}", e)))
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }

    let ratio = (max_width as f64 / original_width as f64)
        .min(max_height as f64 / original_height as f64);

    if ratio >= 1.0 {
        // Never upscale
        return (original_width, original_height);
    }

    let new_width = ((original_width as f64 * ratio) as u32).max(1);
    let new_height = ((original_height as f64 * ratio) as u32).max(1);
    (new_width, new_height)
}

/// Converts an image to styled lines using half-block characters.
///
/// Each cell is an upper half block (▀): foreground is the upper pixel,
/// background the lower one.
pub fn image_to_halfblock_lines(img: &DynamicImage, width: u32, height: u32) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    // Triangle is fast enough for large photos and good enough for a terminal
    let img = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    let img = img.to_rgb8();

    let rows = height.div_ceil(2);
    let mut lines = Vec::with_capacity(rows as usize);

    for row in 0..rows {
        let upper_y = row * 2;
        let lower_y = upper_y + 1;

        let spans: Vec<Span<'static>> = (0..width)
            .map(|x| {
                let upper = img.get_pixel(x, upper_y).to_rgb();
                let lower = if lower_y < height {
                    img.get_pixel(x, lower_y).to_rgb()
                } else {
                    upper
                };

                let style = Style::default()
                    .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                    .bg(Color::Rgb(lower[0], lower[1], lower[2]));
                Span::styled("▀", style)
            })
            .collect();

        lines.push(Line::from(spans));
    }

    lines
}

/// Decodes and scales the requested image
pub fn generate_image_preview(request: &PreviewRequest) -> io::Result<ImagePreview> {
    let img = load_image(&request.path)?;
    let (original_width, original_height) = img.dimensions();

    let (width, height) = calculate_resize_dimensions(
        original_width,
        original_height,
        request.max_width,
        request.max_height,
    );

    Ok(ImagePreview {
        original_width,
        original_height,
        lines: image_to_halfblock_lines(&img, width, height),
    })
}
