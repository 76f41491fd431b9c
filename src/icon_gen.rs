use crate::error::GenerateError;
use crate::manifest_json::ManifestIcons;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, ImageFormat, Rgb, RgbImage,
};
use std::{
    fs::create_dir_all,
    io::Write,
    path::{Component, Path, PathBuf},
};

/// Icon sizes rendered by a run, paired with their file names inside the output directory
pub const ICON_SIZES: [(u32, &str); 3] = [
    (16, "icon16.png"),
    (48, "icon48.png"),
    (128, "icon128.png"),
];

/// File name of the manifest fragment written next to the icons
pub const MANIFEST_FILENAME: &str = "manifest-icons.json";

/// Printed when the PNG encoder is missing from the build
pub const MISSING_CAPABILITY_GUIDANCE: [&str; 7] = [
    "Error: the PNG encoder is not available in this build.",
    "Rebuild with the image crate's \"png\" feature enabled.",
    "",
    "Alternatively, you can:",
    "1. Create icons manually using an image editor",
    "2. Use an online icon generator",
    "3. Required sizes: 16x16, 48x48, and 128x128 pixels",
];

pub const BACKGROUND_COLOR: &str = "#1a1a1a";
pub const ACCENT_COLOR: &str = "#ffd700";
pub const HIGHLIGHT_COLOR: &str = "#ffed4e";

#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
    pub manifest: bool,
}

/// Encoders the run depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub png_encoder: bool,
}

impl Capabilities {
    /// Probe the encoders compiled into the `image` crate
    pub fn detect() -> Self {
        Self {
            png_encoder: ImageFormat::Png.can_write(),
        }
    }
}

/// The three colors every icon is painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub accent: Rgb<u8>,
    pub highlight: Rgb<u8>,
}

impl Palette {
    /// Dark background with a gold moon; mirrors the hex constants above
    pub const CRESCENT: Palette = Palette {
        background: Rgb([0x1a, 0x1a, 0x1a]),
        accent: Rgb([0xff, 0xd7, 0x00]),
        highlight: Rgb([0xff, 0xed, 0x4e]),
    };
}

/// Pixel rectangle with inclusive right and bottom edges
///
/// Coordinates are signed because the occluding circle is allowed to hang off
/// the right side of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn shifted_right(self, dx: i32) -> Self {
        Self::new(self.left + dx, self.top, self.right + dx, self.bottom)
    }

    pub fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Center pixel, rounded towards the top-left
    pub fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    pub fn as_array(&self) -> [i32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

/// Measurements derived from the icon size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub size: u32,
    pub padding: u32,
    pub offset: u32,
    pub stroke: u32,
}

impl Geometry {
    pub fn for_size(size: u32) -> Self {
        Self {
            size,
            padding: size / 8,
            offset: size / 6,
            stroke: (size / 32).max(1),
        }
    }

    /// Box of the moon itself
    pub fn outer_box(&self) -> BoundingBox {
        let near = self.padding as i32;
        let far = self.size as i32 - self.padding as i32;
        BoundingBox::new(near, near, far, far)
    }

    /// Box of the background-colored circle that carves out the crescent
    pub fn inner_box(&self) -> BoundingBox {
        self.outer_box().shifted_right(self.offset as i32)
    }
}

/// Ensure the output directory exists; does nothing if it is already there
pub fn ensure_directory(path: &Path) -> Result<()> {
    create_dir_all(path)
        .with_context(|| format!("Can't create output directory {}", path.display()))
}

/// Render every icon into `args.output`
///
/// Nothing is written when the PNG encoder is missing. A failing icon stops the
/// run; icons already written are left in place.
pub fn generate_icons(args: &Args, capabilities: Capabilities) -> Result<(), GenerateError> {
    if !capabilities.png_encoder {
        return Err(GenerateError::MissingCapability);
    }

    ensure_directory(&args.output)?;

    let mut rendered = Vec::with_capacity(ICON_SIZES.len());
    for (size, filename) in ICON_SIZES {
        let output_path = args.output.join(filename);
        render_icon(size, &output_path)?;
        rendered.push((size, output_path));
    }

    if args.manifest {
        write_manifest(&args.output, &rendered)?;
    }

    println!();
    println!("Icons generated successfully!");
    println!("If you want custom icons, replace these files with your own designs.");

    Ok(())
}

/// Draw the crescent icon of the given size and save it as PNG
pub fn render_icon(size: u32, output_path: &Path) -> Result<()> {
    let canvas = draw_icon(size)?;
    save_png(&canvas, output_path)?;
    println!("Created {} ({size}x{size})", output_path.display());
    Ok(())
}

/// Paint the crescent onto a fresh canvas
pub fn draw_icon(size: u32) -> Result<RgbImage> {
    if size == 0 {
        anyhow::bail!("Icon size must be positive");
    }

    let palette = Palette::CRESCENT;
    let geometry = Geometry::for_size(size);

    let mut canvas = RgbImage::from_pixel(size, size, palette.background);

    draw_ellipse(
        &mut canvas,
        geometry.outer_box(),
        palette.accent,
        palette.highlight,
        geometry.stroke,
    );

    // Must come second: it paints over the left part of the moon.
    draw_ellipse(
        &mut canvas,
        geometry.inner_box(),
        palette.background,
        palette.background,
        1,
    );

    Ok(canvas)
}

/// Fill the ellipse inscribed in `bbox`, with an outline band `width` pixels thick
///
/// A pixel is covered when its center lies inside the ellipse. Pixels outside the
/// canvas are clipped.
fn draw_ellipse(
    canvas: &mut RgbImage,
    bbox: BoundingBox,
    fill: Rgb<u8>,
    outline: Rgb<u8>,
    width: u32,
) {
    if bbox.is_empty() {
        return;
    }

    let center_x = (bbox.left + bbox.right + 1) as f32 / 2.0;
    let center_y = (bbox.top + bbox.bottom + 1) as f32 / 2.0;
    let radius_x = (bbox.right - bbox.left + 1) as f32 / 2.0;
    let radius_y = (bbox.bottom - bbox.top + 1) as f32 / 2.0;
    let inner_radius_x = radius_x - width as f32;
    let inner_radius_y = radius_y - width as f32;
    let has_interior = inner_radius_x > 0.0 && inner_radius_y > 0.0;

    let x_start = bbox.left.max(0);
    let x_end = bbox.right.min(canvas.width() as i32 - 1);
    let y_start = bbox.top.max(0);
    let y_end = bbox.bottom.min(canvas.height() as i32 - 1);

    for y in y_start..=y_end {
        for x in x_start..=x_end {
            let dx = x as f32 + 0.5 - center_x;
            let dy = y as f32 + 0.5 - center_y;

            if !within_ellipse(dx, dy, radius_x, radius_y) {
                continue;
            }

            let color = if has_interior && within_ellipse(dx, dy, inner_radius_x, inner_radius_y)
            {
                fill
            } else {
                outline
            };
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn within_ellipse(dx: f32, dy: f32, radius_x: f32, radius_y: f32) -> bool {
    let nx = dx / radius_x;
    let ny = dy / radius_y;
    nx * nx + ny * ny <= 1.0
}

/// Encode a canvas as PNG with the best compression
pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(canvas.as_raw(), &mut buf, canvas.width(), canvas.height())?;
    Ok(buf)
}

fn save_png(canvas: &RgbImage, path: &Path) -> Result<()> {
    let buf = encode_png(canvas)?;
    std::fs::write(path, buf).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(image_data, width, height, ColorType::Rgb8)
        .context("Failed to encode PNG")?;
    Ok(())
}

/// Write the manifest fragment referencing the rendered icons
fn write_manifest(out_dir: &Path, rendered: &[(u32, PathBuf)]) -> Result<()> {
    let mut manifest = ManifestIcons::new();

    for (size, path) in rendered {
        manifest.add_icon(*size, &extension_relative(path));
    }

    let manifest_path = out_dir.join(MANIFEST_FILENAME);
    manifest.write(&manifest_path)?;

    println!("Created {}", manifest_path.display());
    Ok(())
}

/// Path of a rendered icon as the extension manifest should reference it
///
/// Relative paths are kept. Absolute paths lose the current directory prefix;
/// outside of it only the output directory name and the file name remain.
fn extension_relative(path: &Path) -> PathBuf {
    if path.is_relative() {
        return path.components().filter(|c| *c != Component::CurDir).collect();
    }

    if let Some(relative) = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
    {
        return relative;
    }

    let file_name = path.file_name().map(PathBuf::from).unwrap_or_default();
    match path.parent().and_then(Path::file_name) {
        Some(dir) => Path::new(dir).join(file_name),
        None => file_name,
    }
}

/// Print the outcome of a run and return the process exit status
pub fn report<W: Write>(result: Result<(), GenerateError>, out: &mut W) -> u8 {
    // Console write failures can't be reported anywhere else.
    match result {
        Ok(()) => 0,
        Err(GenerateError::MissingCapability) => {
            for line in MISSING_CAPABILITY_GUIDANCE {
                let _ = writeln!(out, "{line}");
            }
            1
        }
        Err(GenerateError::Generation(e)) => {
            let _ = writeln!(out, "Error generating icons: {e:#}");
            1
        }
    }
}
