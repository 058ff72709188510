use crate::font::{LabelFont, DEFAULT_FONT_PATH};
use crate::gradient::Gradient;
use crate::manifest::{default_url_prefix, IconManifest};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, RgbImage, Rgba,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Icon sizes of a standard PWA manifest
pub const DEFAULT_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];
pub const DEFAULT_OUTPUT_DIR: &str = "icons";
/// Largest icon edge accepted, in pixels
pub const MAX_ICON_SIZE: u32 = 16384;

const LABEL: &str = "SB";
const SUBTITLE: &str = "Billing";
const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 128]);

// Run configuration, filled in from the command line
#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
    pub sizes: Vec<u32>,
    pub font: PathBuf,
    pub from: String,
    pub to: String,
    pub manifest: bool,
    /// Site URL of the icon directory for manifest entries; derived from `output` when unset
    pub manifest_url: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sizes: DEFAULT_SIZES.to_vec(),
            font: PathBuf::from(DEFAULT_FONT_PATH),
            from: "#6366f1".to_string(),
            to: "#4f46e5".to_string(),
            manifest: false,
            manifest_url: None,
        }
    }
}

/// One icon to produce: its pixel size and where the PNG goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub output_path: PathBuf,
}

impl IconSpec {
    pub fn new(size: u32, out_dir: &Path) -> Self {
        Self {
            size,
            output_path: out_dir.join(Self::file_name(size)),
        }
    }

    pub fn file_name(size: u32) -> String {
        format!("icon-{size}x{size}.png")
    }
}

#[derive(Debug)]
pub struct IconGenerator {
    gradient: Gradient,
    font: LabelFont,
}

impl Default for IconGenerator {
    fn default() -> Self {
        Self::new(
            Gradient::default(),
            LabelFont::load_or_builtin(Path::new(DEFAULT_FONT_PATH)),
        )
    }
}

impl IconGenerator {
    pub fn new(gradient: Gradient, font: LabelFont) -> Self {
        Self { gradient, font }
    }

    /// Render one square icon: gradient background, shadowed "SB" label
    /// and a "Billing" caption in the lower quarter.
    pub fn create_icon(&self, size: u32) -> Result<RgbImage> {
        check_size(size)?;
        let side = size as i32;

        let mut canvas = RgbImage::new(size, size);
        self.gradient.fill(&mut canvas);

        // Label, centered and lifted by a tenth of the icon
        let label_px = size / 3;
        let bounds = self.font.measure(LABEL, label_px);
        let x = (side - bounds.width()).div_euclid(2);
        let y = (side - bounds.height()).div_euclid(2) - side / 10;

        let shadow = (side / 100).max(2);
        self.font
            .draw(&mut canvas, (x + shadow, y + shadow), LABEL, label_px, SHADOW_COLOR);
        self.font.draw(&mut canvas, (x, y), LABEL, label_px, TEXT_COLOR);

        let subtitle_px = size / 10;
        let bounds = self.font.measure(SUBTITLE, subtitle_px);
        let sx = (side - bounds.width()).div_euclid(2);
        let sy = side * 3 / 4;
        self.font
            .draw(&mut canvas, (sx, sy), SUBTITLE, subtitle_px, TEXT_COLOR);

        Ok(canvas)
    }

    /// Render every size into `out_dir`, returning how many files were written.
    /// The first failure aborts the batch; icons already written stay on disk.
    pub fn generate_all(&self, sizes: &[u32], out_dir: &Path) -> Result<usize> {
        for &size in sizes {
            check_size(size)?;
        }

        create_dir_all(out_dir).context("Can't create output directory")?;

        println!("Generating PWA icons...");
        for &size in sizes {
            let spec = IconSpec::new(size, out_dir);
            println!("Creating {}...", spec.output_path.display());
            let icon = self.create_icon(spec.size)?;
            save_png(&icon, &spec.output_path)?;
        }

        println!(
            "\n✓ Successfully generated {} icons in {}/",
            sizes.len(),
            display_dir(out_dir)
        );
        println!("\nIcon files created:");
        for &size in sizes {
            println!("  - {}", IconSpec::file_name(size));
        }

        Ok(sizes.len())
    }
}

/// Render the icon set with the stock colors and font
pub fn create_icon(size: u32) -> Result<RgbImage> {
    IconGenerator::default().create_icon(size)
}

pub fn generate_icons(args: Args) -> Result<()> {
    let gradient = Gradient::parse(&args.from, &args.to)?;

    let font = LabelFont::load_or_builtin(&args.font);
    if font.is_builtin() {
        println!(
            "Font {} not available, using the built-in font",
            args.font.display()
        );
    }

    let generator = IconGenerator::new(gradient, font);
    generator.generate_all(&args.sizes, &args.output)?;

    if args.manifest {
        let url_prefix = args
            .manifest_url
            .clone()
            .unwrap_or_else(|| default_url_prefix(&args.output));
        let manifest = IconManifest::for_sizes(&args.sizes, &url_prefix);
        let path = manifest.write(&args.output)?;
        println!("✓ Generated {}", path.display());
    }

    Ok(())
}

fn check_size(size: u32) -> Result<()> {
    if size == 0 {
        anyhow::bail!("Icon size must be greater than zero");
    }
    if size > MAX_ICON_SIZE {
        anyhow::bail!("Icon size {size} exceeds the maximum of {MAX_ICON_SIZE}");
    }
    Ok(())
}

/// Directory for messages that append their own "/": "out/" -> "out"
fn display_dir(dir: &Path) -> String {
    let shown = dir.display().to_string();
    let trimmed = shown.trim_end_matches(|c: char| c == '/' || c == '\\');
    if trimmed.is_empty() {
        shown.clone()
    } else {
        trimmed.to_string()
    }
}

fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_png(image.as_raw(), &mut writer, image.width(), image.height())
        .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

// Encode RGB data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgb8)?;
    Ok(())
}
