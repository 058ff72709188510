use anyhow::Result;
use clap::Parser;
use pwa_icons::{font::DEFAULT_FONT_PATH, icon_gen};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "pwa-icons",
    about = "Generate the Progressive Web App icon set"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = icon_gen::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Icon sizes to generate, in pixels.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        default_values_t = icon_gen::DEFAULT_SIZES.to_vec(),
        value_parser = clap::value_parser!(u32).range(1..=i64::from(icon_gen::MAX_ICON_SIZE))
    )]
    sizes: Vec<u32>,

    /// Font file used for the label and caption. Falls back to a built-in font when missing.
    #[clap(long, value_name = "PATH", default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,

    /// Gradient color at the top of the icon (CSS color format)
    #[clap(long, default_value = "#6366f1")]
    from: String,

    /// Gradient color at the bottom of the icon (CSS color format)
    #[clap(long, default_value = "#4f46e5")]
    to: String,

    /// Also write manifest-icons.json with the web app manifest entries
    #[clap(long)]
    manifest: bool,

    /// URL of the icon directory used for manifest "src" entries (e.g. /static/icons).
    /// Defaults to the output directory when relative, or its last component when absolute.
    #[clap(long, value_name = "URL")]
    manifest_url: Option<String>,
}

impl From<Args> for icon_gen::Args {
    fn from(args: Args) -> Self {
        Self {
            output: args.output,
            sizes: args.sizes,
            font: args.font,
            from: args.from,
            to: args.to,
            manifest: args.manifest,
            manifest_url: args.manifest_url,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args.into())
}
