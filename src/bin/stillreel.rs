use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stillreel", version, about = "Turn a folder of images into an MP4 video")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode the images of a folder into `<output>/output_video.mp4` (requires `ffmpeg` on PATH).
    Convert(ConvertArgs),
    /// Print the images of a folder in the order they would be encoded.
    Order(OrderArgs),
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Read the whole request from a JSON file instead of flags.
    #[arg(
        long,
        conflicts_with_all = ["input", "output", "fps", "resolution", "sort", "descending"]
    )]
    request: Option<PathBuf>,

    /// Folder containing the images.
    #[arg(long = "input", short = 'i', required_unless_present = "request")]
    input: Option<PathBuf>,

    /// Folder receiving output_video.mp4.
    #[arg(long = "output", short = 'o', required_unless_present = "request")]
    output: Option<PathBuf>,

    /// Frames per second (presets: 5, 15, 30, 60; any positive integer is accepted).
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output resolution as WIDTHxHEIGHT (presets: 1080x720, 1920x1080).
    #[arg(long, default_value = "1920x1080", value_parser = parse_resolution)]
    resolution: stillreel::Resolution,

    #[command(flatten)]
    order: OrderFlags,
}

#[derive(Parser, Debug)]
struct OrderArgs {
    /// Folder containing the images.
    #[arg(long = "input", short = 'i')]
    input: PathBuf,

    #[command(flatten)]
    order: OrderFlags,
}

#[derive(clap::Args, Debug)]
struct OrderFlags {
    /// Sort images by.
    #[arg(long, value_enum, default_value_t = SortChoice::Name)]
    sort: SortChoice,

    /// Sort in descending order.
    #[arg(long)]
    descending: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortChoice {
    Name,
    Date,
    Size,
    Resolution,
}

impl From<SortChoice> for stillreel::SortKey {
    fn from(c: SortChoice) -> Self {
        match c {
            SortChoice::Name => Self::Name,
            SortChoice::Date => Self::Date,
            SortChoice::Size => Self::Size,
            SortChoice::Resolution => Self::Resolution,
        }
    }
}

fn parse_resolution(s: &str) -> Result<stillreel::Resolution, String> {
    s.parse().map_err(|e: stillreel::StillreelError| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Order(args) => cmd_order(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "stillreel=debug"
    } else {
        "stillreel=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_request(args: ConvertArgs) -> anyhow::Result<stillreel::ConversionRequest> {
    if let Some(path) = args.request {
        return stillreel::ConversionRequest::from_json_file(&path)
            .with_context(|| format!("load request '{}'", path.display()));
    }
    let input = args.input.context("--input is required")?;
    let output = args.output.context("--output is required")?;
    Ok(stillreel::ConversionRequest::new(input, output)
        .with_fps(args.fps)
        .with_resolution(args.resolution)
        .with_order(args.order.sort.into(), args.order.descending))
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let req = build_request(args)?;
    req.validate()?;

    match stillreel::convert(&req) {
        Ok(report) => {
            for s in &report.skipped {
                eprintln!("skipped {}: {}", s.path.display(), s.reason);
            }
            eprintln!(
                "wrote {} ({} frame(s) at {} fps, {})",
                report.output_path.display(),
                report.frames_written,
                req.fps,
                req.resolution
            );
            if report.is_partial() {
                eprintln!("{} image(s) could not be decoded", report.skipped.len());
            }
            Ok(())
        }
        Err(e) => {
            let kind = e.kind();
            Err(anyhow::Error::new(e).context(format!("conversion failed ({kind:?})")))
        }
    }
}

fn cmd_order(args: OrderArgs) -> anyhow::Result<()> {
    let images = stillreel::resolve_images(&args.input)?;
    if images.is_empty() {
        return Err(stillreel::StillreelError::NoImages {
            folder: args.input,
        }
        .into());
    }
    let ordered =
        stillreel::order_images(images, args.order.sort.into(), args.order.descending);
    for img in &ordered {
        println!("{}", img.path().display());
    }
    Ok(())
}
