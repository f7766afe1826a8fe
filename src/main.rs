use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use canvas::geom::Point;
use canvas::input::PointerEvent;
use canvas::surface::Surface;
use clap::{Args, Parser, Subcommand};
use drawboard::{
    ClientConfig, ConfigError, ConnectionState, DrawingSession, DrawingView, FrameHandler,
    SnapshotClient, SnapshotError,
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("snapshot fetch failed: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("could not join drawing {drawing_id}: {reason}")]
    JoinFailed { drawing_id: String, reason: String },
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("surface buffer does not match its {width}x{height} dimensions")]
    SurfaceExport { width: u32, height: u32 },
}

#[derive(Parser, Debug)]
#[command(name = "drawboard", about = "Shared drawing surface client")]
struct Cli {
    /// Session server base URL (overrides DRAWBOARD_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Scheme for snapshot requests (overrides DRAWBOARD_SNAPSHOT_SCHEME).
    #[arg(long)]
    snapshot_scheme: Option<String>,

    /// Shape placed by pointer input, e.g. BIG_CIRCLE or SMALL_SQUARE.
    #[arg(long)]
    shape: Option<String>,

    /// Color placed by pointer input, e.g. BLUE or RED.
    #[arg(long)]
    color: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join a drawing, send pointer input, and draw what the server relays.
    Join(JoinArgs),
    /// Fetch a drawing snapshot from a snapshot authority.
    Snapshot(SnapshotArgs),
    /// Replay captured inbound frames onto a surface and export it.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct JoinArgs {
    drawing_id: String,

    #[arg(long, default_value = "-", help = "Pointer event JSONL path, or - for stdin")]
    input: String,

    #[arg(long, help = "Write the final surface as PNG")]
    out: Option<PathBuf>,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    origin_x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    origin_y: f64,

    #[arg(long, default_value_t = false, help = "Keep drawing after the input is exhausted")]
    linger: bool,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    drawing_id: String,

    #[arg(long, help = "Snapshot authority as host:port")]
    location: String,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long, default_value = "-", help = "Frame JSONL path, or - for stdin")]
    input: String,

    #[arg(long)]
    out: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Join(args) => run_join(config, args).await,
        Command::Snapshot(args) => run_snapshot(&config, args).await,
        Command::Render(args) => run_render(&config, args),
    }
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.set_base_url(base_url)?;
    }
    if let Some(scheme) = &cli.snapshot_scheme {
        config.set_snapshot_scheme(scheme)?;
    }
    if let Some(shape) = &cli.shape {
        config.tool.shape_type = shape.trim().into();
    }
    if let Some(color) = &cli.color {
        config.tool.shape_color = color.trim().into();
    }
    if let Some(width) = cli.width {
        config.surface_width = width;
    }
    if let Some(height) = cli.height {
        config.surface_height = height;
    }
    if !config.tool.shape_type.is_known() {
        warn!(shape = %config.tool.shape_type, "shape type is not drawable; peers will ignore it");
    }
    Ok(config)
}

async fn run_join(config: ClientConfig, args: JoinArgs) -> Result<(), CliError> {
    let mut session = DrawingSession::enter(config, &args.drawing_id).await;
    if session.state() == ConnectionState::Closed {
        let reason = session
            .connection()
            .error()
            .map_or_else(|| "connection closed".to_owned(), ToString::to_string);
        return Err(CliError::JoinFailed { drawing_id: args.drawing_id, reason });
    }
    if let Some(view) = session.view_mut() {
        view.set_origin(Point::new(args.origin_x, args.origin_y));
    }

    let mut lines = open_async_input(&args.input).await?.lines();
    let mut input_open = true;
    let mut sent = 0_usize;
    let mut skipped = 0_usize;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            alive = session.step() => {
                if !alive {
                    info!("session ended by server");
                    break;
                }
            }
            line = lines.next_line(), if input_open => match line? {
                Some(line) => match parse_pointer_line(&line) {
                    Some(event) => {
                        if session.pointer(&event).await {
                            sent = sent.saturating_add(1);
                        }
                    }
                    None => skipped = skipped.saturating_add(1),
                },
                None => {
                    input_open = false;
                    if !args.linger {
                        break;
                    }
                }
            },
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }
    }

    let Some(view) = session.teardown().await else {
        return Ok(());
    };
    let stats = view.stats();
    eprintln!(
        "join complete: drawing_id={} sent={} skipped={} rendered={} ignored={} rejected={} relocations={}",
        args.drawing_id, sent, skipped, stats.rendered, stats.ignored, stats.rejected, stats.relocations
    );
    if let Some(snapshot) = view.snapshot() {
        print_json(snapshot)?;
    }
    if let Some(out) = &args.out {
        write_png(view.surface(), out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

async fn run_snapshot(config: &ClientConfig, args: SnapshotArgs) -> Result<(), CliError> {
    let json = SnapshotClient::new()
        .fetch_drawing(config, &args.location, &args.drawing_id)
        .await?;
    print_json(&json)?;
    Ok(())
}

fn run_render(config: &ClientConfig, args: RenderArgs) -> Result<(), CliError> {
    let mut view = DrawingView::new("replay", config);
    replay_frames(&mut view, open_input(&args.input)?)?;

    write_png(view.surface(), &args.out)?;
    let stats = view.stats();
    eprintln!(
        "render complete: rendered={} ignored={} rejected={} relocations={} out={}",
        stats.rendered,
        stats.ignored,
        stats.rejected,
        stats.relocations,
        args.out.display()
    );
    Ok(())
}

/// Feed wire frames to `view`. There is no session to fetch snapshots, so
/// relocations are reported and dropped as they arrive.
fn replay_frames(view: &mut DrawingView, mut reader: impl BufRead) -> Result<(), CliError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }
        view.on_frame(frame);
        while let Some(relocation) = view.take_relocation() {
            info!(location = %relocation.sse_location, "relocation skipped in offline replay");
        }
    }
}

fn parse_pointer_line(line: &str) -> Option<PointerEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    match serde_json::from_str::<PointerEvent>(trimmed) {
        Ok(event) => Some(event),
        Err(error) => {
            warn!(%error, line = trimmed, "skipping unreadable pointer event");
            None
        }
    }
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, CliError> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

async fn open_async_input(
    path: &str,
) -> Result<tokio::io::BufReader<Box<dyn AsyncRead + Unpin + Send>>, CliError> {
    let reader: Box<dyn AsyncRead + Unpin + Send> = if path == "-" {
        Box::new(tokio::io::stdin())
    } else {
        Box::new(tokio::fs::File::open(path).await?)
    };
    Ok(tokio::io::BufReader::new(reader))
}

fn write_png(surface: &Surface, path: &Path) -> Result<(), CliError> {
    let (width, height) = (surface.width(), surface.height());
    let image = image::RgbaImage::from_raw(width, height, surface.to_rgba_bytes())
        .ok_or(CliError::SurfaceExport { width, height })?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
