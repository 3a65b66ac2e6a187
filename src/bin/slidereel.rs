use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slidereel", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a request to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame of a request as a PNG.
    Frame(FrameArgs),
    /// Print the subtitle chunk plan of a request as JSON.
    Chunks(ChunksArgs),
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Render request JSON.
    #[arg(long)]
    request: PathBuf,

    /// Directory asset references are resolved against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Render config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subtitle font file (overrides the config).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Disable the accelerated resizer.
    #[arg(long, default_value_t = false)]
    no_accel: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Output root; the video lands under `<out>/outputs/<projectId>/video/`.
    #[arg(long, default_value = "public")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ChunksArgs {
    /// Render request JSON.
    #[arg(long)]
    request: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Chunks(args) => cmd_chunks(args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn read_request(path: &Path) -> anyhow::Result<slidereel::RenderRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read request '{}'", path.display()))?;
    Ok(slidereel::RenderRequest::from_json(&text)?)
}

fn load_config(args: &JobArgs) -> anyhow::Result<slidereel::RenderConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => slidereel::RenderConfig::from_path(path)?,
        None => slidereel::RenderConfig::default(),
    };
    if let Some(font) = &args.font {
        config.font_path = Some(font.clone());
    }
    if args.no_accel {
        config.accel.enabled = false;
    }
    if args.threads.is_some() {
        config.threading.threads = args.threads;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let request = read_request(&args.job.request)?;
    let config = load_config(&args.job)?;
    let resolver = slidereel::FsResolver::new(&args.job.assets);
    let cancel = slidereel::CancelToken::new();

    let output = slidereel::render_request(&request, &resolver, &config, &args.out, &cancel)
        .with_context(|| format!("render project '{}'", request.project_id))?;

    eprintln!(
        "wrote {} ({} frames)",
        output.path.display(),
        output.stats.frames_rendered
    );
    println!("{}", output.public_ref);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let request = read_request(&args.job.request)?;
    let config = load_config(&args.job)?;
    let resolver = slidereel::FsResolver::new(&args.job.assets);
    let cancel = slidereel::CancelToken::new();

    let font = slidereel::require_subtitle_font(&request.subtitles, &config)?;
    let prepared = slidereel::prepare_inputs(&request, &resolver, &config)?;
    let renderer = slidereel::Renderer::new(&config.threading)?;
    let timeline = slidereel::build_timeline(&prepared, &config, font, &renderer, &cancel)?;
    let compositor = slidereel::Compositor::new(&timeline);
    let total = compositor.frame_count();
    if args.frame >= total {
        anyhow::bail!("frame {} is out of range (timeline has {total} frames)", args.frame);
    }
    let frame = compositor.frame(slidereel::FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let straight = slidereel::unpremultiply_rgba8(&frame.data);
    image::save_buffer_with_format(
        &args.out,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_chunks(args: ChunksArgs) -> anyhow::Result<()> {
    let request = read_request(&args.request)?;
    let chunks = slidereel::plan_chunks(&request.subtitles);
    let json = serde_json::to_string_pretty(&chunks).context("serialize chunk plan")?;
    println!("{json}");
    Ok(())
}
