use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use reelkit::{
    AnimationRegistry, Composition, CpuBackendOpts, FfmpegSink, FfmpegSinkOpts, FrameIndex,
    PrimitiveKind, RenderSession, RenderSessionOpts, write_png,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelkit", version, about = "Render animation templates and timelines")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered templates.
    List(ListArgs),
    /// Print a template's (or primitive's) schema and default props as JSON.
    Schema(SchemaArgs),
    /// Resolve a composition and report its items.
    Validate(ValidateArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Only show templates in this category.
    #[arg(long)]
    category: Option<String>,
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    /// Template id (e.g. `Fade`) or primitive type (`solid`, `text`, `video`, `voice`).
    id: String,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file used for all text.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Font file used for all text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per render chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Render identical frames once per chunk.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,

    /// Skip audio mixing.
    #[arg(long, default_value_t = false)]
    no_audio: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = AnimationRegistry::with_builtin_templates();
    match cli.cmd {
        Command::List(args) => cmd_list(&registry, args),
        Command::Schema(args) => cmd_schema(&registry, args),
        Command::Validate(args) => cmd_validate(&registry, args),
        Command::Frame(args) => cmd_frame(&registry, args),
        Command::Render(args) => cmd_render(&registry, args),
    }
}

fn cmd_list(registry: &AnimationRegistry, args: ListArgs) -> anyhow::Result<()> {
    let entries = match args.category.as_deref() {
        Some(c) => registry.by_category(c),
        None => registry.iter().collect(),
    };
    for e in entries {
        println!(
            "{}\t{}\t{}",
            e.id,
            e.category.as_deref().unwrap_or("-"),
            e.name
        );
    }
    Ok(())
}

fn cmd_schema(registry: &AnimationRegistry, args: SchemaArgs) -> anyhow::Result<()> {
    let doc = if let Some(entry) = registry.get(&args.id) {
        serde_json::json!({
            "id": entry.id,
            "name": entry.name,
            "description": entry.description,
            "category": entry.category,
            "schema": entry.schema.to_json(),
            "defaultProps": entry.default_props,
        })
    } else if let Some(kind) = PrimitiveKind::from_type(&args.id) {
        let schema = kind.schema();
        serde_json::json!({
            "id": kind.tag(),
            "primitive": true,
            "schema": schema.to_json(),
            "defaultProps": schema.default_props(),
        })
    } else {
        anyhow::bail!("no template or primitive named '{}'", args.id);
    };
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_validate(registry: &AnimationRegistry, args: ValidateArgs) -> anyhow::Result<()> {
    let sess = open_session(registry, &args.in_path, RenderSessionOpts::default())?;
    let canvas = sess.canvas();
    println!(
        "ok: {} frames at {} fps, {}x{}",
        sess.duration_frames(),
        sess.fps(),
        canvas.width,
        canvas.height
    );
    for item in sess.items() {
        println!(
            "  [{}] {} ({}) frames {}..{}",
            item.track_index, item.id, item.type_name, item.from, item.end
        );
    }
    Ok(())
}

fn cmd_frame(registry: &AnimationRegistry, args: FrameArgs) -> anyhow::Result<()> {
    let sess = open_session(registry, &args.in_path, RenderSessionOpts::default())?;
    let frame = sess.render_frame(FrameIndex(args.frame), &backend_opts(args.font))?;
    write_png(&frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(registry: &AnimationRegistry, args: RenderArgs) -> anyhow::Result<()> {
    let opts = RenderSessionOpts {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        static_frame_elision: args.static_frame_elision,
        enable_audio: !args.no_audio,
        ..RenderSessionOpts::default()
    };
    let sess = open_session(registry, &args.in_path, opts)?;

    let mut sink_opts = FfmpegSinkOpts::new(&args.out);
    sink_opts.overwrite = !args.no_overwrite;
    let mut sink = FfmpegSink::new(sink_opts);

    let stats = sess.render_all(&backend_opts(args.font), &mut sink)?;
    eprintln!(
        "wrote {} ({} frames, {} rendered, {} elided)",
        args.out.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn open_session(
    registry: &AnimationRegistry,
    in_path: &Path,
    opts: RenderSessionOpts,
) -> anyhow::Result<RenderSession> {
    let comp = Composition::from_path(in_path)
        .with_context(|| format!("load composition '{}'", in_path.display()))?;
    let assets_root = in_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    RenderSession::new(&comp, registry, assets_root, opts)
        .with_context(|| format!("resolve composition '{}'", in_path.display()))
}

fn backend_opts(font: Option<PathBuf>) -> CpuBackendOpts {
    CpuBackendOpts {
        clear_rgba: Some([0, 0, 0, 255]),
        font_path: font,
    }
}
