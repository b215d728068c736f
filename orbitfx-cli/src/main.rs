use std::cell::RefCell;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use orbitfx::{
    CpuSurface, HeroConfig, ManualClock, MarkerBoard, MarkerSink, Millis, OrbitEffect,
    RecordingSurface, Size, Stage, StarfieldEffect, StarfieldEngine, SystemClock, TextSink,
    TypewriterEffect, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "orbitfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render starfield frames and write the last one as a PNG.
    Frame(FrameArgs),
    /// Run the whole hero headlessly on a simulated clock and print a JSON summary.
    Simulate(SimulateArgs),
    /// Play the typewriter in the terminal in real time.
    Typewriter(TypewriterArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Optional hero config JSON; defaults reproduce the page.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Frames to render before capturing (rotation and comets advance per frame).
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Override the config seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1440)]
    width: u32,

    #[arg(long, default_value_t = 900)]
    height: u32,

    /// Simulated run length in milliseconds.
    #[arg(long, default_value_t = 5000.0)]
    duration_ms: f64,
}

#[derive(Parser, Debug)]
struct TypewriterArgs {
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wall-clock run length in milliseconds.
    #[arg(long, default_value_t = 15_000.0)]
    duration_ms: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Typewriter(args) => cmd_typewriter(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<HeroConfig> {
    let cfg = match path {
        Some(p) => HeroConfig::from_path(p)
            .with_context(|| format!("load hero config '{}'", p.display()))?,
        None => HeroConfig::default(),
    };
    Ok(cfg)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let viewport = Viewport::new(args.width, args.height)?;
    let seed = args.seed.unwrap_or(cfg.seed);

    let mut engine = StarfieldEngine::initialize(cfg.starfield, viewport, seed)?;
    let mut surface = CpuSurface::new(viewport)?;
    let interval = cfg.stage.frame_interval.0;
    for i in 0..args.frames.max(1) {
        engine.render_frame(Millis(f64::from(i) * interval), &mut surface);
    }
    let mut frame = surface.frame();
    frame.unpremultiply();

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

#[derive(Clone, Default)]
struct Transcript(Rc<RefCell<Vec<(f64, String)>>>);

struct StampedText {
    clock: ManualClock,
    transcript: Transcript,
}

impl TextSink for StampedText {
    fn set_text(&mut self, text: &str) {
        use orbitfx::Clock as _;
        self.transcript
            .0
            .borrow_mut()
            .push((self.clock.now().0, text.to_string()));
    }
}

#[derive(Clone)]
struct SharedBoard(Rc<RefCell<MarkerBoard>>);

impl MarkerSink for SharedBoard {
    fn marker_size(&self, id: &str) -> Option<Size> {
        self.0.borrow().marker_size(id)
    }

    fn apply_transform(&mut self, id: &str, transform: &str) {
        self.0.borrow_mut().apply_transform(id, transform);
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let viewport = Viewport::new(args.width, args.height)?;
    let clock = ManualClock::new();
    let mut stage = Stage::new(clock.clone(), viewport, cfg.stage);

    let stars = Rc::new(RefCell::new((0u64, 0u64, 0u64)));
    let stars_sink = Rc::clone(&stars);
    let starfield = StarfieldEffect::mount(
        Some(RecordingSurface::new(viewport)),
        cfg.starfield.clone(),
        cfg.seed,
    )
    .map(|fx| {
        fx.on_frame(move |stats, _| {
            let mut s = stars_sink.borrow_mut();
            s.0 += 1;
            s.1 += u64::from(stats.comet_spawned);
            s.2 += u64::from(stats.comets_retired);
        })
    });

    let board = SharedBoard(Rc::new(RefCell::new(MarkerBoard::for_config(
        &cfg.orbit,
        Size::new(64.0, 64.0),
    ))));
    let orbit = OrbitEffect::mount(Some(board.clone()), cfg.orbit.clone(), viewport);

    let transcript = Transcript::default();
    let text = StampedText {
        clock: clock.clone(),
        transcript: transcript.clone(),
    };
    let typewriter = TypewriterEffect::mount(Some(text), &cfg.typewriter);

    if let Some(fx) = starfield {
        stage.mount(Box::new(fx));
    }
    if let Some(fx) = orbit {
        stage.mount(Box::new(fx));
    }
    if let Some(fx) = typewriter {
        stage.mount(Box::new(fx));
    }

    let run = stage.run_until(Millis(args.duration_ms));
    stage.dispose();

    let (frames, spawned, retired) = *stars.borrow();
    let board = board.0.borrow();
    let orbit: serde_json::Map<String, serde_json::Value> = cfg
        .orbit
        .markers
        .iter()
        .map(|m| {
            let t = board.transform(&m.id).unwrap_or("none");
            (m.id.clone(), serde_json::Value::from(t))
        })
        .collect();
    let typed: Vec<serde_json::Value> = transcript
        .0
        .borrow()
        .iter()
        .map(|(t, s)| serde_json::json!({ "at_ms": t, "text": s }))
        .collect();

    let summary = serde_json::json!({
        "viewport": { "width": viewport.width, "height": viewport.height },
        "duration_ms": args.duration_ms,
        "stage": { "frames": run.frames, "timeouts": run.timeouts },
        "starfield": { "frames": frames, "comets_spawned": spawned, "comets_retired": retired },
        "orbit": { "writes": board.writes(), "transforms": orbit },
        "typewriter": typed,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

struct Terminal;

impl TextSink for Terminal {
    fn set_text(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        // Write errors (closed pipe) just end the animation output.
        let _ = write!(out, "\r\x1b[2K> {text}\u{2588}");
        let _ = out.flush();
    }
}

fn cmd_typewriter(args: TypewriterArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let viewport = Viewport::new(80, 24)?;
    let mut stage = Stage::new(SystemClock::new(), viewport, cfg.stage);
    let fx = TypewriterEffect::mount(Some(Terminal), &cfg.typewriter)
        .context("typewriter has nothing to type")?;
    let id = stage.mount(Box::new(fx));
    stage.run_until(Millis(args.duration_ms));
    stage.unmount(id);
    println!();
    Ok(())
}
