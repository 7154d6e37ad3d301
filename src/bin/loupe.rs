use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use loupe::Mixer2 as _;

#[derive(Parser, Debug)]
#[command(name = "loupe", version, about = "Animated magnifying-lens effect for still frames")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render evenly spaced time values as numbered PNGs.
    Sequence(SequenceArgs),
    /// List the registered parameters, or print the defaults as JSON.
    Params(ParamsArgs),
}

#[derive(Args, Debug)]
struct ParamSource {
    /// Parameter JSON (missing fields keep their defaults).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Override a registered parameter, e.g. `--set region0_enable=true`. Repeatable.
    #[arg(long = "set", value_name = "ID=VALUE")]
    assignments: Vec<String>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input PNG (the frame being magnified).
    #[arg(long)]
    input: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    output: PathBuf,

    /// Host time value.
    #[arg(long)]
    time: f64,

    #[command(flatten)]
    source: ParamSource,

    /// Print the computed fade and region geometry as JSON.
    #[arg(long)]
    dump_plan: bool,
}

#[derive(Args, Debug)]
struct SequenceArgs {
    /// Input PNG (the frame being magnified).
    #[arg(long)]
    input: PathBuf,

    /// Directory receiving `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames.
    #[arg(long)]
    frames: usize,

    /// Time value of the first frame.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Time value of the last frame.
    #[arg(long, default_value_t = 1.0)]
    end: f64,

    /// Render frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    source: ParamSource,
}

#[derive(Args, Debug)]
struct ParamsArgs {
    /// Print the default parameter set as JSON instead of the registry table.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Params(args) => cmd_params(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_params(source: &ParamSource) -> anyhow::Result<loupe::EffectParameters> {
    let mut params = match &source.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read parameters '{}'", path.display()))?;
            loupe::EffectParameters::from_json_str(&text)
                .with_context(|| format!("parse parameters '{}'", path.display()))?
        }
        None => loupe::EffectParameters::default(),
    };
    for assignment in &source.assignments {
        params
            .apply_assignment(assignment)
            .with_context(|| format!("apply --set {assignment}"))?;
    }
    Ok(params)
}

fn read_png(path: &Path) -> anyhow::Result<loupe::FrameBuffer> {
    let img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    let canvas = loupe::Canvas::new(img.width(), img.height())?;
    Ok(loupe::FrameBuffer::from_straight_rgba8(canvas, img.as_raw())?)
}

fn write_png(path: &Path, frame: &loupe::FrameBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.canvas().width,
        frame.canvas().height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let params = load_params(&args.source)?;
    let input = read_png(&args.input)?;
    let mut effect = loupe::Loupe::with_params(input.canvas(), params);

    if args.dump_plan {
        let plan = effect.plan(args.time);
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }

    let mut out = loupe::FrameBuffer::new(input.canvas());
    effect.update(args.time, &mut out.view_mut(), &input.view(), &input.view())?;
    write_png(&args.output, &out)?;

    eprintln!("wrote {}", args.output.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    if args.frames == 0 {
        anyhow::bail!("--frames must be > 0");
    }
    let params = load_params(&args.source)?;
    let input = read_png(&args.input)?;
    let effect = loupe::Loupe::with_params(input.canvas(), params);

    let times = loupe::sample_times(args.start, args.end, args.frames);
    let threading = loupe::SequenceThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let frames = loupe::render_sequence(&effect, &input, &times, &threading)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        write_png(&args.out_dir.join(format!("frame_{i:05}.png")), frame)?;
    }

    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}

fn cmd_params(args: ParamsArgs) -> anyhow::Result<()> {
    let defaults = loupe::EffectParameters::default();
    if args.json {
        println!("{}", defaults.to_json_string()?);
        return Ok(());
    }

    for info in loupe::param_infos() {
        let value = defaults.get_param(info.index)?;
        println!(
            "{:>2}  {:<24} {:<9} {:<32} default={}",
            info.index,
            info.identifier,
            format!("{:?}", info.kind),
            info.label,
            value
        );
        println!("    {}", info.description);
    }
    Ok(())
}
