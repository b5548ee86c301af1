//! CLI binary for figure-composer.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RenderConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use figure_composer::{
    export_diagram, export_diagram_image, export_raster, export_raster_image, AxisLabels, Color,
    Design, DiagramBackend, IdStrategy, OutputKind, ProgressCallback, RenderConfig, RenderProgressCallback,
    RenderSummary,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Terminal progress callback: a live bar plus one log line per image.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-image wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    /// Spinner only; the bar length is set by `on_render_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Loading images…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }

    /// Hide the bar if rendering failed before `on_render_complete`.
    fn abandon(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl RenderProgressCallback for CliProgressCallback {
    fn on_render_start(&self, total: usize) {
        self.activate_bar(total);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Rendering {total} images…"))
        ));
    }

    fn on_image_start(&self, index: usize, _total: usize) {
        if let Ok(mut times) = self.start_times.lock() {
            times.insert(index, Instant::now());
        }
        self.bar.set_message(format!("image {}", index + 1));
    }

    fn on_image_complete(&self, index: usize, total: usize) {
        let elapsed_ms = self
            .start_times
            .lock()
            .ok()
            .and_then(|mut times| times.remove(&index))
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format!("{elapsed_ms}ms")),
        ));
        self.bar.inc(1);
    }

    fn on_render_complete(&self, _total: usize) {
        self.bar.finish_and_clear();
    }
}

// ── CLI definition ───────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Row of panels labelled a, b, c… with a 10px black border
  figcomp panels/ -o figure.png

  # 2-column grid, upper-case badges bottom-right, red borders
  figcomp panels/ -o figure.png --layout grid --cols 2 \
      --label latin_upper --label-pos bottom-right --border-color red

  # Editable draw.io diagram with axes on every panel
  figcomp panels/ -o figure.drawio --axes --axis-labels "t,V"

  # Reproducible diagram (stable cell ids)
  figcomp panels/ -o figure.drawio --deterministic-ids

  # Only the third panel, decorated
  figcomp panels/ -o panel-c.png --index 2

  # Print the layout plan as JSON without rendering
  figcomp panels/ --plan

LABEL SOURCES:
  latin_lower (a b c)   latin_upper (A B C)   cyrillic_lower (а б в)
  cyrillic_upper        arabic (1 2 3)        roman (I II III)
  Any other text is drawn as-is on every panel; --labels gives one per panel.

ENVIRONMENT VARIABLES:
  FIGCOMP_OUTPUT       Default output path
  FIGCOMP_LAYOUT       Default layout (row, column, grid)
  FIGCOMP_BORDER       Default border width(s)
  FIGCOMP_LABEL        Default label source
  FIGCOMP_FONT         Default font family
  FIGCOMP_FONTS_DIR    Directory searched for <family>.ttf/.otf
  FONT_LOCATE_DIR      Extra fonts directory (searched after --fonts-dir)
  RUST_LOG             Log filter (overrides -v / -q)
"#;

#[derive(Parser, Debug)]
#[command(
    name = "figcomp",
    version,
    about = "Compose annotated multi-panel figures as PNG/JPEG or draw.io diagrams",
    long_about = "Compose a directory of images into one figure.\n\n\
        Each image gets an optional resize, a border, a corner badge (a, B, IV, …) \
        and optional axis arrows, then all images are laid out in a row, a column \
        or a grid. The output is a bitmap or an editable .drawio document whose \
        cells line up with the bitmap.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
)]
struct Cli {
    /// Directory of *.png / *.jpg / *.jpeg images
    #[arg(required_unless_present = "list_fonts")]
    input: Option<PathBuf>,

    /// Output file; `.drawio` / `.xml` selects the diagram backend
    #[arg(short, long, env = "FIGCOMP_OUTPUT", default_value = "figure.png")]
    output: PathBuf,

    /// Force the output kind instead of inferring it from the extension
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    // ── Layout ──
    /// row, column or grid
    #[arg(long, env = "FIGCOMP_LAYOUT", default_value = "row")]
    layout: String,

    /// Gap between images in pixels
    #[arg(long, default_value_t = 10)]
    spacing: u32,

    /// Canvas colour: name, #rgb, #rrggbb or r,g,b
    #[arg(long, default_value = "white")]
    background: String,

    /// Grid columns
    #[arg(long)]
    cols: Option<u32>,

    /// Grid rows
    #[arg(long)]
    rows: Option<u32>,

    // ── Resize ──
    /// Resize every image to this width (keeps aspect if --height is unset)
    #[arg(long)]
    width: Option<u32>,

    /// Resize every image to this height (keeps aspect if --width is unset)
    #[arg(long)]
    height: Option<u32>,

    // ── Border ──
    /// One width for all sides, or left,top,right,bottom
    #[arg(long, env = "FIGCOMP_BORDER", default_value = "10")]
    border: String,

    #[arg(long, default_value = "black")]
    border_color: String,

    // ── Label ──
    /// Draw no badge
    #[arg(long)]
    no_label: bool,

    /// Label mode name, or fixed text for every image
    #[arg(long, env = "FIGCOMP_LABEL", default_value = "latin_lower")]
    label: String,

    /// Comma-separated labels, one per image (overrides --label)
    #[arg(long)]
    labels: Option<String>,

    /// top-left, top-right, bottom-left or bottom-right
    #[arg(long, default_value = "top-left")]
    label_pos: String,

    /// Badge size as WxH
    #[arg(long, default_value = "40x40")]
    badge_size: String,

    #[arg(long, default_value = "black")]
    badge_color: String,

    #[arg(long, default_value = "white")]
    label_color: String,

    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    label_font_size: u32,

    // ── Axes ──
    /// Draw X/Y axis arrows on every image
    #[arg(long)]
    axes: bool,

    /// Axis labels as X,Y for every image
    #[arg(long, default_value = "X,Y")]
    axis_labels: String,

    /// Comma-separated X labels, one per image (with --axis-y-labels)
    #[arg(long, requires = "axis_y_labels")]
    axis_x_labels: Option<String>,

    /// Comma-separated Y labels, one per image (with --axis-x-labels)
    #[arg(long, requires = "axis_x_labels")]
    axis_y_labels: Option<String>,

    /// Axis origin offset from the bottom-left corner: N or X,Y
    #[arg(long, default_value = "20")]
    axis_offset: String,

    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    axis_length: u32,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    axis_width: u32,

    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    axis_font_size: u32,

    #[arg(long, default_value = "black")]
    axis_color: String,

    // ── Fonts ──
    /// Font family for labels (falls back to Arial, then a built-in font)
    #[arg(long, env = "FIGCOMP_FONT", default_value = "Arial")]
    font: String,

    /// Directory searched first for <family>.ttf / .otf
    #[arg(long, env = "FIGCOMP_FONTS_DIR")]
    fonts_dir: Option<PathBuf>,

    /// List font families found in the fonts directory and exit
    #[arg(long)]
    list_fonts: bool,

    // ── Output modes ──
    /// Use sequential cell ids so repeated exports are byte-identical
    #[arg(long)]
    deterministic_ids: bool,

    /// Export only the decorated image at this 0-based index
    #[arg(long)]
    index: Option<usize>,

    /// Print the layout plan as JSON and exit
    #[arg(long)]
    plan: bool,

    /// Print the render summary as JSON
    #[arg(long)]
    json: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Raster,
    Diagram,
}

impl From<FormatArg> for OutputKind {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Raster => OutputKind::Raster,
            FormatArg::Diagram => OutputKind::Diagram,
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.plan;
    let filter = if cli.quiet || show_progress {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    if cli.list_fonts {
        return list_fonts(cli.fonts_dir.as_deref());
    }

    let input = cli
        .input
        .as_deref()
        .context("An input directory is required")?;
    let config = build_config(&cli)?;

    let progress = show_progress.then(CliProgressCallback::new_dynamic);
    let mut design = Design::from_dir(input, config)
        .with_context(|| format!("Failed to load images from {}", input.display()))?;
    if let Some(cb) = &progress {
        design = design.with_progress(cb.clone() as ProgressCallback);
    }

    if cli.plan {
        let plan = design.plan().context("Failed to plan layout")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("Failed to serialise plan")?
        );
        return Ok(());
    }

    let result = render(&cli, &design, progress.clone());
    if let Some(cb) = &progress {
        cb.abandon();
    }
    let summary = result?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}").context("Failed to write to stdout")?;
    } else if !cli.quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn render(
    cli: &Cli,
    design: &Design,
    progress: Option<Arc<CliProgressCallback>>,
) -> Result<RenderSummary> {
    let kind = cli
        .format
        .map(OutputKind::from)
        .unwrap_or_else(|| OutputKind::from_path(&cli.output));
    let out = &cli.output;

    let summary = match kind {
        OutputKind::Raster => match cli.index {
            Some(i) => export_raster_image(design, i, out),
            None => export_raster(design, out),
        },
        OutputKind::Diagram => {
            let ids = if cli.deterministic_ids {
                IdStrategy::Sequential
            } else {
                IdStrategy::Random
            };
            let mut backend = DiagramBackend::new().with_id_strategy(ids);
            if let Some(cb) = progress {
                backend = backend.with_progress(cb as ProgressCallback);
            }
            match cli.index {
                Some(i) => export_diagram_image(design, &backend, i, out),
                None => export_diagram(design, &backend, out),
            }
        }
    };
    summary.with_context(|| format!("Failed to write {}", out.display()))
}

fn print_summary(s: &RenderSummary) {
    let layout = s
        .layout
        .map(|l| format!("{l} layout"))
        .unwrap_or_else(|| "single image".to_string());
    eprintln!(
        "{}  {} image(s), {}  {}x{}  {}ms  →  {}",
        green("✔"),
        s.images,
        layout,
        s.width,
        s.height,
        s.duration_ms,
        bold(&s.output.display().to_string())
    );
}

fn list_fonts(dir: Option<&Path>) -> Result<()> {
    let dir = match dir.map(Path::to_path_buf).or_else(font_locate::fonts_dir) {
        Some(d) => d,
        None => bail!("No fonts directory: pass --fonts-dir or set FONT_LOCATE_DIR"),
    };
    let families = font_locate::available_families(&dir)
        .with_context(|| format!("Failed to list fonts in {}", dir.display()))?;
    let mut stdout = io::stdout().lock();
    for family in families {
        writeln!(stdout, "{family}").context("Failed to write to stdout")?;
    }
    Ok(())
}

// ── Config mapping ───────────────────────────────────────────────────────────

fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let mut c = RenderConfig::default();

    c.set_layout_name(&cli.layout).context("Invalid --layout")?;
    c.set_spacing(cli.spacing);
    c.set_background(parse_color(&cli.background, "--background")?)?;
    c.set_grid(cli.cols, cli.rows).context("Invalid --cols/--rows")?;
    c.set_resize(cli.width, cli.height)
        .context("Invalid --width/--height")?;

    match parse_numbers(&cli.border, "--border")?.as_slice() {
        [width] => c.set_border(*width),
        sides => c.set_border(sides),
    }
    .context("Invalid --border")?;
    c.set_border_fill(parse_color(&cli.border_color, "--border-color")?)?;

    c.set_label_enabled(!cli.no_label);
    match &cli.labels {
        Some(list) => c.set_label_source(split_list(list)),
        None => c.set_label_source(cli.label.as_str()),
    }
    c.set_label_corner_name(&cli.label_pos)
        .context("Invalid --label-pos")?;
    c.set_badge_size(parse_numbers(&cli.badge_size, "--badge-size")?.as_slice())
        .context("Invalid --badge-size")?;
    c.set_badge_fill(parse_color(&cli.badge_color, "--badge-color")?)?;
    c.set_label_color(parse_color(&cli.label_color, "--label-color")?)?;
    c.set_label_font_size(cli.label_font_size)?;

    c.set_axes_enabled(cli.axes);
    let axis_labels = match (&cli.axis_x_labels, &cli.axis_y_labels) {
        (Some(x), Some(y)) => AxisLabels::PerImage {
            x: split_list(x),
            y: split_list(y),
        },
        _ => match cli.axis_labels.split_once(',') {
            Some((x, y)) => AxisLabels::global(x.trim(), y.trim()),
            None => bail!("Invalid --axis-labels '{}': expected X,Y", cli.axis_labels),
        },
    };
    c.set_axis_labels(axis_labels);
    c.set_axis_offset(parse_numbers(&cli.axis_offset, "--axis-offset")?.as_slice())
        .context("Invalid --axis-offset")?;
    c.set_axis_length(cli.axis_length)?;
    c.set_axis_width(cli.axis_width)?;
    c.set_axis_font_size(cli.axis_font_size)?;
    c.set_axis_color(parse_color(&cli.axis_color, "--axis-color")?)?;

    c.set_fonts_dir(cli.fonts_dir.clone());
    c.set_font_family(&cli.font);

    c.validate().context("Invalid configuration")?;
    Ok(c)
}

/// Parse "10", "5,5,5,5" or "40x30" into numbers.
fn parse_numbers(s: &str, flag: &str) -> Result<Vec<u32>> {
    s.split([',', 'x', 'X'])
        .map(|part| {
            let part = part.trim();
            part.parse::<u32>()
                .with_context(|| format!("Invalid {flag} value '{part}' in '{s}'"))
        })
        .collect()
}

/// Colour flag: a name, `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a bare `r,g,b`.
fn parse_color(s: &str, flag: &str) -> Result<Color> {
    let t = s.trim();
    let color = if t.contains(',') && !t.starts_with("rgb(") {
        let comps = t
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<i64>()
                    .with_context(|| format!("Invalid {flag} component '{part}' in '{s}'"))
            })
            .collect::<Result<Vec<i64>>>()?;
        Color::try_from(comps.as_slice())
    } else {
        Color::parse(t)
    };
    color.with_context(|| format!("Invalid {flag}"))
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(|p| p.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figure_composer::BorderInsets;

    fn cli(args: &[&str]) -> Cli {
        let argv = ["figcomp", "panels"].iter().chain(args).copied();
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn default_flags_build_a_config() {
        let config = build_config(&cli(&[])).unwrap();
        assert_eq!(config.border(), BorderInsets::uniform(10));
        assert_eq!(config.border_fill(), &Color::black());
        assert_eq!(config.layout().background, Color::white());
    }

    #[test]
    fn border_single_or_four_values() {
        let config = build_config(&cli(&["--border", "3"])).unwrap();
        assert_eq!(config.border(), BorderInsets::uniform(3));

        let config = build_config(&cli(&["--border", "1,2,3,4"])).unwrap();
        assert_eq!(config.border(), BorderInsets::from([1, 2, 3, 4]));

        assert!(build_config(&cli(&["--border", "1,2,3"])).is_err());
        assert!(build_config(&cli(&["--border", "wide"])).is_err());
    }

    #[test]
    fn colour_flags_accept_every_documented_form() {
        let config = build_config(&cli(&[
            "--border",
            "1",
            "--background",
            "1,2,3",
            "--border-color",
            "#ff0000",
            "--badge-color",
            "rgb(0, 0, 255)",
            "--axis-color",
            " 10 , 20 , 30 ",
        ]))
        .unwrap();
        assert_eq!(config.layout().background, Color::Rgb(1, 2, 3));
        assert_eq!(config.border_fill(), &Color::Rgb(255, 0, 0));
        assert_eq!(config.label().badge_fill, Color::Rgb(0, 0, 255));
        assert_eq!(config.axes().color, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn bad_colour_flags_rejected() {
        assert!(build_config(&cli(&["--border", "1", "--background", "1,2"])).is_err());
        assert!(build_config(&cli(&["--border", "1", "--background", "1,2,300"])).is_err());
        assert!(build_config(&cli(&["--border", "1", "--label-color", "blurple"])).is_err());
    }

    #[test]
    fn number_lists() {
        assert_eq!(parse_numbers("40x30", "--badge-size").unwrap(), vec![40, 30]);
        assert_eq!(parse_numbers("5, 6", "--axis-offset").unwrap(), vec![5, 6]);
        assert!(parse_numbers("5,,6", "--axis-offset").is_err());
    }
}
