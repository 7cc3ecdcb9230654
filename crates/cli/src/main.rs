use anyhow::{anyhow, Context};
use battlemat::{
    render, Grid, GridConfig, GridOffset, MeasurePathWaypoint, Point,
    Rectangle, SnappingBehavior, SnappingMode,
};
use config::{Config, File};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs,
    path::{Path, PathBuf},
    process,
    str::FromStr,
};
use structopt::StructOpt;
use strum::EnumString;

/// CLI for querying battlemat grid geometry: path measurement, snapping,
/// and distance templates.
#[derive(Debug, StructOpt)]
#[structopt(name = "battlemat")]
struct Opt {
    /// Path to a config file that defines the grid. Supported formats:
    /// JSON, TOML. Defaults to a 100px/5ft square grid when omitted.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "warn")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Print the effective grid config in TOML format
    Config,
    /// Measure a path through a sequence of waypoints. Each waypoint is
    /// `i,j` (cell offset), optionally prefixed `t:` to mark a teleport.
    Measure { waypoints: Vec<WaypointArg> },
    /// Snap a pixel point to the nearest grid anchor
    Snap {
        x: f64,
        y: f64,
        /// Anchor classes to consider (repeatable). Defaults to center.
        #[structopt(long = "mode")]
        modes: Vec<AnchorClass>,
        /// Snap to a sub-grid this many times finer than the grid
        #[structopt(long, default_value = "1")]
        resolution: u32,
    },
    /// Outline of a circle template, as a JSON list of vertices
    Circle { x: f64, y: f64, radius: f64 },
    /// Outline of a cone template, as a JSON list of vertices
    Cone {
        x: f64,
        y: f64,
        radius: f64,
        /// Facing angle in degrees, 0 = east, clockwise
        direction: f64,
        /// Aperture in degrees
        angle: f64,
    },
    /// Render the grid mesh over a pixel area as an SVG file
    Render {
        width: f64,
        height: f64,
        output: PathBuf,
    },
}

/// A parsed waypoint argument: `i,j` or `t:i,j`
#[derive(Copy, Clone, Debug)]
struct WaypointArg(MeasurePathWaypoint);

impl FromStr for WaypointArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (teleport, coords) = match s.strip_prefix("t:") {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (i, j) = coords
            .split_once(',')
            .ok_or_else(|| anyhow!("expected `i,j`, got {:?}", s))?;
        let offset = GridOffset::new(
            i.trim().parse().context("invalid row")?,
            j.trim().parse().context("invalid column")?,
        );
        Ok(Self(MeasurePathWaypoint {
            coords: offset.into(),
            teleport,
        }))
    }
}

#[derive(Copy, Clone, Debug, EnumString)]
#[strum(serialize_all = "snake_case")]
enum AnchorClass {
    Center,
    Vertex,
    EdgeMidpoint,
}

impl From<AnchorClass> for SnappingMode {
    fn from(class: AnchorClass) -> Self {
        match class {
            AnchorClass::Center => SnappingMode::CENTER,
            AnchorClass::Vertex => SnappingMode::VERTEX,
            AnchorClass::EdgeMidpoint => SnappingMode::EDGE_MIDPOINT,
        }
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<GridConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let config = match &opt.config {
        Some(config_path) => {
            let config = load_config(config_path)?;
            info!("Loaded grid config from {:?}", config_path);
            config
        }
        None => GridConfig::default(),
    };
    let grid = Grid::new(config)?;

    match opt.command {
        Command::Config => {
            let rendered = toml::to_string_pretty(grid.config())
                // Panics only if the config format isn't serializable (a
                // bug)
                .expect("error serializing config");
            print!("{}", rendered);
        }
        Command::Measure { waypoints } => {
            let waypoints: Vec<MeasurePathWaypoint> =
                waypoints.iter().map(|arg| arg.0).collect();
            let result = grid.measure_path(&waypoints, None)?;
            println!("{}", result.to_json());
        }
        Command::Snap {
            x,
            y,
            modes,
            resolution,
        } => {
            let mode = if modes.is_empty() {
                SnappingMode::CENTER
            } else {
                modes
                    .into_iter()
                    .fold(SnappingMode::default(), |mode, class| {
                        mode | class.into()
                    })
            };
            let behavior = SnappingBehavior { mode, resolution };
            let snapped =
                grid.get_snapped_point(Point::new(x, y), &behavior)?;
            println!("{}", serde_json::to_string(&snapped)?);
        }
        Command::Circle { x, y, radius } => {
            let outline = grid.get_circle(Point::new(x, y), radius);
            println!("{}", serde_json::to_string(&outline)?);
        }
        Command::Cone {
            x,
            y,
            radius,
            direction,
            angle,
        } => {
            let outline =
                grid.get_cone(Point::new(x, y), radius, direction, angle);
            println!("{}", serde_json::to_string(&outline)?);
        }
        Command::Render {
            width,
            height,
            output,
        } => {
            let document = render::grid_to_svg(
                &grid,
                Rectangle::new(0.0, 0.0, width, height),
            );
            fs::write(&output, document.to_string()).with_context(
                || format!("error writing to file {:?}", &output),
            )?;
            info!("Wrote grid rendering to {:?}", &output);
        }
    }
    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
