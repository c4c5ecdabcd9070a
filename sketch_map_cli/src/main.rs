use std::fs::File;

use clap::{Parser, Subcommand};
use sketch_map::{
    config::{read_config_json, write_config_json},
    crs::Crs,
    geometry::SketchGeometry,
    graphics::{GraphicGeometry, GraphicKind},
    io::{
        geojson::{read_sketches_geojson, write_results_geojson},
        read_lines,
    },
    AreaUnit, GeoEngine, HeadlessView, LonLat, MapConfig, MapData, MapError, MapHost, MapView,
    SketchResult, SketchSession, SketchTool,
};

const CONTAINER: &str = "viewDiv";

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON file with map settings
    #[arg(long, global = true)]
    config: Option<String>,
    /// Unit used when printing areas
    #[arg(long, global = true)]
    unit: Option<AreaUnit>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the map and print the initial view.
    Load,
    /// Write the default settings to a JSON file.
    InitConfig { output: String },
    /// Report extent and area of the polygons in a GeoJSON file.
    Report {
        input: String,
        /// EPSG code of the input coordinates
        #[arg(long, default_value_t = 4326)]
        src_epsg: u32,
        /// Proj definition of the input coordinates; overrides `--src-epsg`
        #[arg(long)]
        src_proj: Option<String>,
        /// Write the results as a GeoJSON feature collection
        #[arg(long)]
        output: Option<String>,
    },
    /// Click the map at a position.
    #[command(allow_negative_numbers = true)]
    Click { longitude: f64, latitude: f64 },
    /// Sketch a shape through `lon,lat` vertices and report it.
    Sketch {
        tool: SketchTool,
        #[arg(
            required = true,
            allow_hyphen_values = true,
            value_parser = parse_lon_lat
        )]
        points: Vec<LonLat>,
    },
    /// Run the commands of a script against one map.
    Replay { script: String },
}

fn parse_lon_lat(s: &str) -> Result<LonLat, String> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lon,lat but got '{s}'"))?;
    let longitude = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let latitude = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(LonLat::new(longitude, latitude))
}

fn init_logging() {
    if let Ok(path) = std::env::var("SKETCH_MAP_LOG") {
        match File::create(&path) {
            Ok(file) => {
                env_logger::Builder::from_default_env()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path, e);
                env_logger::Builder::from_default_env().init();
            }
        }
    } else {
        env_logger::Builder::from_default_env().init();
    }
}

fn load_host(config: MapConfig) -> Result<MapHost<HeadlessView>, MapError> {
    let mut host = MapHost::new(config);
    host.initialize(CONTAINER)?;
    Ok(host)
}

fn print_result(result: &SketchResult, unit: AreaUnit) {
    println!("Extent: {}", result.extent);
    println!("Area: {:.3} {}", result.area_in(unit), unit.label());
}

fn print_map_data(data: &MapData, unit: AreaUnit) {
    match (data.extent, data.acres) {
        (Some(extent), Some(area_acres)) => {
            print_result(&SketchResult { extent, area_acres }, unit)
        }
        _ => println!("No sketch"),
    }
}

fn report_file(input: &str, src: &Crs, output: Option<&str>, unit: AreaUnit) {
    let sketches = match read_sketches_geojson(input, src) {
        Ok(sketches) => sketches,
        Err(e) => {
            eprintln!("Error reading {}: {}", input, e);
            return;
        }
    };
    let mut results = Vec::new();
    for geometry in &sketches {
        match sketch_map::report(&GeoEngine, geometry) {
            Ok(result) => {
                print_result(&result, unit);
                results.push(result);
            }
            Err(e) => eprintln!("Error reporting sketch: {}", e),
        }
    }
    if results.is_empty() {
        println!("No polygons in {}", input);
    }
    if let Some(output) = output {
        match write_results_geojson(output, &results) {
            Ok(()) => println!("Wrote {}", output),
            Err(e) => eprintln!("Error writing {}: {}", output, e),
        }
    }
}

fn print_center(host: &MapHost<HeadlessView>) {
    let center = host.view_state().center();
    println!("Center: {:.6}, {:.6}", center.longitude, center.latitude);
}

fn sketch(
    host: &mut MapHost<HeadlessView>,
    tool: SketchTool,
    points: &[LonLat],
) -> Result<(), MapError> {
    let (first, rest) = points.split_first().ok_or(MapError::EmptyGeometry)?;
    let mut session = SketchSession::new(host.config().sketch.clone());
    host.on_sketch_event(session.begin(tool, first.to_map_point())?)?;
    for p in rest {
        host.on_sketch_event(session.add_vertex(p.to_map_point())?)?;
    }
    host.on_sketch_event(session.finish()?)
}

fn click(host: &mut MapHost<HeadlessView>, at: LonLat) -> Result<(), MapError> {
    if host.on_click(at.to_map_point())?.is_none() {
        println!("Click ignored while sketching");
        return Ok(());
    }
    if host.process_hit_tests()? > 0 {
        print_center(host);
    } else {
        println!("Hit graphic; view unchanged");
    }
    Ok(())
}

fn current_sketch(host: &MapHost<HeadlessView>) -> Option<SketchGeometry> {
    host.layer()
        .of_kind(GraphicKind::Sketch)
        .find_map(|g| match &g.geometry {
            GraphicGeometry::Polygon(shape) => Some(shape.clone()),
            GraphicGeometry::Point(_) => None,
        })
}

fn parse_f64(s: &str) -> Result<f64, String> {
    s.parse::<f64>().map_err(|e| format!("'{s}': {e}"))
}

fn run_script_line(
    host: &mut MapHost<HeadlessView>,
    words: &[String],
    unit: AreaUnit,
) -> Result<(), String> {
    let Some((cmd, args)) = words.split_first() else {
        return Ok(());
    };
    match (cmd.as_str(), args) {
        ("click", [lon, lat]) => {
            let at = LonLat::new(parse_f64(lon)?, parse_f64(lat)?);
            click(host, at).map_err(|e| e.to_string())
        }
        ("locate", [lon, lat]) => {
            let at = LonLat::new(parse_f64(lon)?, parse_f64(lat)?);
            host.on_locate(at).map_err(|e| e.to_string())?;
            if let Some(view) = host.view() {
                let c = view.center();
                println!("View: {:.6}, {:.6}", c.longitude, c.latitude);
            }
            Ok(())
        }
        ("sketch", [tool, points @ ..]) => {
            let tool: SketchTool = tool.parse()?;
            let points = points
                .iter()
                .map(|p| parse_lon_lat(p))
                .collect::<Result<Vec<_>, _>>()?;
            sketch(host, tool, &points).map_err(|e| e.to_string())?;
            print_map_data(&host.map_data(), unit);
            Ok(())
        }
        ("move", [dx, dy]) => {
            let geometry = current_sketch(host).ok_or("no sketch to move")?;
            let session = SketchSession::new(host.config().sketch.clone());
            for event in session.move_graphic(&geometry, parse_f64(dx)?, parse_f64(dy)?) {
                host.on_sketch_event(event).map_err(|e| e.to_string())?;
            }
            print_map_data(&host.map_data(), unit);
            Ok(())
        }
        ("reset", []) => {
            host.reset_params();
            println!("Reset");
            Ok(())
        }
        ("data", []) => {
            let json = serde_json::to_string(&host.map_data())
                .map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(())
        }
        _ => Err(format!("unrecognized command '{}'", words.join(" "))),
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => match read_config_json(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                return;
            }
        },
        None => MapConfig::default(),
    };
    let unit = cli.unit.unwrap_or(config.area_unit);

    match cli.command {
        Commands::Load => match load_host(config) {
            Ok(host) => {
                if let Some(view) = host.view() {
                    println!("Loaded map in {}", view.container());
                    println!("Basemap: {}", view.properties().basemap);
                }
                print_center(&host);
                println!("Zoom: {}", host.view_state().zoom);
                println!("Graphics: {}", host.layer().len());
            }
            Err(e) => eprintln!("Error loading map: {}", e),
        },
        Commands::InitConfig { output } => match write_config_json(&output, &config) {
            Ok(()) => println!("Wrote {}", output),
            Err(e) => eprintln!("Error writing {}: {}", output, e),
        },
        Commands::Report {
            input,
            src_epsg,
            src_proj,
            output,
        } => {
            let src = match &src_proj {
                Some(definition) => Crs::from_proj4(definition),
                None => Crs::from_epsg(src_epsg),
            };
            report_file(&input, &src, output.as_deref(), unit);
        }
        Commands::Click {
            longitude,
            latitude,
        } => {
            let at = LonLat::new(longitude, latitude);
            if let Err(e) = load_host(config).and_then(|mut host| click(&mut host, at)) {
                eprintln!("Error: {}", e);
            }
        }
        Commands::Sketch { tool, points } => {
            let result = load_host(config).and_then(|mut host| {
                sketch(&mut host, tool, &points)?;
                Ok(host.map_data())
            });
            match result {
                Ok(data) => print_map_data(&data, unit),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Commands::Replay { script } => {
            let lines = match read_lines(&script) {
                Ok(lines) => lines,
                Err(e) => {
                    eprintln!("Error reading {}: {}", script, e);
                    return;
                }
            };
            let mut host = match load_host(config) {
                Ok(host) => host,
                Err(e) => {
                    eprintln!("Error loading map: {}", e);
                    return;
                }
            };
            for (idx, line) in lines.iter().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                let words = match shell_words::split(trimmed) {
                    Ok(words) => words,
                    Err(e) => {
                        eprintln!("line {}: {}", idx + 1, e);
                        continue;
                    }
                };
                if let Err(e) = run_script_line(&mut host, &words, unit) {
                    eprintln!("line {}: {}", idx + 1, e);
                }
            }
        }
    }
}
