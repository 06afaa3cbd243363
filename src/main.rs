#![deny(clippy::all)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use structopt::StructOpt;
use zip::ZipArchive;

mod dof;
mod error;
mod geo;
mod kml;
mod obstacle;
mod zip_util;

use dof::DofFile;
use geo::LatLon;
use kml::{ColorSpec, StyleSpec};
use obstacle::{filter_obstacles, FilterCriteria, Obstacle};
use zip_util::dat_from_archive;

#[derive(StructOpt)]
struct Args {
    /// Obstacle data: obstacles.json, DOF.DAT, or a DOF distribution ZIP
    #[structopt(name = "input", parse(from_os_str))]
    input: PathBuf,
    /// Defaults to Obstacles_{minAGL}AGL_{radius}NM.kml
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    #[structopt(long = "lat", raw(allow_hyphen_values = "true"))]
    lat: f64,
    #[structopt(long = "lon", raw(allow_hyphen_values = "true"))]
    lon: f64,
    /// Search radius in nautical miles
    #[structopt(short = "r", long = "radius")]
    radius_nm: f64,
    /// Keep obstacles strictly taller than this (feet AGL)
    #[structopt(short = "a", long = "min-agl", default_value = "200")]
    min_agl: u32,
    /// Ring radius around each obstacle, in statute miles
    #[structopt(long = "ring", default_value = "0.5")]
    ring_sm: f64,
    #[structopt(long = "outline-color", default_value = "#ff0000")]
    outline_color: String,
    #[structopt(long = "outline-opacity", default_value = "ff")]
    outline_opacity: String,
    #[structopt(long = "fill-color", default_value = "#ff0000")]
    fill_color: String,
    #[structopt(long = "fill-opacity", default_value = "80")]
    fill_opacity: String,
    /// Outline-only circles
    #[structopt(long = "no-fill")]
    no_fill: bool,
    /// Also write the parsed obstacle database as compact JSON
    #[structopt(long = "dump-json", parse(from_os_str))]
    dump_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::from_args();

    let obstacles = load_obstacles(&args.input)?;
    println!("Loaded {} obstacles.", obstacles.len());

    if let Some(path) = &args.dump_json {
        println!("Dumping obstacle JSON...");
        serde_json::to_writer(File::create(path)?, &obstacles)?;
    }

    let criteria = FilterCriteria {
        center: LatLon::new(args.lat, args.lon),
        max_distance_nm: args.radius_nm,
        min_agl: args.min_agl,
    };
    let kept = filter_obstacles(&obstacles, &criteria);
    println!(
        "Kept {} obstacles within {} NM above {} ft AGL.",
        kept.len(),
        args.radius_nm,
        args.min_agl
    );

    let style = StyleSpec {
        outline: ColorSpec::new(&args.outline_color, &args.outline_opacity),
        fill: ColorSpec::new(&args.fill_color, &args.fill_opacity),
        fill_enabled: !args.no_fill,
    };
    let kml = kml::build_document(&kept, &style, args.ring_sm, args.min_agl);

    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "Obstacles_{}AGL_{}NM.kml",
            args.min_agl, args.radius_nm
        ))
    });
    println!("Outputing KML data to {}...", output.display());
    let mut out = File::create(output)?;
    out.write_all(kml.as_bytes())?;
    Ok(())
}

fn load_obstacles(input: &Path) -> Result<Vec<Obstacle>, Box<dyn Error>> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => {
            println!("Reading obstacle JSON...");
            Ok(serde_json::from_reader(BufReader::new(File::open(input)?))?)
        }
        Some("zip") => {
            println!("Unpacking DOF archive...");
            let mut archive = ZipArchive::new(BufReader::new(File::open(input)?))?;
            let mut dat = dat_from_archive(&mut archive)?;
            Ok(parse_dof(&DofFile::from_reader(&mut dat)?))
        }
        _ => {
            println!("Reading DOF data...");
            Ok(parse_dof(&DofFile::from_file(input)?))
        }
    }
}

fn parse_dof(dof: &DofFile) -> Vec<Obstacle> {
    if let Some(date) = dof.currency_date() {
        println!("DOF currency date: {}", date);
    }
    println!("Processing obstacle records...");
    dof::parse_obstacles(dof)
}
