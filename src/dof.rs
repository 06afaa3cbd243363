use crate::error::Result;
use crate::geo::LatLon;
use crate::obstacle::{Obstacle, ObstacleBuilder};
use std::io::prelude::*;
use std::path::Path;
use std::str::Lines;

/// Field positions in a DOF record line.
const DOF_DELIM: &[(usize, usize)] = &[
    (0, 9),   // OAS number
    (18, 16), // City
    (35, 12), // Latitude DMS
    (48, 13), // Longitude DMS
    (83, 5),  // AGL height
];

#[derive(Debug)]
pub struct DofFile {
    buf: String,
}

impl DofFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DofFile> {
        let mut file = std::fs::File::open(path)?;
        Self::from_reader(&mut file)
    }

    pub fn from_reader<B: Read>(reader: &mut B) -> Result<DofFile> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        // Stray non-ASCII bytes do occur in city names; strip them and keep
        // the record, so the fixed-width spans stay byte-sliceable.
        buf.retain(u8::is_ascii);
        Ok(DofFile {
            buf: String::from_utf8_lossy(&buf).into_owned(),
        })
    }

    /// Cycle date from the DOF header block, if present.
    pub fn currency_date(&self) -> Option<&str> {
        self.buf.lines().find_map(|line| {
            let line = line.trim_start();
            if line.starts_with("CURRENCY DATE") {
                line.split('=').nth(1).map(str::trim)
            } else {
                None
            }
        })
    }

    pub fn records(&self, delimiters: &[(usize, usize)]) -> RecordIter {
        let delimiters = delimiters.iter().map(|&(p, l)| Span(p, p + l)).collect::<Vec<_>>();
        RecordIter {
            lines: self.buf.lines(),
            delimiters,
        }
    }
}

struct Span(usize, usize);

// Header block, column rulers, and currency/continuation lines are not records.
fn is_record_line(line: &str) -> bool {
    line.len() >= 100
        && line.is_ascii()
        && !line.starts_with("CUR")
        && !line.starts_with('-')
        && !line.starts_with("OAS")
        && !line.starts_with(' ')
}

pub struct RecordIter<'a> {
    lines: Lines<'a>,
    delimiters: Vec<Span>,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Record<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            if is_record_line(line) {
                break Some(Record {
                    fields: self
                        .delimiters
                        .iter()
                        .map(|&Span(l, r)| line[l..r].trim())
                        .collect::<Vec<_>>(),
                });
            }
        }
    }
}

#[derive(Debug)]
pub struct Record<'a> {
    fields: Vec<&'a str>,
}

use std::ops::Index;
impl<'a> Index<usize> for Record<'a> {
    type Output = &'a str;

    fn index(&self, i: usize) -> &Self::Output {
        &self.fields[i]
    }
}

/// Assemble obstacles from DOF records, dropping any record with a
/// non-numeric AGL or unparseable coordinates.
pub fn parse_obstacles(dof: &DofFile) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();

    for r in dof.records(DOF_DELIM) {
        let agl = r[4].parse::<u32>();

        let mut obs = ObstacleBuilder::default();
        obs.id(r[0].to_string());
        obs.city(r[1].to_string());
        if let Some(coord) = LatLon::from_dof(r[2], r[3]) {
            obs.lat(coord.lat());
            obs.lon(coord.lon());
        }
        if let Ok(agl) = &agl {
            obs.agl(*agl);
        }

        match obs.build() {
            Ok(obs) => obstacles.push(obs),
            Err(_) => {
                if agl.is_ok() {
                    println!("WARN: Bad lat/lon pair on obstacle {}, ignoring!", r[0]);
                }
            }
        }
    }

    obstacles
}
