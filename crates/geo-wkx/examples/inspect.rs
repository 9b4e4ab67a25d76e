//! Simple inspector for WKB and WKT files.
//!
//! Usage: `inspect <file> [srid]`. Files that are valid UTF-8 and start with a
//! letter are read as WKT, hex strings as hex WKB, anything else as raw WKB.

use std::fs;

use geo_wkx::{Geometry, GeometryView, read_wkb, read_wkt};

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

fn print_tree(geometry: &Geometry, depth: usize) {
    let cs = geometry.coordinate_system();
    println!(
        "{}{} [{}] parts={}{}",
        "  ".repeat(depth),
        geometry.kind(),
        cs,
        geometry.count(),
        if geometry.is_empty() { " EMPTY" } else { "" }
    );

    let children: &[Geometry] = match geometry {
        Geometry::Polygon(p) | Geometry::Triangle(p) | Geometry::CurvePolygon(p) => p.rings(),
        other => other.as_collection().map_or(&[], |c| c.geometries()),
    };
    for child in children {
        print_tree(child, depth + 1);
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().expect("usage: inspect <file> [srid]");
    let srid = args
        .next()
        .map(|s| s.parse::<u32>().expect("SRID must be an unsigned integer"))
        .unwrap_or(0);

    println!("Reading: {}", path);
    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let text = std::str::from_utf8(&data).ok();
    let hex = text.and_then(decode_hex);
    let result = match (text, hex) {
        (_, Some(wkb)) => {
            println!("Format: hex WKB");
            read_wkb(&wkb, srid)
        }
        (Some(t), None) if t.trim_start().starts_with(|c: char| c.is_ascii_alphabetic()) => {
            println!("Format: WKT");
            read_wkt(t.trim(), srid)
        }
        _ => {
            println!("Format: WKB");
            read_wkb(&data, srid)
        }
    };

    let geometry = match result {
        Ok(geometry) => geometry,
        Err(e) => {
            eprintln!("Error ({:?}): {}", e.code(), e);
            std::process::exit(1);
        }
    };

    println!("\n=== Geometry ===");
    print_tree(&geometry, 0);

    println!("\n=== WKT ===");
    match geometry.as_text() {
        Ok(wkt) => println!("{}", wkt),
        Err(e) => eprintln!("Error: {}", e),
    }
}
