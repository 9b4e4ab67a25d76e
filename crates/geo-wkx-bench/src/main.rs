//! Benchmark for WKT/WKB reading and writing.
//!
//! Reads shapes from a JSON file (`[{"name": ..., "wkt": ..., "srid": ...}]`)
//! when one is given, otherwise synthesizes a mixed dataset.

use std::fs;
use std::time::{Duration, Instant};

use geo_wkx::{
    ByteOrder, Geometry, GeometryKind, GeometryProxy, GeometryView, WkbOptions, WkbWriter,
    WktOptions, WktWriter, read_wkb, read_wkt,
};
use serde::Deserialize;

const ITERS: u32 = 10;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct Shape {
    name: String,
    wkt: String,
    #[serde(default)]
    srid: u32,
}

// =============================================================================
// SYNTHETIC DATA
// =============================================================================

fn ring(cx: f64, cy: f64, radius: f64, vertices: usize) -> String {
    let mut coords: Vec<String> = (0..vertices)
        .map(|i| {
            let angle = i as f64 / vertices as f64 * std::f64::consts::TAU;
            format!("{} {}", cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();
    coords.push(coords[0].clone());
    format!("({})", coords.join(", "))
}

fn synthesize() -> Vec<Shape> {
    let mut shapes = Vec::new();
    for i in 0..2_000 {
        let x = (i % 100) as f64 * 0.37 - 18.0;
        let y = (i / 100) as f64 * 0.53 + 40.0;
        shapes.push(Shape {
            name: format!("city-{}", i),
            wkt: format!("POINT Z ({} {} {})", x, y, i as f64 * 1.5),
            srid: 4326,
        });
    }
    for i in 0..500 {
        let x = i as f64 * 0.1;
        let track: Vec<String> = (0..64).map(|j| format!("{} {}", x + j as f64 * 0.01, (j as f64).sin())).collect();
        shapes.push(Shape {
            name: format!("track-{}", i),
            wkt: format!("LINESTRING ({})", track.join(", ")),
            srid: 4326,
        });
    }
    for i in 0..200 {
        let cx = i as f64 * 2.0;
        shapes.push(Shape {
            name: format!("parcel-{}", i),
            wkt: format!(
                "MULTIPOLYGON (({}, {}), ({}))",
                ring(cx, 0.0, 1.0, 48),
                ring(cx, 0.0, 0.25, 12),
                ring(cx, 5.0, 0.5, 24)
            ),
            srid: 3857,
        });
    }
    shapes
}

// =============================================================================
// TIMING
// =============================================================================

fn time<T>(mut f: impl FnMut() -> T) -> (T, Duration) {
    // Warmup
    let _ = f();
    let start = Instant::now();
    let mut result = None;
    for _ in 0..ITERS {
        result = Some(f());
    }
    let elapsed = start.elapsed() / ITERS;
    (result.expect("ITERS is non-zero"), elapsed)
}

fn report(label: &str, bytes: usize, elapsed: Duration) {
    println!(
        "{:<28} {:>10?}  {:>8.2} MB/s",
        label,
        elapsed,
        (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
    );
}

fn main() {
    let shapes = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading shapes from: {}", path);
            let json = fs::read_to_string(&path).expect("Failed to read shapes file");
            serde_json::from_str::<Vec<Shape>>(&json).expect("Failed to parse JSON")
        }
        None => {
            println!("No input given, synthesizing shapes");
            synthesize()
        }
    };
    let wkt_bytes: usize = shapes.iter().map(|s| s.wkt.len()).sum();
    println!("{} shapes, {} bytes of WKT", shapes.len(), wkt_bytes);

    // Parse WKT
    let (geometries, wkt_read) = time(|| {
        shapes
            .iter()
            .map(|s| read_wkt(&s.wkt, s.srid).unwrap_or_else(|e| panic!("{}: {}", s.name, e)))
            .collect::<Vec<Geometry>>()
    });
    report("read WKT", wkt_bytes, wkt_read);

    // Write WKT
    let compact = WktWriter::new(WktOptions::compact());
    let (texts, wkt_write) = time(|| geometries.iter().map(|g| compact.write(g)).collect::<Vec<_>>());
    let compact_bytes: usize = texts.iter().map(String::len).sum();
    report("write WKT (compact)", compact_bytes, wkt_write);

    // Write and read WKB in both byte orders
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let writer = WkbWriter::new(WkbOptions::with_byte_order(order));
        let (blobs, wkb_write) = time(|| {
            geometries
                .iter()
                .map(|g| writer.write(g).expect("Failed to write WKB"))
                .collect::<Vec<_>>()
        });
        let wkb_bytes: usize = blobs.iter().map(Vec::len).sum();
        report(&format!("write WKB ({:?})", order), wkb_bytes, wkb_write);

        let (decoded, wkb_read) = time(|| {
            blobs
                .iter()
                .zip(&geometries)
                .map(|(b, g)| read_wkb(b, g.srid()).expect("Failed to read WKB"))
                .collect::<Vec<_>>()
        });
        report(&format!("read WKB ({:?})", order), wkb_bytes, wkb_read);
        assert_eq!(decoded, geometries, "WKB round trip must be lossless");
    }

    // Proxies: metadata only, then full materialization
    let kinds: Vec<GeometryKind> = geometries.iter().map(Geometry::kind).collect();
    let (srid_sum, proxy_meta) = time(|| {
        shapes
            .iter()
            .zip(&kinds)
            .map(|(s, &kind)| {
                let proxy = GeometryProxy::from_text(kind, s.wkt.as_str(), s.srid);
                GeometryView::srid(&proxy) as u64 + proxy.as_text().map_or(0, |t| t.len() as u64)
            })
            .sum::<u64>()
    });
    report("proxy (no load)", wkt_bytes, proxy_meta);

    let (counted, proxy_load) = time(|| {
        shapes
            .iter()
            .zip(&kinds)
            .map(|(s, &kind)| {
                let proxy = GeometryProxy::from_text(kind, s.wkt.as_str(), s.srid);
                proxy.count().expect("Failed to load proxy")
            })
            .sum::<usize>()
    });
    report("proxy (load)", wkt_bytes, proxy_load);

    // Summary
    println!("\n=== Summary ===");
    println!("Shapes: {}", shapes.len());
    println!("Parts: {}", counted);
    println!("Proxy checksum: {}", srid_sum);
    println!(
        "Compact WKT vs input: {:.1}%",
        100.0 * compact_bytes as f64 / wkt_bytes as f64
    );
}
