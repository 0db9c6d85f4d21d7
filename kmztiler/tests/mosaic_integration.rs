//! Integration tests for the image → KMZ pipeline.
//!
//! These run real images through the builtin engine and read the resulting
//! KMZ back:
//! - archive layout and tile naming
//! - `doc.kml` overlay boxes tile the source box without gaps
//! - batch processing with mixed good and bad inputs
//!
//! Run with: `cargo test --test mosaic_integration`

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use elementtree::Element;
use image::{Rgb, RgbImage};
use tempfile::TempDir;

use kmztiler::imaging::RasterEngine;
use kmztiler::kml::{DOC_KML, KML_NAMESPACE};
use kmztiler::mosaic::{MosaicAssembler, MosaicConfig, MosaicMode, Stage};

// ============================================================================
// Helper Functions
// ============================================================================

const EPSILON: f64 = 1e-9;

/// Write a gradient JPEG named `name` into `dir`.
fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 90])
    });
    let path = dir.join(name);
    image
        .save_with_format(&path, image::ImageFormat::Jpeg)
        .unwrap();
    path
}

fn assembler(temp: &TempDir, mode: MosaicMode) -> MosaicAssembler {
    let config = MosaicConfig::new(mode)
        .with_output_dir(temp.path().join("out"))
        .with_temp_root(temp.path());
    MosaicAssembler::new(Arc::new(RasterEngine::new()), config)
}

fn read_entry(archive: &Path, name: &str) -> String {
    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut text = String::new();
    zip.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

/// (north, south, east, west) of every overlay, in document order.
fn overlay_boxes(kml: &str) -> Vec<(f64, f64, f64, f64)> {
    let root = Element::from_reader(kml.as_bytes()).unwrap();
    let document = root.find((KML_NAMESPACE, "Document")).unwrap();

    document
        .find_all((KML_NAMESPACE, "GroundOverlay"))
        .map(|overlay| {
            let bbox = overlay.find((KML_NAMESPACE, "LatLonBox")).unwrap();
            let edge = |tag: &str| -> f64 {
                bbox.find((KML_NAMESPACE, tag))
                    .unwrap()
                    .text()
                    .parse()
                    .unwrap()
            };
            (edge("north"), edge("south"), edge("east"), edge("west"))
        })
        .collect()
}

// ============================================================================
// Tiled output
// ============================================================================

#[test]
fn test_tiled_kmz_covers_source_box() {
    let temp = TempDir::new().unwrap();
    let input = write_jpeg(temp.path(), "test_50.0_40.0_10.0_0.0.jpg", 1000, 600);
    let assembler = assembler(
        &temp,
        MosaicMode::Tiled {
            max_tiles: 100,
            tile_size: 256,
        },
    );

    let output = assembler.process(&input).unwrap();

    // 1000x600 in 256px tiles: 4 columns, 3 rows, ragged right and bottom
    assert_eq!(output.tiles, 12);
    assert_eq!(output.archive, temp.path().join("out/test.kmz"));

    let kml = read_entry(&output.archive, DOC_KML);
    assert!(kml.contains("<name>test</name>"));
    let boxes = overlay_boxes(&kml);
    assert_eq!(boxes.len(), 12);

    let (first_n, _, _, first_w) = boxes[0];
    assert!((first_n - 50.0).abs() < EPSILON);
    assert!((first_w - 0.0).abs() < EPSILON);

    let (_, last_s, last_e, _) = boxes[11];
    assert!((last_s - 40.0).abs() < EPSILON, "last south {}", last_s);
    assert!((last_e - 10.0).abs() < EPSILON, "last east {}", last_e);

    for row in 0..3 {
        for col in 1..4 {
            let prev = boxes[row * 4 + col - 1];
            let tile = boxes[row * 4 + col];
            assert!((tile.3 - prev.2).abs() < EPSILON, "west edge gap");
            assert!((tile.0 - prev.0).abs() < EPSILON, "row north differs");
        }
        if row > 0 {
            let above = boxes[(row - 1) * 4];
            let tile = boxes[row * 4];
            assert!((tile.0 - above.1).abs() < EPSILON, "north edge gap");
        }
    }

    // Ragged right column is narrower in longitude than a full tile
    let full_width = boxes[0].2 - boxes[0].3;
    let ragged_width = boxes[3].2 - boxes[3].3;
    assert!((full_width - 256.0 / 1000.0 * 10.0).abs() < EPSILON);
    assert!((ragged_width - 232.0 / 1000.0 * 10.0).abs() < EPSILON);
}

#[test]
fn test_tiled_kmz_entries_match_overlays() {
    let temp = TempDir::new().unwrap();
    let input = write_jpeg(temp.path(), "Ridge_46.2_46.0_-121.4_-121.8.jpg", 300, 300);
    let assembler = assembler(
        &temp,
        MosaicMode::Tiled {
            max_tiles: 100,
            tile_size: 128,
        },
    );

    let output = assembler.process(&input).unwrap();

    let zip = zip::ZipArchive::new(File::open(&output.archive).unwrap()).unwrap();
    let mut names: Vec<String> = zip.file_names().map(String::from).collect();
    names.sort();

    let kml = read_entry(&output.archive, DOC_KML);
    let root = Element::from_reader(kml.as_bytes()).unwrap();
    let hrefs: Vec<String> = root
        .find((KML_NAMESPACE, "Document"))
        .unwrap()
        .find_all((KML_NAMESPACE, "GroundOverlay"))
        .map(|overlay| {
            overlay
                .find((KML_NAMESPACE, "Icon"))
                .and_then(|icon| icon.find((KML_NAMESPACE, "href")))
                .unwrap()
                .text()
                .to_string()
        })
        .collect();

    assert_eq!(names[0], "doc.kml");
    assert_eq!(&names[1..], hrefs.as_slice());
    assert_eq!(hrefs[0], "tiles/Ridge_tile_000.jpg");
    assert_eq!(hrefs.len(), 9);
}

#[test]
fn test_antimeridian_raw_edges_exceed_180() {
    let temp = TempDir::new().unwrap();
    let input = write_jpeg(temp.path(), "Fiji_-16.0_-18.0_-179.0_177.0.jpg", 400, 200);
    let assembler = assembler(
        &temp,
        MosaicMode::Tiled {
            max_tiles: 100,
            tile_size: 200,
        },
    );

    let output = assembler.process(&input).unwrap();

    let boxes = overlay_boxes(&read_entry(&output.archive, DOC_KML));
    assert_eq!(boxes.len(), 2);
    // 4° wide box split in two: 177→179, then 179→181
    assert!((boxes[0].3 - 177.0).abs() < EPSILON);
    assert!((boxes[0].2 - 179.0).abs() < EPSILON);
    assert!((boxes[1].3 - 179.0).abs() < EPSILON);
    assert!((boxes[1].2 - 181.0).abs() < EPSILON);
}

// ============================================================================
// Single output
// ============================================================================

#[test]
fn test_single_kmz_has_one_overlay_with_source_box() {
    let temp = TempDir::new().unwrap();
    let input = write_jpeg(temp.path(), "Valley_37.9_37.6_-119.4_-119.8.jpg", 320, 240);
    let assembler = assembler(&temp, MosaicMode::single());

    let output = assembler.process(&input).unwrap();

    assert_eq!(output.archive, temp.path().join("out/Valley-big.kmz"));
    let kml = read_entry(&output.archive, DOC_KML);
    let boxes = overlay_boxes(&kml);
    assert_eq!(boxes, vec![(37.9, 37.6, -119.4, -119.8)]);
    assert!(kml.contains("<href>tiles/Valley_tile_000.jpg</href>"));
    assert!(kml.contains("<drawOrder>51</drawOrder>"));
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_batch_reports_each_input() {
    let temp = TempDir::new().unwrap();
    let good = write_jpeg(temp.path(), "Good_50.0_40.0_10.0_0.0.jpg", 64, 64);
    let inverted = write_jpeg(temp.path(), "Inverted_40.0_50.0_10.0_0.0.jpg", 64, 64);
    let missing = temp.path().join("Missing_50.0_40.0_10.0_0.0.jpg");
    let assembler = assembler(&temp, MosaicMode::tiled());

    let reports = assembler.process_all(&[good.clone(), inverted, missing]);

    assert_eq!(reports.len(), 3);
    assert!(reports[0].is_ok());
    assert_eq!(
        reports[1].result.as_ref().unwrap_err().stage(),
        Stage::Filename
    );
    assert_eq!(reports[2].result.as_ref().unwrap_err().stage(), Stage::Input);

    let written: Vec<_> = fs::read_dir(temp.path().join("out"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(written, vec![std::ffi::OsString::from("Good.kmz")]);
}
