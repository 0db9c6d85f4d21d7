//! KML descriptor rendering.
//!
//! A KMZ holds a single `doc.kml` listing one `GroundOverlay` per image.
//! Every overlay points at a tile inside the archive and pins it to a
//! north/south/east/west `LatLonBox`. The document is rendered from
//! header, overlay and footer `tera` templates.

mod error;

pub use error::KmlError;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tera::{Context, Tera};

use crate::geo::GeoBox;

/// File name of the descriptor at the archive root.
pub const DOC_KML: &str = "doc.kml";

/// Default `drawOrder`; higher draws on top of basemaps on Garmin units.
pub const DEFAULT_DRAWING_ORDER: i32 = 51;

/// KML 2.2 namespace of the root element.
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Overlay tint: nearly opaque white.
const OVERLAY_COLOR: &str = "bdffffff";

const HEADER: &str = "header.kml";
const OVERLAY: &str = "overlay.kml";
const FOOTER: &str = "footer.kml";

const HEADER_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="{{ namespace }}">
<Document>
  <name>{{ name | escape_xml }}</name>
"#;

const OVERLAY_TEMPLATE: &str = r#"  <GroundOverlay>
    <name>{{ name | escape_xml }}</name>
    <color>{{ color }}</color>
    <drawOrder>{{ drawing_order }}</drawOrder>
    <Icon>
      <href>{{ href | escape_xml }}</href>
      <viewBoundScale>1.0</viewBoundScale>
    </Icon>
    <LatLonBox>
      <north>{{ north }}</north>
      <south>{{ south }}</south>
      <east>{{ east }}</east>
      <west>{{ west }}</west>
      <rotation>0.0</rotation>
    </LatLonBox>
  </GroundOverlay>
"#;

const FOOTER_TEMPLATE: &str = "</Document>\n</kml>\n";

/// Descriptor templates. Text fields are escaped with the `escape_xml`
/// filter, so HTML autoescaping stays off.
fn templates() -> Result<Tera, KmlError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(vec![
        (HEADER, HEADER_TEMPLATE),
        (OVERLAY, OVERLAY_TEMPLATE),
        (FOOTER, FOOTER_TEMPLATE),
    ])?;
    Ok(tera)
}

/// How east/west edges are written to the `LatLonBox`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Write edges exactly as computed. Tiles right of the antimeridian
    /// keep east values above 180.
    #[default]
    Raw,
    /// Pass east and west through the longitude normalizer first.
    Normalized,
}

impl EdgeMode {
    /// Config spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeMode::Raw => "raw",
            EdgeMode::Normalized => "normalized",
        }
    }
}

impl FromStr for EdgeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(EdgeMode::Raw),
            "normalized" | "normalised" => Ok(EdgeMode::Normalized),
            other => Err(format!("unknown edge mode '{}'", other)),
        }
    }
}

/// One image pinned to the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundOverlay {
    /// Overlay name shown in the viewer's layer list.
    pub name: String,
    /// Stacking order relative to other overlays and basemaps.
    pub drawing_order: i32,
    /// Image path relative to the archive root, `/`-separated.
    pub href: String,
    /// Geographic extent of the image.
    pub bbox: GeoBox,
}

/// A KML document under construction.
///
/// # Example
///
/// ```
/// use kmztiler::geo::GeoBox;
/// use kmztiler::kml::{EdgeMode, GroundOverlay, KmlDocument};
///
/// let mut doc = KmlDocument::new("Grouse", EdgeMode::Raw);
/// doc.add_overlay(GroundOverlay {
///     name: "Grouse_tile_000.jpg".to_string(),
///     drawing_order: 51,
///     href: "tiles/Grouse_tile_000.jpg".to_string(),
///     bbox: GeoBox::new(49.5, 49.3, -123.0, -123.2).unwrap(),
/// });
///
/// let xml = doc.render().unwrap();
/// assert!(xml.contains("<href>tiles/Grouse_tile_000.jpg</href>"));
/// ```
#[derive(Debug, Clone)]
pub struct KmlDocument {
    name: String,
    edge_mode: EdgeMode,
    overlays: Vec<GroundOverlay>,
}

impl KmlDocument {
    /// Start an empty document named after the map.
    pub fn new(name: impl Into<String>, edge_mode: EdgeMode) -> Self {
        Self {
            name: name.into(),
            edge_mode,
            overlays: Vec::new(),
        }
    }

    /// Append an overlay. Overlays render in insertion order.
    pub fn add_overlay(&mut self, overlay: GroundOverlay) {
        self.overlays.push(overlay);
    }

    /// Overlays added so far.
    pub fn overlays(&self) -> &[GroundOverlay] {
        &self.overlays
    }

    /// Render the complete XML text.
    pub fn render(&self) -> Result<String, KmlError> {
        let tera = templates()?;

        let mut header = Context::new();
        header.insert("namespace", KML_NAMESPACE);
        header.insert("name", &self.name);

        let mut out = tera.render(HEADER, &header)?;
        for overlay in &self.overlays {
            out.push_str(&tera.render(OVERLAY, &self.overlay_context(overlay))?);
        }
        out.push_str(&tera.render(FOOTER, &Context::new())?);
        Ok(out)
    }

    /// Render and write the document to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), KmlError> {
        let xml = self.render()?;
        fs::write(path, xml).map_err(|source| KmlError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn overlay_context(&self, overlay: &GroundOverlay) -> Context {
        let bbox = match self.edge_mode {
            EdgeMode::Raw => overlay.bbox,
            EdgeMode::Normalized => overlay.bbox.normalized(),
        };

        // Shortest round-trip formatting, e.g. `-123` rather than `-123.0`
        let mut context = Context::new();
        context.insert("name", &overlay.name);
        context.insert("color", OVERLAY_COLOR);
        context.insert("drawing_order", &overlay.drawing_order);
        context.insert("href", &overlay.href);
        context.insert("north", &bbox.north().to_string());
        context.insert("south", &bbox.south().to_string());
        context.insert("east", &bbox.east().to_string());
        context.insert("west", &bbox.west().to_string());
        context
    }
}
