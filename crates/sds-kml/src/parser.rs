//! KML grid parser implementation.
//!
//! Streams the document with `quick-xml`. Every `Placemark` becomes one grid
//! cell; every `Polygon` inside it (directly or in a `MultiGeometry`) becomes
//! one of the cell's polygons. Points and styling are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use sds_core::{Grid, GridCell, GridParseError, GridParserPort, Polygon, Ring};
use tracing::{debug, warn};

use crate::coordinates::parse_coordinates;
use crate::error::{KmlInternalError, KmlResult};

/// KML tiling grid parser.
#[derive(Debug, Clone, Default)]
pub struct KmlGridParser;

impl KmlGridParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse a grid from an in-memory document.
    pub fn parse_str(&self, document: &str) -> Result<Grid, GridParseError> {
        self.parse_reader(document.as_bytes()).map_err(Into::into)
    }

    #[allow(clippy::unused_self)]
    fn parse_reader<R: BufRead>(&self, source: R) -> KmlResult<Grid> {
        let mut reader = Reader::from_reader(source);
        let mut state = ParseState::default();
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| KmlInternalError::Xml {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
            match event {
                Event::Start(e) => state.open(e.local_name().as_ref()),
                Event::End(e) => state.close(e.local_name().as_ref())?,
                Event::Text(t) if state.capture.is_some() => {
                    let text = t.unescape().map_err(|e| KmlInternalError::Xml {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    })?;
                    state.text.push_str(&text);
                }
                Event::CData(c) if state.capture.is_some() => {
                    state.text.push_str(&String::from_utf8_lossy(&c));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if state.placemark.is_some() {
            return Err(KmlInternalError::Truncated);
        }
        if state.cells.is_empty() {
            return Err(KmlInternalError::NoCells);
        }
        if state.skipped > 0 {
            warn!(
                skipped = state.skipped,
                "Skipped placemarks without a usable polygon"
            );
        }
        debug!(cells = state.cells.len(), "Parsed KML grid");
        Ok(Grid::new(state.cells))
    }

    fn parse_file(&self, path: &Path) -> KmlResult<Grid> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => KmlInternalError::FileNotFound(path.display().to_string()),
            _ => KmlInternalError::Io(e),
        })?;
        self.parse_reader(BufReader::new(file))
    }
}

impl GridParserPort for KmlGridParser {
    fn parse(&self, path: &Path) -> Result<Grid, GridParseError> {
        self.parse_file(path).map_err(Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Name,
    Description,
    Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Outer,
    Inner,
}

#[derive(Debug, Default)]
struct PlacemarkBuilder {
    depth: usize,
    name: String,
    description: String,
    polygons: Vec<Polygon>,
}

#[derive(Debug, Default)]
struct PolygonBuilder {
    exterior: Option<Ring>,
    holes: Vec<Ring>,
    invalid: bool,
}

#[derive(Debug, Default)]
struct ParseState {
    depth: usize,
    placemark: Option<PlacemarkBuilder>,
    polygon: Option<PolygonBuilder>,
    boundary: Option<Boundary>,
    capture: Option<Capture>,
    text: String,
    cells: Vec<GridCell>,
    skipped: usize,
}

impl ParseState {
    fn is_placemark_child(&self) -> bool {
        self.polygon.is_none()
            && self
                .placemark
                .as_ref()
                .is_some_and(|p| p.depth + 1 == self.depth)
    }

    fn begin_capture(&mut self, capture: Capture) {
        self.capture = Some(capture);
        self.text.clear();
    }

    fn open(&mut self, name: &[u8]) {
        self.depth += 1;
        match name {
            b"Placemark" => {
                self.placemark = Some(PlacemarkBuilder {
                    depth: self.depth,
                    ..PlacemarkBuilder::default()
                });
            }
            b"name" if self.is_placemark_child() => self.begin_capture(Capture::Name),
            b"description" if self.is_placemark_child() => {
                self.begin_capture(Capture::Description);
            }
            b"Polygon" if self.placemark.is_some() => {
                self.polygon = Some(PolygonBuilder::default());
            }
            b"outerBoundaryIs" if self.polygon.is_some() => self.boundary = Some(Boundary::Outer),
            b"innerBoundaryIs" if self.polygon.is_some() => self.boundary = Some(Boundary::Inner),
            b"coordinates" if self.boundary.is_some() => self.begin_capture(Capture::Coordinates),
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) -> KmlResult<()> {
        match (name, self.capture) {
            (b"name", Some(Capture::Name)) => {
                let text = self.take_text();
                if let Some(placemark) = self.placemark.as_mut() {
                    placemark.name = text;
                }
            }
            (b"description", Some(Capture::Description)) => {
                let text = self.take_text();
                if let Some(placemark) = self.placemark.as_mut() {
                    placemark.description = text;
                }
            }
            (b"coordinates", Some(Capture::Coordinates)) => {
                let text = self.take_text();
                self.finish_ring(&text)?;
            }
            (b"outerBoundaryIs" | b"innerBoundaryIs", _) => self.boundary = None,
            (b"Polygon", _) => self.finish_polygon(),
            (b"Placemark", _) => self.finish_placemark(),
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn take_text(&mut self) -> String {
        self.capture = None;
        let text = self.text.trim().to_string();
        self.text.clear();
        text
    }

    fn placemark_name(&self) -> String {
        self.placemark
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    fn finish_ring(&mut self, text: &str) -> KmlResult<()> {
        let points = parse_coordinates(text).map_err(|tuple| KmlInternalError::Coordinates {
            placemark: self.placemark_name(),
            tuple,
        })?;
        let placemark = self.placemark_name();
        let (Some(polygon), Some(boundary)) = (self.polygon.as_mut(), self.boundary) else {
            return Ok(());
        };
        match Ring::new(points) {
            Ok(ring) => match boundary {
                Boundary::Outer => polygon.exterior = Some(ring),
                Boundary::Inner => polygon.holes.push(ring),
            },
            Err(e) => {
                warn!(placemark = %placemark, error = %e, "Ignoring degenerate ring");
                if boundary == Boundary::Outer {
                    polygon.invalid = true;
                }
            }
        }
        Ok(())
    }

    fn finish_polygon(&mut self) {
        let Some(builder) = self.polygon.take() else {
            return;
        };
        self.boundary = None;
        let Some(placemark) = self.placemark.as_mut() else {
            return;
        };
        match builder.exterior {
            Some(exterior) if !builder.invalid => {
                placemark.polygons.push(Polygon::new(exterior, builder.holes));
            }
            _ => debug!(placemark = %placemark.name, "Polygon without a usable outer ring"),
        }
    }

    fn finish_placemark(&mut self) {
        let Some(placemark) = self.placemark.take() else {
            return;
        };
        let name = placemark.name.clone();
        match GridCell::new(placemark.name, placemark.description, placemark.polygons) {
            Some(cell) => self.cells.push(cell),
            None => {
                debug!(placemark = %name, "Placemark has no polygon");
                self.skipped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sds_core::GeoPoint;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
<Document>
  <name>S2A_OPER_GIP_TILPAR</name>
  <Folder>
    <name>Features</name>
    <Placemark>
      <name>32UMA</name>
      <description><![CDATA[<table><tr><td>TILE_ID</td><td>32UMA</td></tr></table>]]></description>
      <styleUrl>#KMLStyler</styleUrl>
      <MultiGeometry>
        <Polygon>
          <outerBoundaryIs>
            <LinearRing>
              <coordinates>
                7.0,50.0,0 9.0,50.0,0 9.0,52.0,0 7.0,52.0,0 7.0,50.0,0
              </coordinates>
            </LinearRing>
          </outerBoundaryIs>
          <innerBoundaryIs>
            <LinearRing>
              <coordinates>7.5,50.5 8.5,50.5 8.5,51.5 7.5,51.5</coordinates>
            </LinearRing>
          </innerBoundaryIs>
        </Polygon>
        <Point><coordinates>8.0,51.0,0</coordinates></Point>
      </MultiGeometry>
    </Placemark>
    <Placemark>
      <name>01CCV</name>
      <description>split &amp; wrapped</description>
      <MultiGeometry>
        <Polygon><outerBoundaryIs><LinearRing><coordinates>179,-60 180,-60 180,-59 179,-59 179,-60</coordinates></LinearRing></outerBoundaryIs></Polygon>
        <Polygon><outerBoundaryIs><LinearRing><coordinates>-180,-60 -179,-60 -179,-59 -180,-59 -180,-60</coordinates></LinearRing></outerBoundaryIs></Polygon>
      </MultiGeometry>
    </Placemark>
    <Placemark>
      <name>LABEL</name>
      <Point><coordinates>1,1,0</coordinates></Point>
    </Placemark>
  </Folder>
</Document>
</kml>"##;

    #[test]
    fn parses_placemarks_in_order() {
        let grid = KmlGridParser::new().parse_str(SAMPLE).unwrap();

        let names: Vec<_> = grid.cells().iter().map(GridCell::name).collect();
        assert_eq!(names, vec!["32UMA", "01CCV"]);
    }

    #[test]
    fn reads_cdata_and_escaped_descriptions() {
        let grid = KmlGridParser::new().parse_str(SAMPLE).unwrap();

        assert!(grid.cell("32UMA").unwrap().description().starts_with("<table>"));
        assert_eq!(grid.cell("01CCV").unwrap().description(), "split & wrapped");
    }

    #[test]
    fn keeps_holes_and_multi_polygons() {
        let grid = KmlGridParser::new().parse_str(SAMPLE).unwrap();

        let tile = grid.cell("32UMA").unwrap();
        assert_eq!(tile.polygons()[0].holes().len(), 1);
        assert!(tile.contains(&GeoPoint::new(7.2, 50.2)));
        assert!(!tile.contains(&GeoPoint::new(8.0, 51.0)));

        let split = grid.cell("01CCV").unwrap();
        assert_eq!(split.polygons().len(), 2);
        assert!(split.contains(&GeoPoint::new(-179.5, -59.5)));
    }

    #[test]
    fn malformed_coordinates_fail() {
        let doc = SAMPLE.replace("7.5,50.5 8.5,50.5", "7.5,fifty 8.5,50.5");
        let err = KmlGridParser::new().parse_str(&doc).unwrap_err();

        assert!(matches!(err, GridParseError::InvalidFormat(ref m) if m.contains("7.5,fifty")));
    }

    #[test]
    fn document_without_polygons_fails() {
        let doc = "<kml><Document><Placemark><name>X</name></Placemark></Document></kml>";
        assert!(matches!(
            KmlGridParser::new().parse_str(doc),
            Err(GridParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn truncated_document_fails() {
        let cut = &SAMPLE[..SAMPLE.find("</Placemark>").unwrap()];
        assert!(matches!(
            KmlGridParser::new().parse_str(cut),
            Err(GridParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn degenerate_ring_drops_polygon_only() {
        let doc = SAMPLE.replace(
            "179,-60 180,-60 180,-59 179,-59 179,-60",
            "179,-60 180,-60 179,-60",
        );
        let grid = KmlGridParser::new().parse_str(&doc).unwrap();

        assert_eq!(grid.cell("01CCV").unwrap().polygons().len(), 1);
    }
}
