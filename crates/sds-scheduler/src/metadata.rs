//! Band resolutions from a product's `MTD*.xml`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use sds_core::{SpectralResolutions, meta_band_name};

use crate::error::SchedulerError;

/// The `MTD*.xml` file directly inside a `.SAFE` directory.
pub fn find_metadata_file(safe_dir: &Path) -> Result<PathBuf, SchedulerError> {
    for entry in std::fs::read_dir(safe_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with("MTD") && name.ends_with(".xml") && entry.file_type()?.is_file() {
            return Ok(entry.path());
        }
    }
    Err(SchedulerError::Metadata(format!(
        "No MTD*.xml file in {}",
        safe_dir.display()
    )))
}

/// Read every `Spectral_Information` entry of the metadata file.
pub fn read_band_resolutions(path: &Path) -> Result<SpectralResolutions, SchedulerError> {
    let file = File::open(path)?;
    parse_band_resolutions(Reader::from_reader(BufReader::new(file)))
}

/// Same as [`read_band_resolutions`] for an in-memory document.
pub fn parse_band_resolutions_str(xml: &str) -> Result<SpectralResolutions, SchedulerError> {
    parse_band_resolutions(Reader::from_reader(xml.as_bytes()))
}

fn parse_band_resolutions<R: std::io::BufRead>(
    mut reader: Reader<R>,
) -> Result<SpectralResolutions, SchedulerError> {
    let mut bands = SpectralResolutions::new();
    let mut buf = Vec::new();
    let mut band: Option<String> = None;
    let mut in_resolution = false;
    let mut resolution = String::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            SchedulerError::Metadata(format!("at byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Spectral_Information" => {
                    band = None;
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| SchedulerError::Metadata(e.to_string()))?;
                        if attr.key.local_name().as_ref() == b"physicalBand" {
                            let value = attr
                                .unescape_value()
                                .map_err(|e| SchedulerError::Metadata(e.to_string()))?;
                            band = Some(meta_band_name(value.trim()));
                        }
                    }
                }
                b"RESOLUTION" if band.is_some() => {
                    in_resolution = true;
                    resolution.clear();
                }
                _ => {}
            },
            Event::Text(text) if in_resolution => {
                let text = text
                    .unescape()
                    .map_err(|e| SchedulerError::Metadata(e.to_string()))?;
                resolution.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"RESOLUTION" if in_resolution => {
                    in_resolution = false;
                    let metres = resolution.trim().parse::<u32>().map_err(|_| {
                        SchedulerError::Metadata(format!("Invalid resolution '{}'", resolution.trim()))
                    })?;
                    if let Some(name) = &band {
                        bands.insert(name.clone(), metres);
                    }
                }
                b"Spectral_Information" => band = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MTD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<n1:Level-1C_User_Product xmlns:n1="https://psd-14.sentinel2.eo.esa.int/PSD/User_Product_Level-1C.xsd">
  <n1:General_Info>
    <Product_Image_Characteristics>
      <Spectral_Information_List>
        <Spectral_Information bandId="0" physicalBand="B1">
          <RESOLUTION>60</RESOLUTION>
          <Wavelength><MIN unit="nm">430</MIN></Wavelength>
        </Spectral_Information>
        <Spectral_Information bandId="6" physicalBand="B7">
          <RESOLUTION>20</RESOLUTION>
        </Spectral_Information>
        <Spectral_Information bandId="8" physicalBand="B8A">
          <RESOLUTION>20</RESOLUTION>
        </Spectral_Information>
        <Spectral_Information bandId="10" physicalBand="B10">
          <RESOLUTION>60</RESOLUTION>
        </Spectral_Information>
      </Spectral_Information_List>
    </Product_Image_Characteristics>
  </n1:General_Info>
</n1:Level-1C_User_Product>"#;

    #[test]
    fn reads_band_resolutions() {
        let bands = parse_band_resolutions_str(MTD).unwrap();

        assert_eq!(bands.len(), 4);
        assert_eq!(bands["B1"], 60);
        assert_eq!(bands["B7"], 20);
        assert_eq!(bands["B8A"], 20);
        assert_eq!(bands["B10"], 60);
    }

    #[test]
    fn bad_resolution_is_an_error() {
        let xml = r#"<root><Spectral_Information physicalBand="B2"><RESOLUTION>ten</RESOLUTION></Spectral_Information></root>"#;
        let err = parse_band_resolutions_str(xml).unwrap_err();
        assert!(matches!(err, SchedulerError::Metadata(_)));
    }

    #[test]
    fn finds_metadata_file_at_top_level() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("GRANULE")).unwrap();
        std::fs::write(dir.path().join("GRANULE/MTD_TL.xml"), "").unwrap();
        std::fs::write(dir.path().join("manifest.safe"), "").unwrap();
        std::fs::write(dir.path().join("MTD_MSIL1C.xml"), MTD).unwrap();

        let path = find_metadata_file(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("MTD_MSIL1C.xml"));
        assert_eq!(read_band_resolutions(&path).unwrap()["B7"], 20);
    }

    #[test]
    fn missing_metadata_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_metadata_file(dir.path()),
            Err(SchedulerError::Metadata(_))
        ));
    }
}
