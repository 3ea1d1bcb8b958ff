//! End-to-end run through the public API: load a catalog from disk, stream the
//! documents into a [`FileWriter`] and inspect the resulting directory.

use indoc::indoc;
use ogc_styles_gen::config;
use ogc_styles_gen::generate::{self, GenerateOptions, HrefStyle};
use ogc_styles_gen::writer::{FileWriter, Writer};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

const CATALOG: &str = indoc! {r#"
    base-resource: https://maps.example.net/api/
    default: day
    additional-assets:
      - path: "sprites/*"
        media-type: application/octet-stream
    styles:
      - id: day
        title: Daylight
        stylesheets:
          - title: Mapbox
            native: true
            link:
              rel: stylesheet
              type: application/vnd.mapbox.style+json
              asset-filename: day.json
        links:
          - rel: preview
            type: image/png
            asset-filename: day.png
      - id: night
        stylesheets:
          - title: SLD
            link:
              rel: stylesheet
              type: application/vnd.ogc.sld+xml;version=1.0
              asset-filename: night.sld
"#};

fn write(dir: &Path, relative: &str, content: &[u8]) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup() -> (TempDir, TempDir) {
    let assets = TempDir::new().unwrap();
    write(
        assets.path(),
        "day.json",
        br#"{"sprite": "{{ base_resource }}/sprites/day", "name": "{{ style_title }}", "filter": ["==", "$type", "Polygon"]}"#,
    );
    write(assets.path(), "day.png", &[0x89, b'P', b'N', b'G']);
    write(assets.path(), "night.sld", b"<sld id=\"{{ style_id }}\"/>");
    write(assets.path(), "sprites/day.png", b"sprite");
    write(assets.path(), "sprites/.DS_Store", b"junk");
    write(assets.path(), "catalog.yaml", CATALOG.as_bytes());
    let out = TempDir::new().unwrap();
    (assets, out)
}

fn run(assets: &Path, out: &Path, options: GenerateOptions) {
    let catalog = config::load_catalog(&assets.join("catalog.yaml")).unwrap();
    let mut writer = FileWriter::new(out);
    for item in generate::stream_documents(catalog, assets.to_path_buf(), options) {
        writer.write_document(&item.unwrap()).unwrap();
    }
}

fn written_files(out: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(out)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(out)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

fn read_json(out: &Path, relative: &str) -> serde_json::Value {
    serde_json::from_slice(&fs::read(out.join(relative)).unwrap()).unwrap()
}

#[test]
fn generates_static_document_tree() {
    let (assets, out) = setup();
    run(assets.path(), out.path(), GenerateOptions::default());

    assert_eq!(
        written_files(out.path()),
        vec![
            "resources/day.png",
            "sprites/day.png",
            "styles.json",
            "styles/day.mapbox.json",
            "styles/day/metadata.json",
            "styles/night.sld",
            "styles/night/metadata.json",
        ]
    );
}

#[test]
fn stylesheets_templated_against_base_resource() {
    let (assets, out) = setup();
    run(assets.path(), out.path(), GenerateOptions::default());

    assert_eq!(
        fs::read_to_string(out.path().join("styles/day.mapbox.json")).unwrap(),
        r#"{"sprite": "https://maps.example.net/api/sprites/day", "name": "Daylight", "filter": ["==", "$type", "Polygon"]}"#
    );
    assert_eq!(
        fs::read_to_string(out.path().join("styles/night.sld")).unwrap(),
        r#"<sld id="night"/>"#
    );
    assert_eq!(
        fs::read(out.path().join("resources/day.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
}

#[test]
fn collection_links_resolve_to_written_files() {
    let (assets, out) = setup();
    run(assets.path(), out.path(), GenerateOptions::default());

    let styles = read_json(out.path(), "styles.json");
    assert_eq!(styles["default"], "day");
    let base = "https://maps.example.net/api/";
    for style in styles["styles"].as_array().unwrap() {
        for link in style["links"].as_array().unwrap() {
            let href = link["href"].as_str().unwrap();
            let relative = href.strip_prefix(base).unwrap();
            if link["rel"] == "describedby" {
                assert!(out.path().join(format!("{relative}.json")).is_file(), "{href}");
            } else {
                assert!(out.path().join(relative).is_file(), "{href}");
            }
        }
    }
}

#[test]
fn untitled_style_uses_id() {
    let (assets, out) = setup();
    run(assets.path(), out.path(), GenerateOptions::default());

    let styles = read_json(out.path(), "styles.json");
    assert_eq!(styles["styles"][1]["id"], "night");
    assert!(styles["styles"][1].get("title").is_none());

    let metadata = read_json(out.path(), "styles/night/metadata.json");
    assert_eq!(metadata["links"][0]["rel"], "self");
    assert_eq!(
        metadata["links"][0]["href"],
        "https://maps.example.net/api/styles/night/metadata"
    );
}

#[test]
fn html_and_query_hrefs() {
    let (assets, out) = setup();
    let options = GenerateOptions::from_format_names(&["json", "html"], HrefStyle::Query);
    run(assets.path(), out.path(), options);

    assert!(out.path().join("styles.html").is_file());
    assert!(out.path().join("styles/day/metadata.html").is_file());

    let metadata = read_json(out.path(), "styles/night/metadata.json");
    assert_eq!(
        metadata["stylesheets"][0]["link"]["href"],
        "https://maps.example.net/api/styles/night?f=sld10"
    );
}

#[test]
fn invalid_catalog_writes_nothing() {
    let (assets, out) = setup();
    let broken = CATALOG.replace("default: day", "default: dusk");
    write(assets.path(), "catalog.yaml", broken.as_bytes());

    let catalog = config::load_catalog(&assets.path().join("catalog.yaml")).unwrap();
    let mut writer = FileWriter::new(out.path());
    let mut error = None;
    for item in generate::stream_documents(catalog, assets.path().to_path_buf(), GenerateOptions::default()) {
        match item {
            Ok(document) => writer.write_document(&document).unwrap(),
            Err(e) => error = Some(e),
        }
    }
    let message = error.unwrap().to_string();
    assert!(message.contains("default style `dusk` not found"), "{message}");
    assert!(written_files(out.path()).is_empty());
}
