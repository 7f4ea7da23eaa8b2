//! # End-to-End Pipeline Scenarios
//!
//! Drives the full validation run over realistic packages, both in memory
//! and as zip files on disk, and checks the ordered report it produces.

use std::io::{Cursor, Write};

use elpv_archive::MemoryArchive;
use elpv_core::{CheckId, CheckStatus, FailureKind, ManifestVariant};
use elpv_manifest::{validate_archive, validate_zip_bytes, validate_zip_file, ValidationOptions};
use zip::write::SimpleFileOptions;

const MINIMAL_MODERN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ode xmlns="http://www.intef.es/xsd/ode" version="2.0">
  <odeProperties>
    <odeProperty><key>pp_title</key><value>Sample course</value></odeProperty>
    <odeProperty><key>pp_lang</key><value>en</value></odeProperty>
  </odeProperties>
  <odeResources>
    <odeResource><key>odeVersionName</key><value>3.0</value></odeResource>
  </odeResources>
  <odeNavStructures>
    <odeNavStructure>
      <odePageId>page-1</odePageId>
      <pageName>Introduction</pageName>
      <odeNavStructureOrder>1</odeNavStructureOrder>
      <odePagStructures>
        <odePagStructure>
          <odeBlockId>block-1</odeBlockId>
          <blockName>Text</blockName>
          <odeComponents>
            <odeComponent>
              <odeIdeviceId>idevice-1</odeIdeviceId>
              <odeIdeviceTypeName>text</odeIdeviceTypeName>
              <htmlView><![CDATA[<p><img src="content/resources/pic.png" alt=""></p>]]></htmlView>
              <jsonProperties>{"textTextarea":"&lt;p&gt;Hello&lt;/p&gt;"}</jsonProperties>
            </odeComponent>
          </odeComponents>
        </odePagStructure>
      </odePagStructures>
    </odeNavStructure>
  </odeNavStructures>
</ode>"#;

const LEGACY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<instance xmlns="http://www.exelearning.org/content/v0.3" class="exe.engine.package.Package" reference="1">
<dictionary>
<string role="key" value="_title"/>
<unicode value="Old course"/>
<string role="key" value="_author"/>
<unicode value="Grace"/>
</dictionary>
</instance>"#;

fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

fn minimal_package() -> Vec<u8> {
    build_zip(&[
        ("content.xml", MINIMAL_MODERN),
        ("content/", ""),
        ("content/resources/pic.png", "png"),
        ("custom/", ""),
    ])
}

#[test]
fn minimal_modern_package_is_all_success() {
    let report = validate_zip_bytes(&minimal_package(), &ValidationOptions::default());

    assert_eq!(report.check_ids(), CheckId::all().to_vec());
    for check in &report.checks {
        assert_eq!(
            check.status(),
            CheckStatus::Success,
            "{} should pass: {}",
            check.id,
            check.result.message
        );
    }
    assert_eq!(
        report.check(CheckId::Resources).unwrap().result.message,
        "All 1 linked resource is present."
    );
    assert_eq!(
        report.check(CheckId::WellFormed).unwrap().result.message,
        "content.xml is well-formed."
    );
    assert_eq!(
        report.check(CheckId::Metadata).unwrap().result.message,
        "Extracted 2 properties and 1 resources."
    );

    let metadata = report.metadata.as_ref().unwrap();
    assert_eq!(metadata.property("pp_title"), Some("Sample course"));
    assert!(report.missing_resources.is_empty());
    assert_eq!(report.overall(), CheckStatus::Success);
    assert_eq!(report.halted_by(), None);
}

#[test]
fn missing_resource_is_a_warning_with_raw_spelling() {
    let manifest = MINIMAL_MODERN.replace("content/resources/pic.png", "./content/resources/gone.png");
    let archive = MemoryArchive::from_entries([("content.xml", manifest.as_str()), ("content/", "")]);

    let report = validate_archive(&archive, &ValidationOptions::default());
    let resources = report.check(CheckId::Resources).unwrap();
    assert_eq!(resources.status(), CheckStatus::Warning);
    assert_eq!(resources.failure, Some(FailureKind::ResourceMissing));
    assert_eq!(
        resources.result.message,
        "The following resources could not be found: ./content/resources/gone.png"
    );
    assert_eq!(report.missing_resources, vec!["./content/resources/gone.png"]);
    assert_eq!(report.overall(), CheckStatus::Warning);
}

#[test]
fn wrong_root_element_halts_the_pipeline() {
    let archive = MemoryArchive::from_entries([("content.xml", "<root><odeNavStructures/></root>")]);
    let report = validate_archive(&archive, &ValidationOptions::default());

    assert_eq!(
        report.check_ids(),
        vec![
            CheckId::Manifest,
            CheckId::ResourceFolders,
            CheckId::WellFormed,
            CheckId::RootElement,
        ]
    );
    assert_eq!(
        report.check(CheckId::RootElement).unwrap().result.message,
        "Expected the root element to be <ode>, found <root> instead."
    );
    assert_eq!(report.halted_by(), Some(FailureKind::MissingRequiredElement));
    assert!(report.metadata.is_none());
}

#[test]
fn missing_navigation_container_halts_after_root() {
    let archive = MemoryArchive::from_entries([("content.xml", "<ode/>")]);
    let report = validate_archive(&archive, &ValidationOptions::default());
    assert_eq!(report.checks.last().unwrap().id, CheckId::NavStructures);
    assert_eq!(report.halted_by(), Some(FailureKind::MissingRequiredElement));
}

#[test]
fn malformed_manifest_halts_after_well_formed() {
    let archive = MemoryArchive::from_entries([("content.xml", "<ode><unclosed></ode>")]);
    let report = validate_archive(&archive, &ValidationOptions::default());
    let check = report.checks.last().unwrap();
    assert_eq!(check.id, CheckId::WellFormed);
    assert_eq!(check.status(), CheckStatus::Error);
    assert_eq!(report.halted_by(), Some(FailureKind::MalformedDocument));
}

#[test]
fn empty_project_continues_to_later_checks() {
    let archive = MemoryArchive::from_entries([(
        "content.xml",
        "<ode><odeNavStructures/></ode>",
    )]);
    let report = validate_archive(&archive, &ValidationOptions::default());

    let pages = report.check(CheckId::Pages).unwrap();
    assert_eq!(pages.status(), CheckStatus::Warning);
    assert_eq!(pages.failure, Some(FailureKind::EmptyProject));
    assert_eq!(
        report.check(CheckId::Resources).unwrap().result.message,
        "No linked resources were detected."
    );
    assert_eq!(
        report.check(CheckId::ResourceFolders).unwrap().result.message,
        "Recommended resource folders were not found."
    );
    assert_eq!(report.halted_by(), None);
}

#[test]
fn structural_issues_are_errors_but_not_fatal() {
    let manifest = MINIMAL_MODERN.replace("<blockName>Text</blockName>", "");
    let archive = MemoryArchive::from_entries([
        ("content.xml", manifest.as_str()),
        ("content/resources/pic.png", "png"),
    ]);
    let report = validate_archive(&archive, &ValidationOptions::default());

    let structure = report.check(CheckId::Structure).unwrap();
    assert_eq!(structure.status(), CheckStatus::Error);
    assert_eq!(
        structure.result.message,
        "Block #1 in page #1 is missing fields: blockName"
    );
    assert!(report.check(CheckId::Resources).unwrap().result.is_success());
    assert!(report.has_errors());
    assert_eq!(report.halted_by(), None);
}

#[test]
fn legacy_package_skips_modern_checks() {
    let archive = MemoryArchive::from_entries([("contentv3.xml", LEGACY), ("photo.jpg", "jpg")]);
    let report = validate_archive(&archive, &ValidationOptions::default());

    assert_eq!(report.manifest.as_ref().unwrap().variant, ManifestVariant::Legacy);
    assert_eq!(
        report.check(CheckId::Manifest).unwrap().result.message,
        "Found contentv3.xml (legacy eXeLearning format) in the package."
    );
    for id in [
        CheckId::RootElement,
        CheckId::NavStructures,
        CheckId::Pages,
        CheckId::Structure,
        CheckId::Resources,
    ] {
        let check = report.check(id).unwrap();
        assert_eq!(check.status(), CheckStatus::Warning);
        assert_eq!(
            check.result.message,
            "Skipped: not applicable to legacy contentv3.xml manifests."
        );
    }
    let metadata = report.metadata.as_ref().unwrap();
    assert_eq!(metadata.property("pp_title"), Some("Old course"));
    assert_eq!(metadata.property("pp_author"), Some("Grace"));
}

#[test]
fn preview_limit_truncates_missing_list() {
    let links: String = (1..=4)
        .map(|i| format!(r#"<img src="content/missing{i}.png">"#))
        .collect();
    let manifest = MINIMAL_MODERN.replace(
        r#"<p><img src="content/resources/pic.png" alt=""></p>"#,
        &links,
    );
    let archive = MemoryArchive::from_entries([("content.xml", manifest.as_str())]);
    let options = ValidationOptions {
        missing_preview_limit: 2,
    };

    let report = validate_archive(&archive, &options);
    assert_eq!(
        report.check(CheckId::Resources).unwrap().result.message,
        "The following resources could not be found: content/missing1.png, content/missing2.png, …"
    );
    assert_eq!(report.missing_resources.len(), 4);
}

#[test]
fn zip_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("course.elp");
    std::fs::write(&path, minimal_package()).unwrap();

    let report = validate_zip_file(&path, &ValidationOptions::default());
    assert_eq!(report.overall(), CheckStatus::Success);
    assert_eq!(report.checks.first().unwrap().id, CheckId::Archive);
}

#[test]
fn missing_file_on_disk_fails_archive_check() {
    let dir = tempfile::tempdir().unwrap();
    let report = validate_zip_file(&dir.path().join("absent.elp"), &ValidationOptions::default());
    assert_eq!(report.check_ids(), vec![CheckId::Archive]);
    assert_eq!(report.halted_by(), Some(FailureKind::MalformedArchive));
}

#[test]
fn report_serializes_with_snake_case_ids() {
    let report = validate_zip_bytes(&minimal_package(), &ValidationOptions::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["checks"][0]["id"], "archive");
    assert_eq!(json["checks"][0]["status"], "success");
    assert_eq!(json["manifest"]["variant"], "modern");
}
