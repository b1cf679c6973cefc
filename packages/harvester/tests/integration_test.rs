//! End-to-end integration tests for the harvester pipeline.
//!
//! Each test builds a small ChemIDplus-style archive, runs the pipeline and
//! inspects the written tables.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use chemidplus_harvester::config::{ArchiveConfig, DocumentSelection, UnnamedPolicy};
use chemidplus_harvester::{harvest, HarvestConfig, HarvesterError, StripMode};

const CHEMID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE file SYSTEM "chemid.dtd">
<file name="ChemIDplus" date="2023-02-22">
  <Chemical id="0000050782" displayName="Aspirin [USP]">
    <NameList>
      <NameOfSubstance>Aspirin<SourceList><Source>MeSH</Source></SourceList></NameOfSubstance>
      <Synonyms>Acetylsalicylic acid<SourceList><Source>MeSH</Source><Source>NCI</Source></SourceList></Synonyms>
      <Synonyms>Aspirin [JAN]<SourceList><Source>JAN</Source></SourceList></Synonyms>
    </NameList>
    <ClassificationList>
      <ClassificationCode>Anti-Inflammatory Agents, Non-Steroidal<SourceList><Source>MeSH</Source></SourceList></ClassificationCode>
      <ClassificationCode>Platelet Aggregation Inhibitors<SourceList><Source>MeSH</Source></SourceList></ClassificationCode>
    </ClassificationList>
  </Chemical>
  <Chemical id="0000000001" displayName="Foo">
    <NameList>
      <Synonyms>Bar<SourceList><Source>DTP</Source></SourceList></Synonyms>
    </NameList>
  </Chemical>
  <Chemical id="0000000002" displayName="">
    <NameList>
      <Synonyms>Orphan<SourceList><Source>DTP</Source></SourceList></Synonyms>
    </NameList>
    <ClassificationList>
      <ClassificationCode>Unnamed class<SourceList><Source>NCI</Source></SourceList></ClassificationCode>
    </ClassificationList>
  </Chemical>
  <Chemical id="0000000003" displayName="Water"/>
</file>
"#;

/// Scratch directory with an archive, a bracket-term file and output paths.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(entries: &[(&str, &str)]) -> Self {
        let dir = tempdir().unwrap();
        write_zip(&dir.path().join("chemid.zip"), entries);
        fs::write(dir.path().join("bracket_terms.txt"), " [USP]\n [JAN]\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> HarvestConfig {
        let mut config = HarvestConfig::new(self.path("chemid.zip"));
        config.synonyms.bracket_terms = self.path("bracket_terms.txt");
        config.classes_output = self.path("classes.txt");
        config.synonyms_output = self.path("synonyms.txt");
        config
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn data_rows(content: &str) -> Vec<&str> {
    content.lines().skip(1).collect()
}

#[test]
fn test_classes_table() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    let summary = harvest(&fixture.config()).unwrap();

    assert_eq!(summary.chemicals, 4);
    assert_eq!(summary.classes.rows, 3);
    assert_eq!(
        fixture.read("classes.txt"),
        "Molecule\tClass\tClass_source\n\
         Aspirin [USP]\tAnti-Inflammatory Agents, Non-Steroidal\tMeSH\n\
         Aspirin [USP]\tPlatelet Aggregation Inhibitors\tMeSH\n\
         \tUnnamed class\tNCI\n"
    );
}

#[test]
fn test_synonyms_table_with_generation() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    let summary = harvest(&fixture.config()).unwrap();

    // "Aspirin [JAN]" stripped of the last term " [JAN]" is "Aspirin",
    // already generated from the display name
    assert_eq!(
        fixture.read("synonyms.txt"),
        "Molecule\tSynonym\tSynonym_source\n\
         Aspirin [USP]\tAspirin\tGENERATED\n\
         Aspirin [USP]\tAcetylsalicylic acid\tMeSH;NCI\n\
         Aspirin [USP]\tAspirin [JAN]\tJAN\n\
         Foo\tBar\tDTP\n"
    );
    assert_eq!(summary.synonyms.rows, 4);
    assert_eq!(summary.synonyms.generated, 1);
}

#[test]
fn test_synonyms_table_without_generation() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    let mut config = fixture.config();
    config.synonyms.generate = false;
    // The term file is not needed when generation is off
    config.synonyms.bracket_terms = fixture.path("missing_terms.txt");

    harvest(&config).unwrap();

    assert_eq!(
        fixture.read("synonyms.txt"),
        "Molecule\tSynonym\tSynonym_source\n\
         Aspirin [USP]\tAcetylsalicylic acid\tMeSH;NCI\n\
         Aspirin [USP]\tAspirin [JAN]\tJAN\n\
         Foo\tBar\tDTP\n\
         \tOrphan\tDTP\n"
    );
}

#[test]
fn test_sourced_synonym_appears_exactly_once() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    harvest(&fixture.config()).unwrap();

    let content = fixture.read("synonyms.txt");
    let matches = data_rows(&content)
        .into_iter()
        .filter(|row| *row == "Foo\tBar\tDTP")
        .count();
    assert_eq!(matches, 1);
}

#[test]
fn test_empty_display_name_contributes_no_synonyms() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    harvest(&fixture.config()).unwrap();

    let content = fixture.read("synonyms.txt");
    assert!(data_rows(&content).iter().all(|row| !row.starts_with('\t')));
}

#[test]
fn test_cumulative_strip_mode() {
    let xml = r#"<file>
  <Chemical displayName="Paracetamol">
    <Synonyms>Acetaminophen [USP] [JAN]<SourceList><Source>USP</Source></SourceList></Synonyms>
  </Chemical>
</file>"#;
    let fixture = Fixture::new(&[("chemid.xml", xml)]);

    harvest(&fixture.config()).unwrap();
    assert_eq!(
        data_rows(&fixture.read("synonyms.txt")),
        vec![
            "Paracetamol\tAcetaminophen [USP] [JAN]\tUSP",
            "Paracetamol\tAcetaminophen [USP]\tGENERATED",
        ]
    );

    let mut config = fixture.config();
    config.synonyms.strip_mode = StripMode::Cumulative;
    harvest(&config).unwrap();
    assert_eq!(
        data_rows(&fixture.read("synonyms.txt")),
        vec![
            "Paracetamol\tAcetaminophen [USP] [JAN]\tUSP",
            "Paracetamol\tAcetaminophen\tGENERATED",
        ]
    );
}

#[test]
fn test_idempotent_without_generation() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    let mut config = fixture.config();
    config.synonyms.generate = false;

    harvest(&config).unwrap();
    let classes_first = fs::read(fixture.path("classes.txt")).unwrap();
    let synonyms_first = fs::read(fixture.path("synonyms.txt")).unwrap();

    harvest(&config).unwrap();
    assert_eq!(fs::read(fixture.path("classes.txt")).unwrap(), classes_first);
    assert_eq!(fs::read(fixture.path("synonyms.txt")).unwrap(), synonyms_first);
}

#[test]
fn test_extract_dir_keeps_unpacked_document() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    let mut config = fixture.config();
    config.archive.extract_dir = Some(fixture.path("extracted_zip"));

    harvest(&config).unwrap();
    assert!(fixture.path("extracted_zip").join("CurrentChemID.xml").exists());
}

#[test]
fn test_ambiguous_archive() {
    let fixture = Fixture::new(&[
        ("b.xml", r#"<file><Chemical displayName="B"/></file>"#),
        ("a.xml", r#"<file><Chemical displayName="A [USP]"/></file>"#),
    ]);

    let err = harvest(&fixture.config()).unwrap_err();
    assert!(matches!(err, HarvesterError::AmbiguousXmlDocument { .. }));
    assert!(!fixture.path("classes.txt").exists());

    let mut config = fixture.config();
    config.archive.selection = DocumentSelection::First;
    harvest(&config).unwrap();
    assert_eq!(
        data_rows(&fixture.read("synonyms.txt")),
        vec!["A [USP]\tA\tGENERATED"]
    );
}

#[test]
fn test_archive_without_xml() {
    let fixture = Fixture::new(&[("readme.txt", "no xml here")]);
    let err = harvest(&fixture.config()).unwrap_err();
    assert!(matches!(err, HarvesterError::NoXmlDocument(_)));
}

#[test]
fn test_malformed_xml_writes_nothing() {
    let fixture = Fixture::new(&[("chemid.xml", "<file><Chemical displayName=\"A\"></file>")]);
    let err = harvest(&fixture.config()).unwrap_err();

    assert!(matches!(err, HarvesterError::XmlParse { .. }));
    assert!(!fixture.path("classes.txt").exists());
    assert!(!fixture.path("synonyms.txt").exists());
}

#[test]
fn test_failed_synonyms_write_leaves_no_classes_table() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    let mut config = fixture.config();
    config.synonyms_output = fixture.path("synonyms_dir");
    fs::create_dir(&config.synonyms_output).unwrap();

    let err = harvest(&config).unwrap_err();
    assert!(matches!(err, HarvesterError::Write { .. }));
    assert!(err.to_string().starts_with("Writing failed"));
    assert!(!fixture.path("classes.txt").exists());
    assert!(!fixture.path(".classes.txt.tmp").exists());
}

#[test]
fn test_failed_synonyms_write_keeps_previous_classes_table() {
    let fixture = Fixture::new(&[("CurrentChemID.xml", CHEMID_XML)]);
    fs::write(fixture.path("classes.txt"), "previous run\n").unwrap();
    let mut config = fixture.config();
    config.synonyms_output = fixture.path("missing").join("synonyms.txt");

    harvest(&config).unwrap_err();
    assert_eq!(fixture.read("classes.txt"), "previous run\n");
}

#[test]
fn test_missing_display_name() {
    let xml = r#"<file>
  <Chemical displayName="Foo"><Synonyms>Bar</Synonyms></Chemical>
  <Chemical id="0000000009"><Synonyms>Nameless</Synonyms></Chemical>
</file>"#;
    let fixture = Fixture::new(&[("chemid.xml", xml)]);

    let err = harvest(&fixture.config()).unwrap_err();
    assert!(matches!(err, HarvesterError::MissingAttribute { .. }));
    assert!(!fixture.path("classes.txt").exists());

    let mut config = fixture.config();
    config.archive.unnamed = UnnamedPolicy::Skip;
    let summary = harvest(&config).unwrap();
    assert_eq!(summary.chemicals, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(data_rows(&fixture.read("synonyms.txt")), vec!["Foo\tBar\t"]);
}

#[test]
fn test_missing_archive() {
    let dir = tempdir().unwrap();
    let mut config = HarvestConfig {
        archive: ArchiveConfig::new(dir.path().join("missing.zip")),
        ..HarvestConfig::new("unused.zip")
    };
    config.synonyms.generate = false;

    let err = harvest(&config).unwrap_err();
    assert!(err.to_string().starts_with("Extraction failed: archive not found"));
}
