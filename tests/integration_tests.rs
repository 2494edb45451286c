use chrono::NaiveDate;
use cv_bldr::utils::error::ErrorKind;
use cv_bldr::{
    CvError, FixedClock, LocalStorage, Pipeline, ResumeEngine, ResumePipeline, TomlConfig,
    TransformResult,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "\
name: Jane Doe
roles: [Staff Engineer, Platform]
contact:
  email: jane@example.com
education:
  bachelors:
    diploma: BSc Mathematics
    school: College of Elsewhere
    completionDate: May 2014
";

const FORMATTING: &str = "\
docMargins: [12.7, 12.7, 12.7, 12.7]
defaultFormat: {font-name: Calibri, font-size: Pt(10)}
defaultTitleFormat: {font-bold: true}
titleFormat: {font-size: Pt(22), para_align: center}
rolesFormat: {para_align: center}
contactFormat: {para_align: center}
headerFormat: {font-size: Pt(13), font-bold: true}
bulletFormat: {para_style: List Bullet}
spacerFormat: {font-size: Pt(4)}
";

const EXPERIENCE: &str = "\
### Skills
- Rust
- PostgreSQL
- Kubernetes

### Northwind Traders
title: Staff Software Engineer
startDate: March 2021
endDate:
- Led the order pipeline migration
%% internal note, never rendered %%

### Contoso Ltd
title: Senior Software Engineer
startDate: July 2017
endDate: February 2021
- Built the deployment platform
";

fn workspace(experience: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Experience.md"), experience).unwrap();
    fs::write(dir.path().join("header.yaml"), HEADER).unwrap();
    fs::write(dir.path().join("formatting.yaml"), FORMATTING).unwrap();
    dir
}

fn engine(
    dir: &TempDir,
    config: TomlConfig,
) -> ResumeEngine<ResumePipeline<LocalStorage, TomlConfig, FixedClock>> {
    let storage = LocalStorage::new(dir.path());
    let today = FixedClock(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    ResumeEngine::new(ResumePipeline::new(storage, config, today))
}

fn document_xml(path: &Path) -> String {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut body = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    body
}

#[test]
fn test_end_to_end_resume_build() {
    let dir = workspace(EXPERIENCE);
    let mut config = TomlConfig::for_input("Experience.md");
    config.output.path = "out".to_string();
    config.output.emit_json = true;

    let output_path = engine(&dir, config).run().unwrap();
    assert_eq!(
        output_path,
        Path::new("out").join("New Rezz.docx").to_string_lossy()
    );

    let body = document_xml(&dir.path().join(&output_path));
    assert!(body.contains("Jane Doe"));
    assert!(body.contains("Staff Engineer | Platform"));
    assert!(body.contains("BSc Mathematics from the College of Elsewhere, completed May 2014"));
    assert!(body.contains("March 2021 - Present (3 years, 3 months)"));
    assert!(body.contains("July 2017 - February 2021 (3 years, 7 months)"));
    assert!(body.contains("Led the order pipeline migration"));
    assert!(!body.contains("internal note"));

    // Sections appear in layout order.
    let skills = body.find("Kubernetes").unwrap();
    let education = body.find("BSc Mathematics").unwrap();
    let first_job = body.find("Northwind Traders").unwrap();
    let second_job = body.find("Contoso Ltd").unwrap();
    assert!(skills < education && education < first_job && first_job < second_job);

    let json = fs::read_to_string(dir.path().join("out").join("resume.json")).unwrap();
    let exported: TransformResult = serde_json::from_str(&json).unwrap();
    assert_eq!(exported.skills, vec!["Rust", "PostgreSQL", "Kubernetes"]);
    assert_eq!(exported.entries[1].record.company, "Contoso Ltd");
    assert_eq!(
        exported.entries[1].record.start_date,
        NaiveDate::from_ymd_opt(2017, 7, 1)
    );
}

#[test]
fn test_missing_title_aborts_without_output() {
    let experience = "\
### Skills
- Rust
### Northwind Traders
startDate: March 2021
endDate:
";
    let dir = workspace(experience);
    let err = engine(&dir, TomlConfig::for_input("Experience.md"))
        .run()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingField);
    match err {
        CvError::MissingField { heading, field, .. } => {
            assert_eq!(heading, "Northwind Traders");
            assert_eq!(field, "title");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("New Rezz.docx").exists());
}

#[test]
fn test_dry_run_stages_do_not_write() {
    let dir = workspace(EXPERIENCE);
    let engine = engine(&dir, TomlConfig::for_input("Experience.md"));

    let pipeline = engine.pipeline();
    let result = pipeline.transform(pipeline.extract().unwrap()).unwrap();

    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.entries[0].record.accolades, vec!["Led the order pipeline migration"]);
    assert!(!dir.path().join("New Rezz.docx").exists());
}

#[test]
fn test_missing_experience_file_is_io_error() {
    let dir = workspace(EXPERIENCE);
    let err = engine(&dir, TomlConfig::for_input("Nope.md"))
        .run()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
