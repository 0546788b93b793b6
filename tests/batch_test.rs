//! File-based entry points and batch behavior.

mod common;

use std::fs;
use std::path::PathBuf;

use common::{build_pdf, PageBuilder};
use dossier::render::{self, JsonFormat};
use dossier::{process_batch, Dossier, TaggedBlock};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn report(caption: &str, body: &str) -> Vec<u8> {
    build_pdf(vec![PageBuilder::new()
        .banner(30.0, 700.0, 535.0, 20.0)
        .text(40.0, 706.0, caption)
        .text(50.0, 680.0, body)])
}

#[test]
fn test_batch_keeps_going_after_failure() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write(&dir, "first.pdf", &report("Освіта", "КНУ")),
        write(&dir, "broken.pdf", b"%PDF-1.5 truncated"),
        write(&dir, "second.pdf", &report("Адреса", "м. Львів")),
    ];

    let extractor = Dossier::new();
    let batch = process_batch(&inputs, |path| extractor.segment_file(path));

    assert_eq!(batch.len(), 3);
    assert!(!batch.all_failed());
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].file_name, "broken.pdf");
    assert!(batch.failures[0].to_string().starts_with("broken.pdf: "));

    let names: Vec<&str> = batch.successes.iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(names, vec!["first.pdf", "second.pdf"]);
}

#[test]
fn test_batch_all_failed() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write(&dir, "notes.txt", "Прізвище: Петренко".as_bytes())];

    let batch = process_batch(&inputs, |path| Dossier::new().segment_file(path));
    assert!(batch.all_failed());
    assert!(batch.failures[0].error.is_format_error());
}

#[test]
fn test_merged_report_order() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write(&dir, "a.pdf", &report("Освіта", "КНУ")),
        write(&dir, "b.pdf", &report("Адреса", "м. Львів")),
    ];

    let batch = process_batch(&inputs, |path| dossier::segment_file(path));
    let mut blocks: Vec<TaggedBlock> = batch
        .successes
        .iter()
        .flat_map(|s| TaggedBlock::tag_all(&s.file_name, &s.value))
        .collect();
    dossier::model::order_for_report(&mut blocks);

    assert_eq!(blocks[0].block.header, "Адреса");
    assert_eq!(blocks[0].source, "b.pdf");
    assert_eq!(render::to_text(&blocks[..1]), "[b.pdf #1] Адреса\nм. Львів");

    let json = render::to_json(&blocks, JsonFormat::Compact).unwrap();
    assert!(json.starts_with(r#"[{"source":"b.pdf","index":0,"header":"Адреса""#));
}

#[test]
fn test_text_inputs() {
    let dir = TempDir::new().unwrap();

    let vehicle = write(
        &dir,
        "vehicle.txt",
        "Номерний знак: AA1234BB\nVIN: JTNB11HK103000000\n".as_bytes(),
    );
    let record = dossier::extract_vehicle_file(&vehicle).unwrap();
    assert_eq!(record.plate_number.as_deref(), Some("AA1234BB"));
    assert_eq!(record.vin.as_deref(), Some("JTNB11HK103000000"));

    let insurance = write(
        &dir,
        "pfu.txt",
        "ТОВ \"РОМАШКА\" - 12345678 31.01.2024".as_bytes(),
    );
    let record = dossier::extract_insurance_file(&insurance).unwrap();
    assert_eq!(record.code.as_deref(), Some("12345678"));
    assert!(render::insurance_text(&record, None)
        .starts_with("Інформація з ПФУ: Останній страховий внесок був 31.01.2024."));

    let manual = write(&dir, "manual.txt", "Прізвище: Петренко Іван\n".as_bytes());
    let person = dossier::extract_manual_person_file(&manual).unwrap();
    assert_eq!(person.full_name, "Петренко Іван");
}

#[test]
fn test_text_entry_points_reject_pdf() {
    let dir = TempDir::new().unwrap();
    let pdf = write(&dir, "report.pdf", &report("Освіта", "КНУ"));

    assert!(dossier::extract_insurance_file(&pdf).unwrap_err().is_format_error());
    assert!(dossier::extract_vehicle_file(&pdf).unwrap_err().is_format_error());
    assert!(dossier::extract_border_crossings_file(&pdf)
        .unwrap_err()
        .is_format_error());
}
