//! End-to-end extraction from generated PDFs and spreadsheet ranges.

mod common;

use calamine::{Data, Range};
use common::{build_pdf, build_pdf_inherited, PageBuilder, PAGE_HEIGHT, PAGE_WIDTH};
use dossier::extract::border::column_index;
use dossier::extract::extract_rows;
use dossier::model::START_OF_DOCUMENT;
use dossier::render::{self, TextSummary};
use dossier::{ContentBlock, Dossier, Error, PdfParser, RealEstateRecord, SegmentOptions};

fn report_page() -> PageBuilder {
    PageBuilder::new()
        .text(50.0, 800.0, "Аналітична довідка")
        .banner(30.0, 700.0, 535.0, 20.0)
        .text(40.0, 706.0, "Адреса")
        .text(50.0, 680.0, "м. Київ, вул. Хрещатик, 1")
        .text(50.0, 666.0, "кв. 5")
        .banner(30.0, 600.0, 535.0, 20.0)
        .text(40.0, 606.0, "Освіта")
        .text(50.0, 580.0, "КНУ імені Тараса Шевченка")
}

#[test]
fn test_segment_report() {
    let pdf = build_pdf(vec![report_page()]);
    let blocks = dossier::segment_bytes(&pdf).unwrap();

    assert_eq!(
        blocks,
        vec![
            ContentBlock::new(START_OF_DOCUMENT, "Аналітична довідка"),
            ContentBlock::new("Адреса", "м. Київ, вул. Хрещатик, 1 кв. 5"),
            ContentBlock::new("Освіта", "КНУ імені Тараса Шевченка"),
        ]
    );
}

#[test]
fn test_segment_continues_across_pages() {
    let second = PageBuilder::new().text(50.0, 800.0, "Київський політехнічний інститут");
    let pdf = build_pdf(vec![report_page(), second]);
    let blocks = dossier::segment_bytes(&pdf).unwrap();

    assert_eq!(blocks.len(), 3);
    assert_eq!(
        blocks[2].content,
        "КНУ імені Тараса Шевченка Київський політехнічний інститут"
    );
}

#[test]
fn test_blocks_cover_every_run_once() {
    let pages = vec![
        PageBuilder::new()
            .text(50.0, 800.0, "вступ")
            .banner(30.0, 700.0, 535.0, 20.0)
            .text(40.0, 706.0, "Адреса")
            .lines(50.0, 680.0, &["альфа", "бета"])
            .banner(30.0, 600.0, 535.0, 20.0)
            .text(40.0, 606.0, "Освіта")
            .text(50.0, 580.0, "гамма"),
        PageBuilder::new()
            .lines(50.0, 800.0, &["дельта", "епсилон"])
            .banner(30.0, 700.0, 535.0, 20.0)
            .text(40.0, 706.0, "Телефони")
            .text(50.0, 680.0, "дзета"),
        PageBuilder::new()
            .banner(30.0, 780.0, 535.0, 20.0)
            .text(40.0, 786.0, "Транспорт")
            .lines(50.0, 760.0, &["ета", "тета"]),
    ];
    let blocks = dossier::segment_bytes(&build_pdf(pages)).unwrap();

    let headers: Vec<&str> = blocks.iter().map(|b| b.header.as_str()).collect();
    assert_eq!(
        headers,
        vec![START_OF_DOCUMENT, "Адреса", "Освіта", "Телефони", "Транспорт"]
    );

    let covered: Vec<&str> = blocks
        .iter()
        .flat_map(|b| {
            let header = (!b.is_start_of_document()).then_some(b.header.as_str());
            header.into_iter().chain(b.content.split_whitespace())
        })
        .collect();
    assert_eq!(
        covered,
        vec![
            "вступ", "Адреса", "альфа", "бета", "Освіта", "гамма", "дельта", "епсилон",
            "Телефони", "дзета", "Транспорт", "ета", "тета",
        ]
    );
}

#[test]
fn test_segment_without_banners() {
    let page = PageBuilder::new().lines(50.0, 800.0, &["Перший рядок", "Другий рядок"]);
    let blocks = dossier::segment_bytes(&build_pdf(vec![page])).unwrap();

    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].is_start_of_document());
    assert_eq!(blocks[0].content, "Перший рядок Другий рядок");
}

#[test]
fn test_narrow_strips_are_not_banners() {
    let page = PageBuilder::new()
        .banner(30.0, 700.0, 100.0, 20.0)
        .text(40.0, 706.0, "Підпис")
        .text(50.0, 680.0, "текст");
    let blocks = Dossier::new()
        .with_segment_options(SegmentOptions::new().with_min_width_ratio(0.4))
        .segment_bytes(&build_pdf(vec![page]))
        .unwrap();

    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].is_start_of_document());
}

#[test]
fn test_segment_rejects_non_pdf() {
    let err = dossier::segment_bytes(b"plain text").unwrap_err();
    assert!(err.is_format_error());
}

const PERSON_LINES: &[&str] = &[
    "ДЕРЖАВНА МІГРАЦІЙНА СЛУЖБА",
    "ІНФОРМАЦІЯ ПРО ОСОБУ",
    "Прізвище",
    "ПЕТРЕНКО",
    "Ім'я",
    "ІВАН",
    "По батькові",
    "ПЕТРОВИЧ",
    "Дата народження: 01.02.1990",
    "УНЗР",
    "19900201-12345",
    "РНОКПП",
    "1234567890",
    "Телефон",
    "+380501234567",
    "Місце народження",
    "УКРАЇНА",
    "М. КИЇВ",
    "Адреса місця проживання/",
    "перебування",
    "02000 М. КИЇВ",
    "ВУЛ. ХРЕЩАТИК",
    "БУД. 1/КВ. 5",
    "Реєстраційний",
    "Номер",
    "Паспорт громадянина України",
    "Номер",
    "001234567",
    "Дата видачі:",
    "01.03.2016",
    "Дійсний до:",
    "01.03.2026",
];

#[test]
fn test_person_from_pdf() {
    let page = PageBuilder::new()
        .lines(50.0, 800.0, PERSON_LINES)
        .cmyk_image(2, 1, vec![0, 0, 0, 0, 0, 255, 255, 0]);
    let person = dossier::extract_person_bytes(&build_pdf(vec![page])).unwrap();

    assert_eq!(person.full_name, "ПЕТРЕНКО ІВАН ПЕТРОВИЧ");
    assert_eq!(person.birth_date, "01.02.1990");
    assert_eq!(person.tax_id, "1234567890");
    assert_eq!(person.phone, "+380501234567");
    assert_eq!(person.residence_address, "м. Київ вул. Хрещатик буд. 1, кв. 5");
    assert_eq!(person.documents.len(), 1);
    assert_eq!(person.documents[0].number, "001234567");

    let photo = person.photo.as_ref().expect("photo on first page");
    assert_eq!((photo.width, photo.height), (2, 1));
    assert!(photo.data.starts_with(b"\x89PNG"));

    let text = person.to_text();
    assert!(text.starts_with("ПЕТРЕНКО ІВАН ПЕТРОВИЧ\nДата народження: 01.02.1990"));
    assert!(text.contains("Паспорт громадянина України 001234567 від 01.03.2016 дійсний до: 01.03.2026"));
}

#[test]
fn test_person_photo_from_inherited_resources() {
    let page = PageBuilder::new()
        .lines(50.0, 800.0, PERSON_LINES)
        .cmyk_image(2, 1, vec![0, 0, 0, 0, 0, 255, 255, 0]);
    let pdf = build_pdf_inherited(vec![page]);

    let layouts = PdfParser::from_bytes(&pdf).unwrap().layouts().unwrap();
    assert_eq!(layouts[0].width, PAGE_WIDTH as f32);
    assert_eq!(layouts[0].height, PAGE_HEIGHT as f32);

    let person = dossier::extract_person_bytes(&pdf).unwrap();
    assert_eq!(person.full_name, "ПЕТРЕНКО ІВАН ПЕТРОВИЧ");
    let photo = person.photo.as_ref().expect("photo from the page tree");
    assert_eq!((photo.width, photo.height), (2, 1));
}

#[test]
fn test_person_without_marker() {
    let page = PageBuilder::new().lines(50.0, 800.0, &["Прізвище", "ПЕТРЕНКО"]);
    let err = dossier::extract_person_bytes(&build_pdf(vec![page])).unwrap_err();
    assert!(matches!(err, Error::MissingMarker(_)));
}

#[test]
fn test_real_estate_from_pdf() {
    let page = PageBuilder::new().lines(
        50.0,
        800.0,
        &[
            "Інформація з Державного реєстру речових прав на нерухоме майно",
            "Актуальна інформація про об'єкт речових прав",
            "Тип об'єкта: квартира, об'єкт житлової нерухомості",
            "Адреса: м. Київ, вул. Хрещатик, 1",
            "Актуальна інформація про речове право",
            "Дата, час державної реєстрації: 01.02.2015 10:00:00",
            "Розмір частки: 1/2",
        ],
    );
    let records = dossier::extract_real_estate_bytes(&build_pdf(vec![page])).unwrap();

    assert_eq!(records.len(), 1);
    let RealEstateRecord::PropertyObject(object) = &records[0] else {
        panic!("expected a property object");
    };
    assert_eq!(object.object_type.as_deref(), Some("квартира"));
    assert_eq!(object.address.as_deref(), Some("м. Київ, вул. Хрещатик, 1"));
    assert_eq!(object.share_size.as_deref(), Some("1/2"));
    assert_eq!(
        render::real_estate_text(&records),
        "Тип об'єкта: квартира\nАдреса: м. Київ, вул. Хрещатик, 1\nРозмір частки: 1/2\n\
         Дата, час державної реєстрації: 01.02.2015 10:00:00"
    );
}

#[test]
fn test_real_estate_nearly_empty_pdf() {
    let page = PageBuilder::new().text(50.0, 800.0, "порожньо");
    let err = dossier::extract_real_estate_bytes(&build_pdf(vec![page])).unwrap_err();
    assert!(err.is_format_error());
}

fn set(range: &mut Range<Data>, column: &str, row: u32, value: &str) {
    let col = column_index(column).unwrap();
    range.set_value((row - 1, col), Data::String(value.to_string()));
}

#[test]
fn test_border_rows_skip_cancelled() {
    let mut range: Range<Data> = Range::new((0, 0), (8, 45));
    set(&mut range, "AA", 3, "1");
    for row in 3..=7 {
        let direction = if row == 5 { "Скасовано" } else { "Виїзд" };
        set(&mut range, "A", row, direction);
        set(&mut range, "L", row, &format!("0{}.02.2024 10:00:00", row));
        set(&mut range, "M", row, "ПЕТРЕНКО ІВАН");
    }
    set(&mut range, "G", 3, "Ягодин");
    set(&mut range, "J", 3, "Ягодин  ");
    set(&mut range, "AF", 3, "легковий ");
    set(&mut range, "AH", 3, "TOYOTA");
    set(&mut range, "AQ", 3, "AA1234BB");

    let rows = extract_rows(&range).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].timestamp, "04.02.2024 10:00:00");
    assert_eq!(rows[2].timestamp, "06.02.2024 10:00:00");

    let status = render::border_status(&rows).unwrap();
    assert!(status.contains(
        "Виїхав з України 03.02.2024 10:00:00 п/п Ягодин ділянка Ягодин на легковий TOYOTA AA1234BB"
    ));
    assert!(render::border_text(&rows).contains("1. Перетин кордону\nВиїзд | "));
}

#[test]
fn test_border_layout_mismatch() {
    let mut range: Range<Data> = Range::new((0, 0), (4, 30));
    set(&mut range, "A", 3, "Виїзд");
    assert!(matches!(extract_rows(&range), Err(Error::Format(_))));
}
