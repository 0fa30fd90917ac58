//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text: (font resource, size, x, y, text).
///
/// `F1` is Helvetica and `F2` is Helvetica-Bold.
pub type TextLine<'a> = (&'a str, i64, i64, i64, &'a str);

/// Build a PDF with one page per entry of `pages`.
pub fn build_pdf(pages: &[Vec<TextLine<'_>>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let operations: Vec<Operation> = lines
            .iter()
            .flat_map(|&(font, size, x, y, text)| {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![font.into(), size.into()]),
                    Operation::new("Td", vec![x.into(), y.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text)]),
                    Operation::new("ET", vec![]),
                ]
            })
            .collect();
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A bold 16pt heading followed by an 11pt body line, per entry.
pub fn titled_page<'a>(sections: &[(&'a str, &'a str)]) -> Vec<TextLine<'a>> {
    let mut lines = Vec::new();
    let mut y = 740;
    for &(title, body) in sections {
        lines.push(("F2", 16, 72, y, title));
        lines.push(("F1", 11, 72, y - 30, body));
        y -= 90;
    }
    lines
}

/// Write `input.json` and the given PDFs under `<root>/input`.
pub fn write_input(root: &Path, input_json: &str, pdfs: &[(&str, Vec<u8>)]) {
    let pdf_dir = root.join("input").join("PDFs");
    fs::create_dir_all(&pdf_dir).unwrap();
    fs::write(root.join("input").join("input.json"), input_json).unwrap();
    for (name, data) in pdfs {
        fs::write(pdf_dir.join(name), data).unwrap();
    }
}

pub const CATERING_INPUT: &str = r#"{
    "challenge_info": {"challenge_id": "round_1b_001"},
    "persona": {"role": "Food Contractor", "expertise": "corporate catering"},
    "job_to_be_done": {"task": "Prepare a vegetarian buffet-style dinner menu"}
}"#;
