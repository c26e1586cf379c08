//! PDF fixtures generated in memory with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Text placed at an absolute position: (x, y, text).
pub type Placed<'a> = (f32, f32, &'a str);

/// Build a PDF with one page per entry, each showing its text in 12pt
/// Courier at the given positions.
pub fn build_pdf(pages: &[Vec<Placed>], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for placed in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
        ];
        for (x, y, text) in placed {
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    Object::Real(*x),
                    Object::Real(*y),
                ],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

/// A spec sheet page: a heading line, a three-line paragraph and a
/// three-row table.
pub fn spec_sheet_page() -> Vec<Placed<'static>> {
    vec![
        (72.0, 760.0, "SPECIFICATIONS"),
        (72.0, 730.0, "Rated values at 25 C."),
        (72.0, 716.0, "Measured on the test bench."),
        (72.0, 702.0, "See notes below."),
        (72.0, 670.0, "Model"),
        (250.0, 670.0, "Power"),
        (72.0, 656.0, "X1"),
        (250.0, 656.0, "5kW"),
        (72.0, 642.0, "X2"),
        (250.0, 642.0, "7kW"),
    ]
}
