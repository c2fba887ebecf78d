use periochart::ir::io_ini::from_ini_str;
use periochart::ir::{AnnotationKind, Point, ToothNumber};
use proptest::prelude::*;

mod proptest_helpers;

use proptest_helpers::{arb_raw_text, arb_sections, render_sections};

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn record_points_match_point_lines(sections in arb_sections(12)) {
        let doc = from_ini_str(&render_sections(&sections));

        let paths: Vec<_> = sections.iter().filter(|s| !s.rect).collect();
        let rects: Vec<_> = sections.iter().filter(|s| s.rect).collect();
        prop_assert_eq!(doc.records.len(), paths.len());
        prop_assert_eq!(doc.rectangles.len(), rects.len());

        for (record, section) in doc.records.iter().zip(&paths) {
            let expected: Vec<Point> = section
                .points
                .iter()
                .map(|&(x, y)| Point::new(x, y))
                .collect();
            prop_assert_eq!(&record.points, &expected);
        }
        prop_assert!(doc.diagnostics.iter().all(|d| d.line > 0));
    }

    #[test]
    fn tooth_collections_concatenate_in_file_order(sections in arb_sections(12)) {
        let doc = from_ini_str(&render_sections(&sections));

        for (&tooth, annotations) in &doc.teeth {
            for kind in [
                AnnotationKind::ToothOutline,
                AnnotationKind::BoneLevel,
                AnnotationKind::CejLevel,
                AnnotationKind::TlaLine,
            ] {
                let expected: Vec<Point> = doc
                    .records
                    .iter()
                    .filter(|r| r.tooth == Some(tooth) && r.kind == kind)
                    .flat_map(|r| r.points.iter().copied())
                    .collect();
                match annotations.points(kind) {
                    Some(points) => prop_assert_eq!(points, &expected[..]),
                    None => prop_assert!(expected.is_empty()),
                }
            }
        }
    }

    #[test]
    fn outline_extremes_bound_outline_points(sections in arb_sections(12)) {
        let doc = from_ini_str(&render_sections(&sections));

        for (tooth, ext) in &doc.extremes {
            prop_assert!(ext.min_y <= ext.max_y);
            let outline = doc
                .points(*tooth, AnnotationKind::ToothOutline)
                .unwrap_or_default();
            prop_assert!(outline.iter().filter_map(|p| p.y).all(|y| ext.min_y <= y && y <= ext.max_y));
            prop_assert!(outline.iter().any(|p| p.y == Some(ext.min_y)));
            prop_assert!(outline.iter().any(|p| p.y == Some(ext.max_y)));
        }
    }

    #[test]
    fn parsing_is_idempotent(text in arb_raw_text(60)) {
        let first = from_ini_str(&text);
        let second = from_ini_str(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn reserved_kinds_never_reach_tooth_collections(text in arb_raw_text(60)) {
        let doc = from_ini_str(&text);

        for record in &doc.records {
            if record.kind.is_reserved() {
                prop_assert!(doc
                    .points(record.tooth.unwrap_or(ToothNumber::new(-1)), record.kind)
                    .is_none());
            }
        }
    }

    #[test]
    fn garbage_never_panics_and_bytes_match_text(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let from_bytes = periochart::ir::io_ini::from_ini_slice(&bytes);
        match std::str::from_utf8(&bytes) {
            Ok(text) => {
                let doc = from_bytes.expect("utf-8 input parses");
                prop_assert_eq!(doc, from_ini_str(text));
            }
            Err(_) => prop_assert!(from_bytes.is_err()),
        }
    }
}
