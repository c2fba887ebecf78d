#![allow(dead_code)]

use periochart::ir::{MANDIBULAR_ORDER, MAXILLARY_ORDER};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const SECTION_MARKERS: [&str; 7] = ["TD", "BD", "DD", "CD", "AD", "RBLD", "TRLD"];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// One well-formed `START` ... `END` block.
#[derive(Clone, Debug)]
pub struct Section {
    /// Emits an `N=` line when present; otherwise the previous tooth carries over.
    pub tooth: Option<i32>,
    pub marker: &'static str,
    pub color: Option<(u8, u8, u8, u8)>,
    pub points: Vec<(i64, i64)>,
    pub size: Option<u16>,
    pub rect: bool,
}

impl Section {
    pub fn render(&self, out: &mut String) {
        out.push_str("START\n");
        if let Some(tooth) = self.tooth {
            out.push_str(&format!("N={tooth}\n"));
        }
        out.push_str(self.marker);
        out.push('\n');
        if let Some((r, g, b, a)) = self.color {
            out.push_str(&format!("C={r},{g},{b},{a}\n"));
        }
        for (x, y) in &self.points {
            out.push_str(&format!("P={x},{y}\n"));
        }
        if let Some(size) = self.size {
            out.push_str(&format!("S={size}\n"));
        }
        if self.rect {
            out.push_str("R\n");
        }
        out.push_str("END\n");
    }
}

pub fn render_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        section.render(&mut out);
    }
    out
}

pub fn fdi_teeth() -> Vec<i32> {
    MAXILLARY_ORDER
        .iter()
        .chain(MANDIBULAR_ORDER.iter())
        .map(|&n| i32::from(n))
        .collect()
}

pub fn is_fdi(n: i32) -> bool {
    fdi_teeth().contains(&n)
}

/// Mostly FDI teeth, with some out-of-range numbers.
pub fn arb_tooth() -> BoxedStrategy<i32> {
    prop_oneof![
        4 => prop::sample::select(fdi_teeth()),
        1 => -5i32..100,
    ]
    .boxed()
}

pub fn arb_non_fdi_tooth() -> BoxedStrategy<i32> {
    (-50i32..200).prop_filter("non-FDI", |n| !is_fdi(*n)).boxed()
}

pub fn arb_point() -> BoxedStrategy<(i64, i64)> {
    (-50i64..3000, -50i64..3000).boxed()
}

pub fn arb_section_with(tooth: BoxedStrategy<i32>) -> BoxedStrategy<Section> {
    (
        prop::option::weighted(0.8, tooth),
        prop::sample::select(SECTION_MARKERS.to_vec()),
        prop::option::of(any::<(u8, u8, u8, u8)>()),
        prop::collection::vec(arb_point(), 0..12),
        prop::option::of(any::<u16>()),
        prop::bool::weighted(0.1),
    )
        .prop_map(|(tooth, marker, color, points, size, rect)| Section {
            tooth,
            marker,
            color,
            points,
            size,
            rect,
        })
        .boxed()
}

pub fn arb_sections(max_sections: usize) -> BoxedStrategy<Vec<Section>> {
    prop::collection::vec(arb_section_with(arb_tooth()), 0..=max_sections).boxed()
}

/// Any line the scanner might see, including malformed ones.
pub fn arb_line() -> BoxedStrategy<String> {
    prop_oneof![
        Just("START".to_string()),
        Just("END".to_string()),
        Just("R".to_string()),
        prop::sample::select(SECTION_MARKERS.to_vec()).prop_map(str::to_string),
        "N=[-0-9a-z ]{0,4}",
        "P=[-0-9a-z, ]{0,10}",
        "C=[0-9,]{0,12}",
        "S=[-0-9x]{0,4}",
        "[ -~]{0,16}",
    ]
    .boxed()
}

pub fn arb_raw_text(max_lines: usize) -> BoxedStrategy<String> {
    prop::collection::vec(arb_line(), 0..=max_lines)
        .prop_map(|lines| lines.join("\n"))
        .boxed()
}
