use std::cell::Cell;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use image::io::Reader as ImageReader;
use piecraft_core::Recipe;
use piecraft_printing::{
    export_recipe, preview_file_name, Artifact, ArtifactSink, ExportError, ExportOptions,
    ExportState, FileSink, FontMetrics, HeaderFooterTemplate, Helvetica, Margin, MemorySink,
    Orientation, PaperSize, PreviewCache, PreviewConfig, PreviewKey, RecipeLayoutEngine,
    TextRole,
};
use tempfile::tempdir;

fn fixture(name: &str) -> Recipe {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.ron"));
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("Failed to read {:?}: {err}", path));
    ron::de::from_str(&text).unwrap_or_else(|err| panic!("Failed to parse {:?}: {err}", path))
}

struct RefusingSink {
    calls: Cell<usize>,
}

impl ArtifactSink for RefusingSink {
    type Error = String;

    fn deliver(&self, artifact: &Artifact<'_>) -> Result<(), Self::Error> {
        self.calls.set(self.calls.get() + 1);
        Err(format!("disk full while writing {}", artifact.file_name))
    }
}

#[test]
fn export_writes_pdf_and_caches_decodable_previews() {
    let recipe = fixture("grand_feast");
    let dir = tempdir().unwrap();
    let sink = FileSink::new(dir.path());
    let options = ExportOptions::default();
    let mut cache = PreviewCache::with_capacity(8);

    let result = export_recipe(
        &RecipeLayoutEngine::new(),
        &recipe,
        &options,
        &sink,
        Some(PreviewConfig {
            cache: &mut cache,
            zoom_levels: &[25, 50],
            base_dpi: 96,
        }),
    )
    .expect("export succeeds");

    assert_eq!(result.state, ExportState::Completed);
    assert_eq!(
        result.file_name,
        "grand_wizard's_celestial_feast_pie_of_the_seven_moons_recipe.pdf"
    );
    let written = fs::read(sink.path_for(&result.file_name)).unwrap();
    assert!(written.starts_with(b"%PDF-1.4"));
    assert_eq!(written, result.pdf_data);

    let (page_width, page_height) = options.page_size();
    for page in 1..=result.summary.total_pages {
        let key = PreviewKey {
            job_id: options.job_id,
            page,
            zoom_percent: 50,
        };
        let entry = cache.get(&key).expect("preview cached").clone();
        let decoded = ImageReader::new(Cursor::new(entry.data))
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        let scale = entry.dpi as f32 / 72.0;
        assert_eq!(decoded.width(), (page_width * scale).ceil() as u32);
        assert_eq!(decoded.height(), (page_height * scale).ceil() as u32);
    }
    assert_eq!(
        preview_file_name(&recipe, 1),
        "grand_wizard's_celestial_feast_pie_of_the_seven_moons_recipe_p1.png"
    );
}

#[test]
fn failed_delivery_is_reported() {
    let sink = RefusingSink {
        calls: Cell::new(0),
    };
    let err = export_recipe(
        &RecipeLayoutEngine::new(),
        &fixture("plain_apple"),
        &ExportOptions::default(),
        &sink,
        None,
    )
    .unwrap_err();
    assert_eq!(sink.calls.get(), 1);
    match err {
        ExportError::Delivery { file_name, message } => {
            assert_eq!(file_name, "simple_apple_pie_recipe.pdf");
            assert!(message.contains("disk full"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn custom_templates_and_paper_flow_through() {
    let footer = HeaderFooterTemplate::parse("&l&t&r&y").unwrap();
    let options = ExportOptions::new(
        PaperSize::LETTER,
        Orientation::Portrait,
        Margin::from_mm(20.0, 30.0, 20.0, 20.0),
        footer,
        HeaderFooterTemplate::page_indicator(),
    );
    let recipe = fixture("long_step");
    let dir = tempdir().unwrap();
    let result = export_recipe(
        &RecipeLayoutEngine::new(),
        &recipe,
        &options,
        &FileSink::new(dir.path()),
        None,
    )
    .unwrap();

    let footers: Vec<&str> = result.pages[0]
        .display_list
        .glyph_runs()
        .filter(|run| run.role == TextRole::Footer)
        .map(|run| run.text.as_str())
        .collect();
    assert_eq!(footers, vec!["Savory Mushroom Tart", "Savory Pie"]);
    assert!(String::from_utf8_lossy(&result.pdf_data).contains("/MediaBox [0 0 612.000 792.000]"));
}

#[test]
fn tight_margins_keep_body_text_on_card_and_above_footer() {
    let mut recipe = fixture("grand_feast");
    recipe
        .instructions
        .extend((0..150).map(|n| format!("Fold layer {n} of the moonlit pastry gently.")));
    let mut options = ExportOptions::default();
    options.margins = Margin::from_mm(10.0, 10.0, 10.0, 10.0);

    let sink = MemorySink::new();
    let result =
        export_recipe(&RecipeLayoutEngine::new(), &recipe, &options, &sink, None).unwrap();
    assert!(result.summary.total_pages > 1);

    let (page_width, page_height) = options.page_size();
    let footer_top = page_height - options.footer_band_height();
    let inset = options.frame_inset;
    for page in &result.pages {
        let runs: Vec<_> = page.display_list.glyph_runs().collect();
        assert!(runs.iter().any(|run| run.role == TextRole::Footer));
        for run in runs.iter().filter(|run| run.role != TextRole::Footer) {
            assert!(
                run.position.y + run.font_size_pt <= footer_top,
                "page {}: {:?} reaches the footer",
                page.page_number,
                run.text
            );
            assert!(run.position.x >= inset, "{:?} left of the card", run.text);
            assert!(run.position.y >= inset, "{:?} above the card", run.text);
            let width = Helvetica.text_width(&run.text, run.font_size_pt);
            assert!(
                run.position.x + width <= page_width - inset + 0.5,
                "{:?} right of the card",
                run.text
            );
        }
    }
    assert_eq!(sink.drain().len(), 1);
}
