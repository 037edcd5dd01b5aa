//! End-to-end integration tests for images2pdf.
//!
//! All fixtures are generated in memory or into `tempfile` directories, so
//! the suite runs hermetically — no network, no checked-in binaries.

use images2pdf::{
    convert_and_deliver, convert_dir_to_pdf, convert_images_to_pdf, convert_images_to_pdf_sync,
    AlwaysConfirm, ConversionProgress, ConversionProgressCallback, ImageError, ImageSource,
    Images2PdfError, MemorySink, PdfConfig,
};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn png_bytes(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb(rgb));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("in-memory PNG encode");
    buf
}

fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([10, 120, 240]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .expect("in-memory JPEG encode");
    buf
}

fn png_source(name: &str, w: u32, h: u32) -> ImageSource {
    ImageSource::from_bytes(name, png_bytes(w, h, [200, 40, 40]))
}

/// Records every progress event for later assertions.
#[derive(Default)]
struct RecordingCallback {
    started_with: Mutex<Option<usize>>,
    events: Mutex<Vec<ConversionProgress>>,
    completed_with: Mutex<Option<(usize, usize)>>,
}

impl ConversionProgressCallback for RecordingCallback {
    fn on_conversion_start(&self, total: usize) {
        *self.started_with.lock().unwrap() = Some(total);
    }

    fn on_image_complete(&self, progress: &ConversionProgress) {
        self.events.lock().unwrap().push(progress.clone());
    }

    fn on_image_error(&self, progress: &ConversionProgress, _error: &ImageError) {
        self.events.lock().unwrap().push(progress.clone());
    }

    fn on_conversion_complete(&self, total: usize, succeeded: usize) {
        *self.completed_with.lock().unwrap() = Some((total, succeeded));
    }
}

// ── Ordering ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn page_order_is_independent_of_input_order() {
    let forward = vec![
        png_source("a.png", 40, 30),
        png_source("b.png", 40, 30),
        png_source("c.png", 40, 30),
    ];
    let backward = vec![
        png_source("c.png", 40, 30),
        png_source("a.png", 40, 30),
        png_source("b.png", 40, 30),
    ];

    let config = PdfConfig::default();
    let out1 = convert_images_to_pdf(forward, &config).await.unwrap();
    let out2 = convert_images_to_pdf(backward, &config).await.unwrap();

    assert_eq!(out1.page_names(), vec!["a.png", "b.png", "c.png"]);
    assert_eq!(out1.page_names(), out2.page_names());
}

// ── Error isolation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn corrupt_image_is_skipped_and_batch_continues() {
    let cb = Arc::new(RecordingCallback::default());
    let config = PdfConfig::builder()
        .progress_callback(Arc::clone(&cb) as Arc<dyn ConversionProgressCallback>)
        .build()
        .unwrap();

    let sources = vec![
        png_source("01.png", 40, 30),
        ImageSource::from_bytes("02.png", b"definitely not a png".to_vec()),
        png_source("03.png", 40, 30),
    ];

    let out = convert_images_to_pdf(sources, &config).await.unwrap();

    // N pages from N valid images; the corrupt one committed nothing
    assert_eq!(out.stats.processed_images, 2);
    assert_eq!(out.stats.failed_images, 1);
    assert_eq!(out.page_names(), vec!["01.png", "03.png"]);

    // the failed item kept its slot in the records, without a page number
    let failed = &out.items[1];
    assert_eq!(failed.name, "02.png");
    assert!(failed.page.is_none());
    assert!(matches!(failed.error, Some(ImageError::Decode { .. })));

    // N+1 progress events (one per attempt), final percentage 100
    let events = cb.events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events.last().unwrap().percentage, 100);
    assert_eq!(events[1].current_label, "error: 02.png");
    assert_eq!(*cb.started_with.lock().unwrap(), Some(3));
    assert_eq!(*cb.completed_with.lock().unwrap(), Some((3, 2)));
}

#[tokio::test]
async fn oversize_image_is_skipped_with_warning_not_fatal() {
    // gradient content so the "big" fixture stays meaningfully larger than
    // the solid-colour small one after PNG compression
    let gradient = image::RgbImage::from_fn(256, 256, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut big_bytes = Vec::new();
    image::DynamicImage::ImageRgb8(gradient)
        .write_to(&mut Cursor::new(&mut big_bytes), image::ImageFormat::Png)
        .unwrap();
    let big_len = big_bytes.len() as u64;
    let big = ImageSource::from_bytes("big.png", big_bytes);

    let small = png_source("a.png", 16, 16);
    let small_len = match &small.data {
        images2pdf::SourceData::Bytes(b) => b.len() as u64,
        _ => unreachable!(),
    };
    assert!(small_len < big_len);

    // limit sits between the two fixture sizes
    let config = PdfConfig::builder()
        .max_source_bytes(big_len - 1)
        .build()
        .unwrap();

    let out = convert_images_to_pdf(vec![big, small], &config).await.unwrap();
    assert_eq!(out.stats.processed_images, 1);
    assert_eq!(out.page_names(), vec!["a.png"]);
    assert!(matches!(
        out.items.iter().find(|i| i.name == "big.png").unwrap().error,
        Some(ImageError::Oversize { .. })
    ));
}

#[tokio::test]
async fn all_failures_produce_no_document() {
    let sources = vec![
        ImageSource::from_bytes("x.png", b"junk".to_vec()),
        ImageSource::from_bytes("y.jpg", b"junk".to_vec()),
    ];
    let err = convert_images_to_pdf(sources, &PdfConfig::default()).await;
    assert!(matches!(
        err,
        Err(Images2PdfError::NoImagesProcessed { total: 2, .. })
    ));
}

// ── Idempotence ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn same_inputs_twice_give_same_pages_and_captions() {
    let make = || {
        vec![
            png_source("z.png", 60, 40),
            png_source("m.png", 40, 60),
            ImageSource::from_bytes("q.jpeg", jpeg_bytes(32, 32)),
        ]
    };
    let config = PdfConfig::default();

    let out1 = convert_images_to_pdf(make(), &config).await.unwrap();
    let out2 = convert_images_to_pdf(make(), &config).await.unwrap();

    assert_eq!(out1.stats.processed_images, out2.stats.processed_images);
    assert_eq!(out1.page_names(), out2.page_names());
    assert_eq!(out1.page_names(), vec!["m.png", "q.jpeg", "z.png"]);
}

// ── Large-batch gate ─────────────────────────────────────────────────────────

#[tokio::test]
async fn over_threshold_without_confirmation_is_cancelled() {
    let sources: Vec<ImageSource> = (0..4)
        .map(|i| png_source(&format!("{i:02}.png"), 8, 8))
        .collect();
    let config = PdfConfig::builder()
        .large_batch_threshold(3)
        .build()
        .unwrap();

    let sink = MemorySink::new();
    let err = convert_and_deliver(sources, &config, "out.pdf", &sink).await;
    assert!(matches!(
        err,
        Err(Images2PdfError::CancelledByUser { total: 4 })
    ));
    // no partial document was delivered
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn over_threshold_with_confirmation_proceeds() {
    let sources: Vec<ImageSource> = (0..4)
        .map(|i| png_source(&format!("{i:02}.png"), 8, 8))
        .collect();
    let config = PdfConfig::builder()
        .large_batch_threshold(3)
        .confirmation(Arc::new(AlwaysConfirm))
        .build()
        .unwrap();

    let out = convert_images_to_pdf(sources, &config).await.unwrap();
    assert_eq!(out.stats.processed_images, 4);
}

// ── Directory flow (script mode) ─────────────────────────────────────────────

#[tokio::test]
async fn folder_scenario_filters_sorts_and_numbers_pages() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.png"), png_bytes(40, 30, [0, 200, 0])).unwrap();
    std::fs::write(dir.path().join("a.jpg"), jpeg_bytes(30, 40)).unwrap();
    std::fs::write(dir.path().join("c.txt"), b"not an image").unwrap();

    let output = dir.path().join("out.pdf");
    let output_str = output.to_string_lossy().to_string();

    let stats = convert_dir_to_pdf(dir.path(), &output_str, &PdfConfig::default())
        .await
        .unwrap();

    assert_eq!(stats.filtered_out, 1); // c.txt
    assert_eq!(stats.total_images, 2);
    assert_eq!(stats.processed_images, 2);
    assert_eq!(stats.failed_images, 0);

    let pdf = std::fs::read(&output).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert_eq!(stats.output_bytes, pdf.len());
}

#[tokio::test]
async fn page_records_carry_footer_numbering() {
    let sources = vec![
        png_source("b.png", 40, 30),
        ImageSource::from_bytes("a.jpg", jpeg_bytes(30, 40)),
        ImageSource::from_bytes("c.txt", b"not an image".to_vec()),
    ];
    let out = convert_images_to_pdf(sources, &PdfConfig::default())
        .await
        .unwrap();

    // c.txt filtered before the batch, a.jpg sorts first
    assert_eq!(out.stats.filtered_out, 1);
    assert_eq!(out.items.len(), 2);
    assert_eq!(out.items[0].name, "a.jpg");
    assert_eq!(out.items[0].page, Some(1));
    assert_eq!(out.items[1].name, "b.png");
    assert_eq!(out.items[1].page, Some(2));
}

#[tokio::test]
async fn missing_folder_fails_before_any_work() {
    let err = convert_dir_to_pdf("/no/such/folder", "out.pdf", &PdfConfig::default()).await;
    assert!(matches!(err, Err(Images2PdfError::FolderNotFound { .. })));
}

#[tokio::test]
async fn folder_with_no_supported_images_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.md"), b"hello").unwrap();

    let output = dir.path().join("out.pdf");
    let err = convert_dir_to_pdf(
        dir.path(),
        &output.to_string_lossy(),
        &PdfConfig::default(),
    )
    .await;

    assert!(matches!(
        err,
        Err(Images2PdfError::NoSupportedImages { .. })
    ));
    assert!(!output.exists());
}

// ── Delivery ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn memory_sink_receives_the_finished_document() {
    let sink = MemorySink::new();
    let stats = convert_and_deliver(
        vec![png_source("only.png", 32, 32)],
        &PdfConfig::default(),
        "only.pdf",
        &sink,
    )
    .await
    .unwrap();

    let delivered = sink.take();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "only.pdf");
    assert!(delivered[0].1.starts_with(b"%PDF"));
    assert_eq!(stats.output_bytes, delivered[0].1.len());
}

// ── Sync wrapper ─────────────────────────────────────────────────────────────

#[test]
fn sync_wrapper_runs_outside_a_runtime() {
    let out = convert_images_to_pdf_sync(
        vec![png_source("one.png", 24, 24)],
        &PdfConfig::default(),
    )
    .unwrap();
    assert_eq!(out.stats.processed_images, 1);
    assert!(out.pdf.starts_with(b"%PDF"));
}
