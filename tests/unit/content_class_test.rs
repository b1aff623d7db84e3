/// Property-based tests for upload classification and the canned result
///
/// Classification depends only on the lower-cased extension; the result body
/// always echoes the upload and never leaks state between requests.

use docproc_harness::conversion::models::{
    CANNED_PROCESSING_TIME_SECS, DOCUMENT_TEMPLATE, IMAGE_TEMPLATE,
};
use docproc_harness::conversion::services::build_result;
use docproc_harness::conversion::{ContentClass, ConversionRequest};
use proptest::prelude::*;
use std::time::Duration;

fn request(filename: &str, size: u64) -> ConversionRequest {
    ConversionRequest {
        original_filename: filename.to_string(),
        file_size: size,
        content_class: ContentClass::from_filename(filename),
        delay: Duration::from_millis(1000),
        delay_overridden: false,
        simulate_error: false,
    }
}

/// Randomly upper-cases characters of `ext`
fn mixed_case(ext: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), ext.len()).prop_map(move |flags| {
        ext.chars()
            .zip(flags)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    /// Property: image extensions classify as image regardless of case or stem
    #[test]
    fn test_image_extensions_any_case(
        stem in "[a-zA-Z0-9_-]{1,24}",
        ext in prop_oneof![mixed_case("png"), mixed_case("jpg"), mixed_case("jpeg")],
    ) {
        let filename = format!("{}.{}", stem, ext);
        prop_assert_eq!(ContentClass::from_filename(&filename), ContentClass::Image);
        prop_assert_eq!(ContentClass::from_filename(&filename).file_type(), "image");
    }

    /// Property: pdf extensions classify as pdf regardless of case
    #[test]
    fn test_pdf_extension_any_case(stem in "[a-z0-9 ]{1,24}", ext in mixed_case("pdf")) {
        let filename = format!("{}.{}", stem, ext);
        prop_assert_eq!(ContentClass::from_filename(&filename), ContentClass::Pdf);
    }

    /// Property: anything else is `Other`, but still labelled and shaped as pdf
    #[test]
    fn test_unknown_extensions_fall_back_to_document(
        stem in "[a-z]{1,12}",
        ext in "(docx|txt|tiff|gif|csv|pdfx|pngs)",
    ) {
        let filename = format!("{}.{}", stem, ext);
        let class = ContentClass::from_filename(&filename);
        prop_assert_eq!(class, ContentClass::Other);
        prop_assert_eq!(class.file_type(), "pdf");
        prop_assert_eq!(class.template(), &DOCUMENT_TEMPLATE);
    }

    /// Property: the result echoes the upload's name and size, nothing else varies
    #[test]
    fn test_result_echoes_upload(
        stem in "[a-zA-Z0-9]{1,16}",
        ext in "(pdf|png|jpg|jpeg|docx)",
        size in 0u64..(100 * 1024 * 1024),
    ) {
        let filename = format!("{}.{}", stem, ext);
        let result = build_result(&request(&filename, size));
        let metadata = &result.document.metadata;

        prop_assert_eq!(&metadata.original_filename, &filename);
        prop_assert_eq!(metadata.file_size, size);
        prop_assert_eq!(result.status.as_str(), "success");
        prop_assert_eq!(result.processing_time, CANNED_PROCESSING_TIME_SECS);
        prop_assert_eq!(metadata.processing_time, result.processing_time);
    }
}

#[test]
fn test_filename_without_extension_is_other() {
    assert_eq!(ContentClass::from_filename("README"), ContentClass::Other);
    assert_eq!(ContentClass::from_filename(".pdf"), ContentClass::Other);
}

#[test]
fn test_only_images_report_ocr_confidence() {
    let image = build_result(&request("scan.jpg", 10));
    let pdf = build_result(&request("doc.pdf", 10));

    assert_eq!(image.document.metadata.ocr_confidence, IMAGE_TEMPLATE.ocr_confidence);
    assert_eq!(image.document.text, IMAGE_TEMPLATE.text);
    assert_eq!(pdf.document.metadata.ocr_confidence, None);

    let json = serde_json::to_value(&pdf).unwrap();
    assert!(json["document"]["metadata"].get("ocr_confidence").is_none());
}

#[test]
fn test_results_do_not_share_state() {
    let first = build_result(&request("first.png", 1));
    let second = build_result(&request("second.png", 2));

    assert_eq!(first.document.metadata.original_filename, "first.png");
    assert_eq!(second.document.metadata.original_filename, "second.png");
    assert_eq!(IMAGE_TEMPLATE.pages, first.document.metadata.pages);
}
