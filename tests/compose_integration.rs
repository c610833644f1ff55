// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

use std::path::{Path, PathBuf};

use diy_catalog::layout::{self, GridLayout};
use diy_catalog::{
    CatalogRequest, CatalogStyle, Composer, ErrorKind, LayoutConfig, Section, Size, StepOutcome,
};
use float_cmp::approx_eq;

fn builtin_composer() -> Composer {
    let style = CatalogStyle {
        font_path: None,
        ..CatalogStyle::default()
    };
    Composer::with_config(LayoutConfig::default(), style)
}

fn write_photo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    image::DynamicImage::ImageRgb8(img)
        .save(&path)
        .expect("save photo");
    path
}

fn page_count(path: &Path) -> usize {
    let buf = std::fs::read(path).expect("read pdf");
    let mut warnings = Vec::new();
    let parsed =
        printpdf::PdfDocument::parse(&buf, &printpdf::PdfParseOptions::default(), &mut warnings)
            .expect("parse");
    parsed.pages.len()
}

fn image_xobject_count(path: &Path) -> usize {
    let document = lopdf::Document::load(path).expect("load pdf");
    document
        .objects
        .values()
        .filter(|obj| match obj {
            lopdf::Object::Stream(stream) => matches!(
                stream.dict.get(b"Subtype"),
                Ok(lopdf::Object::Name(name)) if name.as_slice() == b"Image"
            ),
            _ => false,
        })
        .count()
}

#[test]
fn compose_every_photo_count() {
    let dir = tempfile::tempdir().expect("tempdir");
    let shapes = [(640, 480), (480, 640), (500, 500), (1200, 300), (300, 900), (800, 600)];
    let photos: Vec<PathBuf> = shapes
        .iter()
        .enumerate()
        .map(|(i, (w, h))| write_photo(dir.path(), &format!("p{}.jpg", i), *w, *h))
        .collect();

    for count in 1..=6 {
        let out = dir.path().join(format!("out{}", count));
        let request = CatalogRequest::new(
            format!("Bench {}", count),
            "https://youtu.be/xxxx",
            photos[..count].to_vec(),
        )
        .expect("request")
        .with_output_directory(&out);

        let composition = builtin_composer()
            .compose_with_report(&request)
            .expect("compose");
        assert_eq!(
            composition.path(),
            out.join(format!("Bench_{}_catalog.pdf", count))
        );
        assert!(composition.path().is_file());
        assert_eq!(composition.steps().len(), count + 2);
        assert_eq!(composition.degraded().count(), 0);
        assert_eq!(page_count(composition.path()), 1);
        // every photo plus the QR code
        assert_eq!(image_xobject_count(composition.path()), count + 1);
    }
}

#[test]
fn file_name_follows_title() {
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(dir.path(), "bench.png", 300, 200);
    let request = CatalogRequest::new("My Bench", "https://example.com/bench", vec![photo])
        .expect("request")
        .with_output_directory(dir.path());
    let path = diy_catalog::compose(&request).expect("compose");
    assert_eq!(path.file_name().unwrap(), "My_Bench_catalog.pdf");
    assert_eq!(path, dir.path().join("My_Bench_catalog.pdf"));
}

#[test]
fn missing_output_directory_is_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(dir.path(), "bench.png", 300, 200);
    let out = dir.path().join("a").join("b").join("c");
    let request = CatalogRequest::new("Bench", "https://example.com", vec![photo])
        .expect("request")
        .with_output_directory(&out);
    let path = builtin_composer().compose(&request).expect("compose");
    assert!(out.is_dir());
    assert!(path.starts_with(&out));
    assert!(path.is_file());
}

#[test]
fn undecodable_photos_do_not_abort() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = write_photo(dir.path(), "good.png", 400, 300);
    let corrupt = dir.path().join("corrupt.jpg");
    std::fs::write(&corrupt, b"\xFF\xD8 this is not really a jpeg").expect("write");
    let missing = dir.path().join("missing.png");

    let request = CatalogRequest::new(
        "Broken Bench",
        "https://example.com",
        vec![corrupt, good, missing],
    )
    .expect("request")
    .with_output_directory(dir.path());

    let composition = builtin_composer()
        .compose_with_report(&request)
        .expect("compose must not fail for bad photos");
    assert!(composition.path().is_file());
    assert_eq!(page_count(composition.path()), 1);

    let degraded: Vec<Section> = composition.degraded().collect();
    assert_eq!(degraded, vec![Section::Photo(0), Section::Photo(2)]);
    for index in [0, 2] {
        match composition.outcome(Section::Photo(index)) {
            Some(StepOutcome::Degraded { marker, .. }) => assert!(*marker),
            o => panic!("unexpected outcome for photo {}: {:?}", index, o),
        }
    }
    assert_eq!(image_xobject_count(composition.path()), 2);
}

#[test]
fn arbitrary_link_payloads_never_raise() {
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(dir.path(), "bench.png", 300, 200);

    for (i, link) in ["", "not a link", "https://example.com/ünïcödé"]
        .iter()
        .enumerate()
    {
        let request = CatalogRequest::lenient(format!("Bench {}", i), *link, vec![photo.clone()])
            .expect("request")
            .with_output_directory(dir.path());
        let composition = builtin_composer()
            .compose_with_report(&request)
            .expect("compose");
        assert_eq!(
            composition.outcome(Section::Footer),
            Some(&StepOutcome::Rendered)
        );
    }

    let huge = format!("https://example.com/{}", "a".repeat(8000));
    let request = CatalogRequest::new("Huge Link", huge, vec![photo])
        .expect("request")
        .with_output_directory(dir.path());
    let composition = builtin_composer()
        .compose_with_report(&request)
        .expect("compose");
    assert!(composition.path().is_file());
    match composition.outcome(Section::Footer) {
        Some(StepOutcome::Degraded { marker, .. }) => assert!(*marker),
        o => panic!("unexpected footer outcome: {:?}", o),
    }
}

#[test]
fn unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(dir.path(), "bench.png", 300, 200);
    // a regular file where the output directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").expect("write");
    let request = CatalogRequest::new("Bench", "https://example.com", vec![photo])
        .expect("request")
        .with_output_directory(blocker.join("out"));
    let err = builtin_composer().compose(&request).unwrap_err();
    match err.kind() {
        ErrorKind::IoError(_) => {}
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn missing_font_falls_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(dir.path(), "bench.png", 300, 200);
    let style = CatalogStyle {
        font_path: Some(dir.path().join("no-such-font.ttf")),
        ..CatalogStyle::default()
    };
    let request = CatalogRequest::new("本棚 Shelf", "https://example.com", vec![photo])
        .expect("request")
        .with_label("Pine")
        .with_output_directory(dir.path());
    let composition = Composer::with_config(LayoutConfig::default(), style)
        .compose_with_report(&request)
        .expect("compose");
    assert_eq!(composition.degraded().count(), 0);
    assert_eq!(page_count(composition.path()), 1);
}

#[test]
fn footer_position_is_fixed() {
    let config = LayoutConfig::default();
    for count in 1..=6 {
        let grid = GridLayout::new(&config, count).expect("grid");
        let footer = layout::footer_rect(&config);
        assert_eq!(footer.origin.y, config.page_height - config.footer_height - config.bottom_margin);
        for index in 0..count {
            let placed = grid.place(index, Size::new(4000, 3000)).expect("placed");
            assert!(placed.shadow(&config, count).bottom() <= footer.origin.y);
            let ratio = placed.size.width.0 / placed.size.height.0;
            assert!(approx_eq!(f32, ratio, 4.0 / 3.0, epsilon = 1e-4));
        }
    }
}
