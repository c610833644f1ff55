// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

use clap::Parser;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog_inspect")]
#[command(about = "Summarize the pages, images and text runs of a catalog PDF", long_about = None)]
struct Args {
    /// Path to the catalog PDF
    #[arg(value_name = "FILE")]
    pdf_file: PathBuf,

    /// List every content operator count
    #[arg(short, long)]
    detailed: bool,
}

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Formats a MediaBox given in points, e.g. `595 x 842 pt (209.9 x 297.0 mm)`.
fn format_media_box((w, h): (f32, f32)) -> String {
    format!(
        "{} x {} pt ({:.1} x {:.1} mm)",
        w.round(),
        h.round(),
        w * PT_TO_MM,
        h * PT_TO_MM
    )
}

fn get_name(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).to_string()),
        Object::Name(name) => Some(String::from_utf8_lossy(name).to_string()),
        _ => None,
    }
}

fn media_box_pt(document: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let page = document.get_object(page_id).ok()?.as_dict().ok()?;
    let media_box = match page.get(b"MediaBox").ok()? {
        Object::Array(values) => values.clone(),
        Object::Reference(id) => document.get_object(*id).ok()?.as_array().ok()?.clone(),
        _ => return None,
    };
    let values: Vec<f32> = media_box
        .iter()
        .filter_map(|value| value.as_float().ok())
        .collect();
    match values.as_slice() {
        [x0, y0, x1, y1] => Some((x1 - x0, y1 - y0)),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !args.pdf_file.exists() {
        eprintln!(
            "Error: The file '{}' does not exist",
            args.pdf_file.display()
        );
        std::process::exit(1);
    }

    println!("\n════════════════════════════════════════════════════════");
    println!("CATALOG INSPECTION: {}", args.pdf_file.display());
    println!("════════════════════════════════════════════════════════\n");

    let document = Document::load(&args.pdf_file)?;
    let pages = document.get_pages();
    println!("Pages: {}", pages.len());

    let mut text_sections = 0;
    for (number, page_id) in &pages {
        if let Some(media_box) = media_box_pt(&document, *page_id) {
            println!("  Page {}: {}", number, format_media_box(media_box));
        }
        let raw = document.get_page_content(*page_id)?;
        let content = Content::decode(&raw)?;
        let mut operators: Vec<(String, usize)> = Vec::new();
        for op in &content.operations {
            if op.operator == "BT" {
                text_sections += 1;
            }
            match operators.iter_mut().find(|(name, _)| *name == op.operator) {
                Some((_, count)) => *count += 1,
                None => operators.push((op.operator.clone(), 1)),
            }
        }
        if args.detailed {
            for (name, count) in &operators {
                println!("    {:>4} x {}", count, name);
            }
        }
    }
    println!();

    let mut image_count = 0;
    for (obj_id, obj) in document.objects.iter() {
        if let Object::Stream(stream) = obj {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .ok()
                .and_then(get_name)
                .map(|subtype| subtype == "Image")
                .unwrap_or(false);
            if !is_image {
                continue;
            }
            image_count += 1;
            println!("Image XObject: {:?}", obj_id);
            if let Ok(Object::Integer(w)) = stream.dict.get(b"Width") {
                println!("  Width: {}", w);
            }
            if let Ok(Object::Integer(h)) = stream.dict.get(b"Height") {
                println!("  Height: {}", h);
            }
            if let Some(cs) = stream.dict.get(b"ColorSpace").ok().and_then(get_name) {
                println!("  ColorSpace: {}", cs);
            }
            println!();
        }
    }

    println!("════════════════════════════════════════════════════════");
    println!("SUMMARY");
    println!("════════════════════════════════════════════════════════");
    println!("Pages: {}", pages.len());
    println!("Images: {}", image_count);
    println!("Text sections: {}", text_sections);

    Ok(())
}
