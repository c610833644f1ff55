// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

pub mod logging;
pub mod prompt;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::*;

use diy_catalog::layout::MAX_PHOTOS;
use diy_catalog::request::is_valid_link;
use diy_catalog::{CatalogRequest, CatalogStyle, Composer, LayoutConfig};

use prompt::{check_photo, Prompter};

#[derive(Parser, Debug)]
#[command(name = "diy-catalog")]
#[command(about = "Create a one-page PDF catalog for a DIY project", long_about = None)]
#[command(version)]
pub struct Args {
    /// Title of the project, also used for the file name
    #[arg(short, long)]
    pub title: Option<String>,

    /// Link encoded into the QR code (http:// or https://)
    #[arg(short, long)]
    pub link: Option<String>,

    /// Photo to include (JPEG or PNG), up to six times
    #[arg(short, long = "photo", value_name = "FILE")]
    pub photos: Vec<PathBuf>,

    /// Directory the catalog is written to [default: your Downloads directory]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Small secondary label printed in the title banner
    #[arg(long)]
    pub label: Option<String>,

    /// Caption printed below the QR code
    #[arg(long)]
    pub caption: Option<String>,

    /// TrueType font used for all text
    #[arg(long, env = "DIY_CATALOG_FONT", value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// The user's Downloads directory, falling back to `~/Downloads` and then to the current
/// directory.
pub fn default_output_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn success(msg: &str) {
    println!("{} {}", "[+]".green().bold(), msg);
}

fn failure(msg: &str) {
    println!("{} {}", "[-]".red().bold(), msg.red());
}

/// Collects the request from the arguments and stdin, then composes the catalog.
///
/// Invalid input is reported and ends the run without composing.  Composition errors are
/// reported and turned into a failure exit code.
pub fn run(args: Args) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let interactive = args.title.is_none() || args.link.is_none() || args.photos.is_empty();

    let title = match args.title {
        Some(title) => title,
        None => prompter.title()?,
    };
    let link = match args.link {
        Some(link) => link,
        None => prompter.link()?,
    };
    if !is_valid_link(&link) {
        failure("The link must start with http:// or https://");
        return Ok(ExitCode::SUCCESS);
    }

    let photos = if args.photos.is_empty() {
        prompter.photos()?
    } else {
        if args.photos.len() > MAX_PHOTOS {
            failure(&format!(
                "At most {} photos fit on a catalog page, got {}",
                MAX_PHOTOS,
                args.photos.len()
            ));
            return Ok(ExitCode::FAILURE);
        }
        let errors: Vec<String> = args
            .photos
            .iter()
            .filter_map(|photo| check_photo(photo).err())
            .collect();
        if !errors.is_empty() {
            for err in &errors {
                failure(err);
            }
            return Ok(ExitCode::FAILURE);
        }
        args.photos
    };

    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None if interactive => prompter.output_directory(&default_output_directory())?,
        None => default_output_directory(),
    };

    let mut style = CatalogStyle::default();
    if let Some(font) = args.font {
        style.font_path = Some(font);
    }
    if let Some(caption) = args.caption {
        style.code_caption = caption;
    }

    let mut request = CatalogRequest::new(title, link, photos)?.with_output_directory(output_dir);
    if let Some(label) = args.label {
        request = request.with_label(label);
    }

    let composer = Composer::with_config(LayoutConfig::default(), style);
    match composer.compose_with_report(&request) {
        Ok(composition) => {
            let degraded: Vec<String> = composition
                .degraded()
                .map(|section| section.to_string())
                .collect();
            if !degraded.is_empty() {
                println!(
                    "{} Incomplete sections: {}",
                    "[*]".yellow().bold(),
                    degraded.join(", ")
                );
            }
            success(&format!(
                "Catalog created: {}",
                composition.path().display()
            ));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            failure(&format!("Could not create the catalog: {}", err));
            Ok(ExitCode::FAILURE)
        }
    }
}
