// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Catalog requests and output naming.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Context as _, Error, ErrorKind};
use crate::images::ImageRef;
use crate::layout::MAX_PHOTOS;

/// The suffix appended to the file name derived from the title.
pub const FILE_SUFFIX: &str = "_catalog.pdf";

/// Returns `true` if the link starts with `http://` or `https://`.
pub fn is_valid_link(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Derives the output file name from a title: spaces become underscores and
/// [`FILE_SUFFIX`][] is appended.
///
/// # Example
/// ```
/// assert_eq!(diy_catalog::request::file_name("My Bench"), "My_Bench_catalog.pdf");
/// ```
///
/// [`FILE_SUFFIX`]: constant.FILE_SUFFIX.html
pub fn file_name(title: &str) -> String {
    format!("{}{}", title.replace(' ', "_"), FILE_SUFFIX)
}

/// Everything needed to compose one catalog page.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogRequest {
    title: String,
    link: String,
    photos: Vec<ImageRef>,
    output_directory: Option<PathBuf>,
    label: Option<String>,
}

impl CatalogRequest {
    /// Creates a new request and checks all of its invariants.
    ///
    /// The title must not be empty, the link must start with `http://` or `https://` and there
    /// must be one to six photos.
    pub fn new<I, P>(
        title: impl Into<String>,
        link: impl Into<String>,
        photos: I,
    ) -> Result<CatalogRequest, Error>
    where
        I: IntoIterator<Item = P>,
        P: Into<ImageRef>,
    {
        let request = CatalogRequest::lenient(title, link, photos)?;
        if !is_valid_link(&request.link) {
            return Err(Error::new(
                format!(
                    "The link must start with http:// or https://, got {:?}",
                    request.link
                ),
                ErrorKind::InvalidRequest,
            ));
        }
        Ok(request)
    }

    /// Creates a new request without checking the link.
    ///
    /// The title and the photo count are still checked.  Any text is accepted as the link and
    /// encoded into the QR code as is.
    pub fn lenient<I, P>(
        title: impl Into<String>,
        link: impl Into<String>,
        photos: I,
    ) -> Result<CatalogRequest, Error>
    where
        I: IntoIterator<Item = P>,
        P: Into<ImageRef>,
    {
        let request = CatalogRequest {
            title: title.into(),
            link: link.into(),
            photos: photos.into_iter().map(Into::into).collect(),
            output_directory: None,
            label: None,
        };
        request.validate()?;
        Ok(request)
    }

    /// Sets the directory the catalog is written to.  An empty path means the current directory.
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(directory.into());
        self
    }

    /// Sets the secondary label printed in the banner.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.trim().is_empty() {
            None
        } else {
            Some(label)
        };
        self
    }

    /// Checks the title and the photo count.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::new(
                "The title must not be empty",
                ErrorKind::InvalidRequest,
            ));
        }
        if self.photos.is_empty() || self.photos.len() > MAX_PHOTOS {
            return Err(Error::new(
                format!(
                    "A catalog page holds 1 to {} photos, got {}",
                    MAX_PHOTOS,
                    self.photos.len()
                ),
                ErrorKind::InvalidRequest,
            ));
        }
        Ok(())
    }

    /// The title of the project.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The link encoded into the QR code.
    pub fn link(&self) -> &str {
        &self.link
    }

    /// The photos, in display order.
    pub fn photos(&self) -> &[ImageRef] {
        &self.photos
    }

    /// The output directory, if one was set and it is not empty.
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    /// The secondary banner label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The file name of the catalog, see [`file_name`][].
    ///
    /// [`file_name`]: fn.file_name.html
    pub fn file_name(&self) -> String {
        file_name(&self.title)
    }

    /// Returns the path the catalog is written to, creating the output directory if needed.
    ///
    /// Without an output directory, this is the bare file name, which resolves against the
    /// current working directory.
    pub fn prepare_output_path(&self) -> Result<PathBuf, Error> {
        let name = self.file_name();
        match self.output_directory() {
            Some(dir) => {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Could not create output directory {}", dir.display())
                })?;
                Ok(dir.join(name))
            }
            None => Ok(PathBuf::from(name)),
        }
    }
}
