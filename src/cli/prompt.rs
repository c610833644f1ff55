// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Interactive prompts for the values missing from the command line.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::*;

use diy_catalog::images::{self, PHOTO_EXTENSIONS};
use diy_catalog::layout::MAX_PHOTOS;

/// Checks that a photo path has a supported extension and points to an existing file.
pub fn check_photo(path: &Path) -> Result<(), String> {
    if !images::has_photo_extension(path) {
        return Err(format!(
            "{} is not a supported photo, expected one of: {}",
            path.display(),
            PHOTO_EXTENSIONS.join(", ")
        ));
    }
    if !path.is_file() {
        return Err(format!("{} does not exist", path.display()));
    }
    Ok(())
}

/// Reads answers line by line from `input` and writes questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Asks a question and returns the trimmed answer, or `None` at the end of the input.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", question.bold())?;
        self.output.flush().context("Failed to flush the prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read the answer")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn complain(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.output, "{} {}", "[-]".red().bold(), msg)
    }

    /// Asks for the title until a non-empty answer is given.
    pub fn title(&mut self) -> Result<String> {
        loop {
            match self.ask("Project title:")? {
                Some(title) if !title.is_empty() => return Ok(title),
                Some(_) => self.complain("The title must not be empty")?,
                None => bail!("No title given"),
            }
        }
    }

    /// Asks for the link.  The answer is checked by the caller.
    pub fn link(&mut self) -> Result<String> {
        match self.ask("Link (http:// or https://):")? {
            Some(link) => Ok(link),
            None => bail!("No link given"),
        }
    }

    /// Asks for photo paths until six valid photos are collected or an empty line is entered
    /// after at least one valid photo.
    pub fn photos(&mut self) -> Result<Vec<PathBuf>> {
        let mut photos = Vec::new();
        while photos.len() < MAX_PHOTOS {
            let question = format!(
                "Photo {} of up to {} (empty line to finish):",
                photos.len() + 1,
                MAX_PHOTOS
            );
            let answer = match self.ask(&question)? {
                Some(answer) => answer,
                None if photos.is_empty() => bail!("No photo given"),
                None => break,
            };
            if answer.is_empty() {
                if photos.is_empty() {
                    self.complain("At least one photo is required")?;
                    continue;
                }
                break;
            }
            let path = PathBuf::from(answer);
            match check_photo(&path) {
                Ok(()) => photos.push(path),
                Err(msg) => self.complain(&msg)?,
            }
        }
        Ok(photos)
    }

    /// Asks for the output directory, using `default` for an empty answer.
    pub fn output_directory(&mut self, default: &Path) -> Result<PathBuf> {
        let question = format!("Output directory [{}]:", default.display());
        match self.ask(&question)? {
            Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
            _ => Ok(default.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn prompter(input: &str) -> Prompter<io::Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(io::Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_title_reprompts_on_empty() {
        let mut p = prompter("\n  \nMy Bench\n");
        assert_eq!(p.title().unwrap(), "My Bench");
        assert!(prompter("").title().is_err());
    }

    #[test]
    fn test_photos_validation_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.JPG");
        fs::write(&good, b"x").unwrap();
        let bad_ext = dir.path().join("a.gif");
        fs::write(&bad_ext, b"x").unwrap();
        let missing = dir.path().join("missing.png");

        let input = format!(
            "\n{}\n{}\n{}\n\n",
            bad_ext.display(),
            missing.display(),
            good.display()
        );
        let mut p = prompter(&input);
        assert_eq!(p.photos().unwrap(), vec![good.clone()]);

        let input = format!("{}\n", good.display()).repeat(8);
        let mut p = prompter(&input);
        assert_eq!(p.photos().unwrap().len(), MAX_PHOTOS);
    }

    #[test]
    fn test_photos_end_of_input() {
        assert!(prompter("").photos().is_err());
    }

    #[test]
    fn test_output_directory_default() {
        let default = Path::new("/tmp/Downloads");
        assert_eq!(prompter("\n").output_directory(default).unwrap(), default);
        assert_eq!(prompter("").output_directory(default).unwrap(), default);
        assert_eq!(
            prompter("out\n").output_directory(default).unwrap(),
            PathBuf::from("out")
        );
    }

    #[test]
    fn test_check_photo() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("bench.jpeg");
        fs::write(&photo, b"x").unwrap();
        assert!(check_photo(&photo).is_ok());
        assert!(check_photo(&dir.path().join("bench.png")).is_err());
        assert!(check_photo(&dir.path().join("bench.txt")).is_err());
    }
}
