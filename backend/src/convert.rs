//! Reads `contents.xml` from an export directory, builds the contents tree
//! and writes it out next to the copied assets.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::assets::{AssetContext, AssetFs, LocalFs};
use crate::config::ScriptureConfig;
use crate::error::{ContentsError, Result};
use crate::logger::{info, warn};
use crate::tree_builder::{build_contents, check_links, LinkIssue};
use crate::types::ContentsData;
use crate::{CONTENTS_ASSETS_DIR_NAME, CONTENTS_FILE_NAME};

/// Path of `contents.xml` in `data_dir`, or `MissingContentsFile`.
pub fn find_contents_file(data_dir: &Path) -> Result<PathBuf> {
    let path = data_dir.join(CONTENTS_FILE_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ContentsError::MissingContentsFile(path))
    }
}

pub fn contents_assets_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(CONTENTS_ASSETS_DIR_NAME)
}

/// Builds the tree from an XML string.
pub fn parse_contents_str(
    xml: &str,
    source: &Path,
    assets: &AssetContext,
    config: Option<&ScriptureConfig>,
) -> Result<ContentsData> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| ContentsError::Xml {
        path: source.to_path_buf(),
        source: e,
    })?;
    build_contents(&doc, assets, config)
}

/// Reads and builds `data_dir/contents.xml`.
///
/// Images resolve under `data_dir/contents`, audio under `dest_dir`.
pub fn load_contents(
    data_dir: &Path,
    dest_dir: Option<&Path>,
    fs: &dyn AssetFs,
    config: Option<&ScriptureConfig>,
) -> Result<ContentsData> {
    let contents_file = find_contents_file(data_dir)?;
    info(&format!("Reading {}", contents_file.display()));

    let xml = fs::read_to_string(&contents_file).map_err(|e| ContentsError::io(&contents_file, e))?;

    let contents_dir = contents_assets_dir(data_dir);
    let assets = AssetContext::new(&contents_dir, dest_dir, fs);
    if !assets.has_contents_dir() {
        warn(&format!("No contents asset directory at {}", contents_dir.display()));
    }

    parse_contents_str(&xml, &contents_file, &assets, config)
}

/// Copies every file under `contents_dir` into `dest_dir`, keeping relative
/// paths. Returns the number of files copied.
pub fn copy_contents_assets(contents_dir: &Path, dest_dir: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(contents_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(contents_dir).unwrap_or(entry.path());
        let target = dest_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ContentsError::io(parent, e))?;
        }
        fs::copy(entry.path(), &target).map_err(|e| ContentsError::io(entry.path(), e))?;
        copied += 1;
    }

    Ok(copied)
}

pub fn write_contents_json(data: &ContentsData, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ContentsError::io(parent, e))?;
    }
    let file = File::create(out_path).map_err(|e| ContentsError::io(out_path, e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, data)?;
    w.flush().map_err(|e| ContentsError::io(out_path, e))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Export directory holding `contents.xml` and `contents/`.
    pub data_dir: PathBuf,
    /// Where assets are copied to and audio paths point.
    pub dest_dir: PathBuf,
    /// JSON output, `dest_dir/contents.json` when not set.
    pub output: Option<PathBuf>,
    pub config: Option<ScriptureConfig>,
    pub copy_assets: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertStats {
    pub items: usize,
    pub screens: usize,
    pub assets_copied: usize,
    pub output: PathBuf,
    pub link_issues: Vec<LinkIssue>,
}

/// Runs the whole conversion: load, copy assets, check links, write JSON.
pub fn convert_contents(opts: &ConvertOptions) -> Result<ConvertStats> {
    let data = load_contents(&opts.data_dir, Some(opts.dest_dir.as_path()), &LocalFs, opts.config.as_ref())?;

    let contents_dir = contents_assets_dir(&opts.data_dir);
    let assets_copied = if opts.copy_assets && contents_dir.is_dir() {
        copy_contents_assets(&contents_dir, &opts.dest_dir)?
    } else {
        0
    };

    let link_issues = check_links(&data, opts.config.as_ref());

    let output = opts.output.clone().unwrap_or_else(|| opts.dest_dir.join("contents.json"));
    write_contents_json(&data, &output)?;

    let stats = ConvertStats {
        items: data.all_items().len(),
        screens: data.screens.len(),
        assets_copied,
        output,
        link_issues,
    };

    info(&format!(
        "Converted {} items, {} screens, copied {} assets to {}",
        stats.items,
        stats.screens,
        stats.assets_copied,
        opts.dest_dir.display()
    ));

    Ok(stats)
}
