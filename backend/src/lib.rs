pub mod types;
pub mod error;
pub mod logger;
pub mod scope;
pub mod lang_container;
pub mod assets;
pub mod config;
pub mod extractors;
pub mod link;
pub mod classifier;
pub mod tree_builder;
pub mod convert;

use std::fs::create_dir_all;
use std::path::PathBuf;
use std::error::Error;
use app_dirs::{get_app_root, AppDataType, AppInfo};

pub use error::{ContentsError, Result};
pub use types::{ContentItem, ContentsData, ContentsScreen, Features, ItemKind, LangContainer, LinkMeta, LinkType};

pub const APP_INFO: AppInfo = AppInfo{name: "sab-contents", author: "sab-contents"};

/// Name of the export file inside the data directory.
pub static CONTENTS_FILE_NAME: &str = "contents.xml";

/// Name of the asset directory next to `contents.xml`.
pub static CONTENTS_ASSETS_DIR_NAME: &str = "contents";

/// Application data dir, used for the log file.
///
/// `SAB_CONTENTS_DIR` takes precedence over the platform user data dir.
pub fn get_create_sab_contents_dir() -> std::result::Result<PathBuf, Box<dyn Error>> {
    let p = match std::env::var("SAB_CONTENTS_DIR") {
        Ok(s) if !s.trim().is_empty() => PathBuf::from(s),
        _ => get_app_root(AppDataType::UserData, &APP_INFO)?,
    };
    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}
