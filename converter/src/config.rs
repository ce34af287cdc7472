//! Conversion options and the fixed names of the input extracts.

use std::env;
use std::path::{Path, PathBuf};

/// Default input directory (relative to current dir)
pub const DEFAULT_INPUT_DIR: &str = "input_csv";

/// Default output document path
pub const DEFAULT_OUTPUT_PATH: &str = "output/output.json";

/// Default reference document for verification
pub const DEFAULT_REFERENCE_PATH: &str = "asm_json/acm_out_IE_starhub_010825.json";

/// Default deployment / diagnostics source id
pub const DEFAULT_SOURCE_ID: &str = "IE_STARHUB";

/// Default locale for localized application texts
pub const DEFAULT_LOCALE: &str = "en-IE";

/// File names of the thirteen extracts inside the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub channels: String,
    pub service_genre: String,
    pub channel_lineup: String,
    pub qam_location: String,
    pub ott_location: String,
    pub linear_products: String,
    pub replay_products: String,
    pub apps: String,
    pub providers: String,
    pub avad: String,
    pub tstv: String,
    pub trickplay: String,
    pub city_mapping: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            channels: "Channels.csv".into(),
            service_genre: "ServiceGenre.csv".into(),
            channel_lineup: "Channel Lineup.csv".into(),
            qam_location: "QAM Channel Location.csv".into(),
            ott_location: "ottlocation.csv".into(),
            linear_products: "Linear Products.csv".into(),
            replay_products: "Replay Products.csv".into(),
            apps: "Apps.csv".into(),
            providers: "providers.csv".into(),
            avad: "AVAD.csv".into(),
            tstv: "TSTV.csv".into(),
            trickplay: "Trickplaycontrol.csv".into(),
            city_mapping: "EDS City Mapping.csv".into(),
        }
    }
}

/// Options for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory holding the CSV extracts
    pub input_dir: PathBuf,

    /// Where the generated document is written
    pub output_path: PathBuf,

    /// Field delimiter of every extract
    pub delimiter: u8,

    /// Locale key of application synopsis / toaster message
    pub locale: String,

    /// Names of the extracts
    pub files: InputFiles,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            delimiter: b';',
            locale: DEFAULT_LOCALE.to_string(),
            files: InputFiles::default(),
        }
    }
}

impl ConvertOptions {
    /// Defaults overridden by `ACMGEN_INPUT_DIR`, `ACMGEN_OUTPUT` and
    /// `ACMGEN_LOCALE` when set and non-empty.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(dir) = env_var("ACMGEN_INPUT_DIR") {
            options.input_dir = PathBuf::from(dir);
        }
        if let Some(out) = env_var("ACMGEN_OUTPUT") {
            options.output_path = PathBuf::from(out);
        }
        if let Some(locale) = env_var("ACMGEN_LOCALE") {
            options.locale = locale;
        }
        options
    }

    pub fn with_input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.input_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    /// Full path of an extract inside the input directory.
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.input_dir.join(file_name)
    }
}

/// Source id for the document envelope, from `ACMGEN_SOURCE_ID` or the default.
pub fn source_id_from_env() -> String {
    env_var("ACMGEN_SOURCE_ID").unwrap_or_else(|| DEFAULT_SOURCE_ID.to_string())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
