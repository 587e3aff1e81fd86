use crate::constants::DEFAULT_MAX_PAGES_PER_JOB;
use crate::render::Engine;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Column count request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    Fixed(u32),
    /// Fit as many columns as the minimum column width allows
    Auto,
}

impl Default for Columns {
    fn default() -> Self {
        Columns::Fixed(1)
    }
}

impl FromStr for Columns {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(Columns::Auto);
        }
        s.parse::<u32>()
            .map(Columns::Fixed)
            .map_err(|_| BookError::Config(format!("columns must be a number or \"auto\", got {s:?}")))
    }
}

/// Page layout overrides. Every length is in points; `None` means "use the
/// size-proportional default".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    pub top_margin: Option<f32>,
    pub bottom_margin: Option<f32>,
    pub side_margin: Option<f32>,
    pub gutter: Option<f32>,
    pub columns: Columns,
    pub column_margin: Option<f32>,
    pub grey_scale: bool,
    pub engine: Engine,
    /// Printer settings name used by the Gecko engine
    pub printer_target: Option<String>,
}

impl PageOptions {
    /// Load layout overrides from a JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| BookError::Config(format!("Failed to parse page options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
            ("side_margin", self.side_margin),
            ("gutter", self.gutter),
            ("column_margin", self.column_margin),
        ];
        for (name, value) in lengths {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(BookError::Config(format!(
                        "{name} must be a non-negative length, got {v}"
                    )));
                }
            }
        }

        if self.columns == Columns::Fixed(0) {
            return Err(BookError::Config("columns must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Locations of the external collaborators and their limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub wkhtmltopdf: PathBuf,
    /// Extra arguments appended to every wkhtmltopdf run
    pub wkhtmltopdf_extra_args: Vec<String>,
    pub firefox: PathBuf,
    /// BookJs renderer
    pub renderer: PathBuf,
    pub pdfedit: PathBuf,
    /// Script run by pdfedit for reshaping and numbering
    pub pdfedit_script: PathBuf,
    pub pdftk: PathBuf,
    pub pdfnup: PathBuf,
    pub pdfinfo: PathBuf,
    pub bookland: PathBuf,
    pub ps2pdf: PathBuf,
    /// Most pages pdfedit numbers in one run
    pub max_pages_per_job: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
            wkhtmltopdf_extra_args: Vec::new(),
            firefox: PathBuf::from("firefox"),
            renderer: PathBuf::from("renderer"),
            pdfedit: PathBuf::from("pdfedit"),
            pdfedit_script: PathBuf::from("wk_objavi.qs"),
            pdftk: PathBuf::from("pdftk"),
            pdfnup: PathBuf::from("pdfnup"),
            pdfinfo: PathBuf::from("pdfinfo"),
            bookland: PathBuf::from("bookland"),
            ps2pdf: PathBuf::from("ps2pdf"),
            max_pages_per_job: DEFAULT_MAX_PAGES_PER_JOB,
        }
    }
}

impl ToolConfig {
    /// Load tool settings from a JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| BookError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save tool settings to a JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // Sections are split on even page counts
        if self.max_pages_per_job < 2 {
            return Err(BookError::Config(
                "max_pages_per_job must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

mod serde_impls {
    use super::*;
    use serde::de::{self, Visitor};
    use std::fmt;

    impl Serialize for Columns {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            match self {
                Columns::Fixed(n) => serializer.serialize_u32(*n),
                Columns::Auto => serializer.serialize_str("auto"),
            }
        }
    }

    impl<'de> Deserialize<'de> for Columns {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            struct ColumnsVisitor;

            impl Visitor<'_> for ColumnsVisitor {
                type Value = Columns;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a column count or \"auto\"")
                }

                fn visit_u64<E>(self, value: u64) -> std::result::Result<Columns, E>
                where
                    E: de::Error,
                {
                    u32::try_from(value)
                        .map(Columns::Fixed)
                        .map_err(|_| E::custom("column count too large"))
                }

                fn visit_i64<E>(self, value: i64) -> std::result::Result<Columns, E>
                where
                    E: de::Error,
                {
                    u32::try_from(value)
                        .map(Columns::Fixed)
                        .map_err(|_| E::custom("column count must be positive"))
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<Columns, E>
                where
                    E: de::Error,
                {
                    value.parse().map_err(E::custom)
                }
            }

            deserializer.deserialize_any(ColumnsVisitor)
        }
    }
}
