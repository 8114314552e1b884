// src/config.rs
use std::{env, str::FromStr, sync::Arc};
use thiserror::Error;

use crate::application::commands::papers::WorkflowPolicy;
use crate::domain::distribution::QuestionTotalSource;
use crate::domain::layout::{HeuristicMeasurer, LayoutSettings, PageGeometry, PaginationEngine};

#[derive(Clone, Debug)]
pub struct AppConfig {
    geometry: PageGeometry,
    measurer: HeuristicMeasurer,
    layout: LayoutSettings,
    question_total_source: QuestionTotalSource,
    enforce_distribution_on_submit: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::a4(),
            measurer: HeuristicMeasurer::default(),
            layout: LayoutSettings::default(),
            question_total_source: QuestionTotalSource::default(),
            enforce_distribution_on_submit: true,
        }
    }
}

impl AppConfig {
    /// Build configuration from environment variables. Every key is optional
    /// and falls back to an A4 page with the default measurement heuristic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading keys through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let points = |key: &'static str, default: f32| parse_or(&lookup, key, default);

        let geometry = PageGeometry {
            page_width: points("PAGE_WIDTH_PT", defaults.geometry.page_width)?,
            page_height: points("PAGE_HEIGHT_PT", defaults.geometry.page_height)?,
            margin_top: points("MARGIN_TOP_PT", defaults.geometry.margin_top)?,
            margin_bottom: points("MARGIN_BOTTOM_PT", defaults.geometry.margin_bottom)?,
            margin_left: points("MARGIN_LEFT_PT", defaults.geometry.margin_left)?,
            margin_right: points("MARGIN_RIGHT_PT", defaults.geometry.margin_right)?,
            header_height: points("HEADER_HEIGHT_PT", defaults.geometry.header_height)?,
            footer_height: points("FOOTER_HEIGHT_PT", defaults.geometry.footer_height)?,
        };
        geometry
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let measurer = HeuristicMeasurer::new(
            points("CHAR_WIDTH_PT", defaults.measurer.char_width)?,
            points("LINE_HEIGHT_PT", defaults.measurer.line_height)?,
        );
        if measurer.char_width <= 0.0 || measurer.line_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "CHAR_WIDTH_PT and LINE_HEIGHT_PT must be positive".into(),
            ));
        }

        let layout = LayoutSettings {
            block_gap: points("BLOCK_GAP_PT", defaults.layout.block_gap)?,
            max_image_height_ratio: points(
                "MAX_IMAGE_HEIGHT_RATIO",
                defaults.layout.max_image_height_ratio,
            )?,
            image_placeholder_height: points(
                "IMAGE_PLACEHOLDER_HEIGHT_PT",
                defaults.layout.image_placeholder_height,
            )?,
        };
        if !(layout.max_image_height_ratio > 0.0 && layout.max_image_height_ratio <= 1.0) {
            return Err(ConfigError::Invalid(
                "MAX_IMAGE_HEIGHT_RATIO must be in (0, 1]".into(),
            ));
        }
        if layout.block_gap < 0.0 || layout.image_placeholder_height < 0.0 {
            return Err(ConfigError::Invalid(
                "BLOCK_GAP_PT and IMAGE_PLACEHOLDER_HEIGHT_PT cannot be negative".into(),
            ));
        }

        let question_total_source = match lookup("QUESTION_TOTAL_SOURCE") {
            None => defaults.question_total_source,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "bloom" => QuestionTotalSource::Bloom,
                "unit" => QuestionTotalSource::Unit,
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "QUESTION_TOTAL_SOURCE must be bloom or unit, got {other}"
                    )));
                }
            },
        };

        let enforce_distribution_on_submit = lookup("ENFORCE_DISTRIBUTION_ON_SUBMIT")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.enforce_distribution_on_submit);

        Ok(Self {
            geometry,
            measurer,
            layout,
            question_total_source,
            enforce_distribution_on_submit,
        })
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn measurer(&self) -> HeuristicMeasurer {
        self.measurer
    }

    pub fn layout(&self) -> LayoutSettings {
        self.layout
    }

    pub fn question_total_source(&self) -> QuestionTotalSource {
        self.question_total_source
    }

    pub fn workflow_policy(&self) -> WorkflowPolicy {
        WorkflowPolicy {
            enforce_distribution_on_submit: self.enforce_distribution_on_submit,
        }
    }

    /// Engine with the configured spacing and measurement heuristic.
    pub fn pagination_engine(&self) -> PaginationEngine {
        PaginationEngine::new(self.layout).with_text_measurer(Arc::new(self.measurer))
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Err(ConfigError::Missing(key)),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{key} is not a valid number: {raw}"))),
    }
}
