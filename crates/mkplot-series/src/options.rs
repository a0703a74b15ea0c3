//! Plot configuration consumed by the series pipeline
//!
//! Options are usually read from the `settings` object of a defaults file
//! and then overridden from the command line:
//!
//! ```json
//! {
//!   "settings": {
//!     "timeout": 1800,
//!     "key": "rtime",
//!     "legend": ["program", "prog_args"],
//!     "vbs": {"vbs-all": "all", "vbs-ab": ["a", "b"]},
//!     "plot_type": "cactus"
//!   }
//! }
//! ```
//!
//! Keys that only matter to renderers (fonts, colors, legend placement) are
//! ignored.

use std::{collections::BTreeMap, fmt};

use mkplot_stat::{Legend, ToolSelection};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// Floor applied to solved values of cactus plots.
pub const CACTUS_FLOOR: f64 = 0.000_000_001;

/// Unsolved cactus points are pushed this many times past the timeout.
pub const CACTUS_UNSOLVED_FACTOR: f64 = 10.0;

#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::FromStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    #[default]
    #[display("cactus")]
    Cactus,
    #[display("scatter")]
    Scatter,
}

/// A named virtual best solver series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VbsSpec {
    pub name: String,
    pub selection: ToolSelection,
}

/// Virtual best solver series in configuration order.
///
/// Serialized as a JSON object; the order of its entries is the order in
/// which the series are computed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VbsSpecs(pub Vec<VbsSpec>);

impl VbsSpecs {
    pub fn iter(&self) -> std::slice::Iter<'_, VbsSpec> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a VbsSpecs {
    type Item = &'a VbsSpec;
    type IntoIter = std::slice::Iter<'a, VbsSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for VbsSpecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for spec in &self.0 {
            map.serialize_entry(&spec.name, &spec.selection)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VbsSpecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecsVisitor;

        impl<'de> Visitor<'de> for SpecsVisitor {
            type Value = VbsSpecs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from VBS names to \"all\" or a list of tools")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut specs = vec![];
                while let Some((name, selection)) = map.next_entry()? {
                    specs.push(VbsSpec { name, selection });
                }
                Ok(VbsSpecs(specs))
            }
        }

        deserializer.deserialize_map(SpecsVisitor)
    }
}

/// Configuration of one series computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Time limit of the runs; solved values are capped at it.
    pub timeout: f64,
    /// Record field measured on the value axis.
    pub key: String,
    /// Preamble keys forming series labels.
    pub legend: Legend,
    /// Preamble keys identifying tables to cluster into one series.
    pub join_key: Option<Vec<String>>,
    pub vbs: Option<VbsSpecs>,
    /// Labels of the series to keep.
    pub only: Option<Vec<String>>,
    /// Exact-match label replacements.
    pub repls: Option<BTreeMap<String, String>>,
    /// Ascending order (worst series first) instead of descending.
    pub reverse: bool,
    pub plot_type: PlotType,
    pub x_min: Option<f64>,
    pub y_min: f64,
    pub x_max: Option<f64>,
    pub y_max: Option<f64>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            timeout: 3600.0,
            key: mkplot_stat::record::RUNTIME_KEY.to_owned(),
            legend: Legend::default(),
            join_key: None,
            vbs: None,
            only: None,
            repls: None,
            reverse: false,
            plot_type: PlotType::default(),
            x_min: None,
            y_min: 0.0,
            x_max: None,
            y_max: None,
        }
    }
}

impl PlotOptions {
    /// Smallest value a solved point may take.
    ///
    /// Scatter plots use their axis minimum so that points stay visible on
    /// logarithmic axes.
    #[must_use]
    pub fn floor(&self) -> f64 {
        match self.plot_type {
            PlotType::Cactus => CACTUS_FLOOR,
            PlotType::Scatter => match self.x_min {
                Some(x_min) if x_min != 0.0 => x_min.max(self.y_min),
                _ => self.y_min,
            },
        }
    }

    /// Value given to unsolved points.
    #[must_use]
    pub fn unsolved_value(&self) -> f64 {
        match self.plot_type {
            PlotType::Cactus => self.timeout * CACTUS_UNSOLVED_FACTOR,
            PlotType::Scatter => self.timeout,
        }
    }

    /// Label shown for a series, after replacements.
    #[must_use]
    pub fn display_label<'a>(&'a self, label: &'a str) -> &'a str {
        self.repls
            .as_ref()
            .and_then(|repls| repls.get(label))
            .map_or(label, String::as_str)
    }

    /// Whether a series with this (original) label is kept.
    #[must_use]
    pub fn keeps(&self, label: &str) -> bool {
        self.only
            .as_ref()
            .is_none_or(|only| only.iter().any(|name| name == label))
    }
}

/// Shape of a defaults file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsFile {
    #[serde(default)]
    pub settings: PlotOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_file_ignores_renderer_settings() {
        let text = r#"{
            "settings": {
                "timeout": 1800,
                "font": "times",
                "legend": ["program", "prog_args"],
                "plot_type": "scatter",
                "y_min": 0.1
            },
            "cactus_linestyle": []
        }"#;
        let defaults: DefaultsFile = serde_json::from_str(text).expect("defaults");
        let options = defaults.settings;
        assert!((options.timeout - 1800.0).abs() < f64::EPSILON);
        assert_eq!(options.key, "rtime");
        assert_eq!(options.plot_type, PlotType::Scatter);
        assert_eq!(options.legend.keys(), ["program", "prog_args"]);
    }

    #[test]
    fn test_vbs_specs_keep_document_order() {
        let specs: VbsSpecs =
            serde_json::from_str(r#"{"zeta": "all", "alpha": ["a", "b"]}"#).expect("specs");
        let names = specs.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(specs.0[0].selection, ToolSelection::All);

        let text = serde_json::to_string(&specs).expect("serialize");
        assert_eq!(text, r#"{"zeta":"all","alpha":["a","b"]}"#);
    }

    #[test]
    fn test_floor_depends_on_plot_type() {
        let mut options = PlotOptions::default();
        assert!((options.floor() - CACTUS_FLOOR).abs() < f64::EPSILON);

        options.plot_type = PlotType::Scatter;
        options.y_min = 0.5;
        assert!((options.floor() - 0.5).abs() < f64::EPSILON);

        options.x_min = Some(2.0);
        assert!((options.floor() - 2.0).abs() < f64::EPSILON);

        options.x_min = Some(0.0);
        assert!((options.floor() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unsolved_value_depends_on_plot_type() {
        let mut options = PlotOptions {
            timeout: 10.0,
            ..PlotOptions::default()
        };
        assert!((options.unsolved_value() - 100.0).abs() < f64::EPSILON);
        options.plot_type = PlotType::Scatter;
        assert!((options.unsolved_value() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_plot_type_from_str() {
        assert_eq!("cactus".parse::<PlotType>().ok(), Some(PlotType::Cactus));
        assert_eq!("Scatter".parse::<PlotType>().ok(), Some(PlotType::Scatter));
        assert_eq!(PlotType::Scatter.to_string(), "scatter");
    }
}
