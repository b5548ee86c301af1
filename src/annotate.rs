//! Per-image text resolution.
//!
//! Both backends resolve every label and axis-label pair up front, before
//! any pixel is drawn or any cell is created, so an out-of-range index fails
//! the whole render without partial output.

use crate::config::RenderConfig;
use crate::error::Result;

/// Text attached to one image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Badge text, `None` when labels are off or the text is empty.
    pub label: Option<String>,
    /// `(x, y)` axis labels, `None` when axes are off.
    pub axis_labels: Option<(String, String)>,
}

impl Annotation {
    pub fn resolve(config: &RenderConfig, index: usize) -> Result<Self> {
        Ok(Self {
            label: config.resolve_label(index)?,
            axis_labels: config.resolve_axis_labels(index)?,
        })
    }
}

/// Annotations for images `0..count`.
pub fn resolve_all(config: &RenderConfig, count: usize) -> Result<Vec<Annotation>> {
    (0..count).map(|i| Annotation::resolve(config, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxisLabels;
    use crate::error::ComposeError;

    #[test]
    fn resolves_in_order() {
        let config = RenderConfig::builder()
            .label_source("latin_upper")
            .axes(true)
            .axis_labels(AxisLabels::global("t", "v"))
            .build()
            .unwrap();
        let all = resolve_all(&config, 3).unwrap();
        assert_eq!(all[2].label.as_deref(), Some("C"));
        assert_eq!(all[0].axis_labels, Some(("t".to_string(), "v".to_string())));
    }

    #[test]
    fn short_label_list_fails_up_front() {
        let config = RenderConfig::builder()
            .label_source(vec!["a".to_string(), "b".to_string()])
            .build()
            .unwrap();
        let err = resolve_all(&config, 3).unwrap_err();
        assert!(matches!(err, ComposeError::IndexOutOfRange { what: "label", index: 2, .. }));
    }

    #[test]
    fn disabled_yields_nothing() {
        let config = RenderConfig::builder().label(false).build().unwrap();
        let all = resolve_all(&config, 2).unwrap();
        assert!(all.iter().all(|a| a.label.is_none() && a.axis_labels.is_none()));
    }
}
