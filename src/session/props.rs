//! Configuration snapshot of a tree session.

use crate::error::PhyloError;
use crate::layout::{DrawingArea, Projection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// Default fill colour of leaves without a style.
pub const DEFAULT_FILL_COLOUR: &str = "#222222";

/// Display style of one leaf, keyed by leaf id in [TreeProps::styles].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeafStyle {
    /// Display label, the leaf id if `None`
    pub label: Option<String>,
    /// CSS colour, the default fill if `None`
    #[serde(alias = "fill_colour", alias = "fillColor")]
    pub fill_colour: Option<String>,
}

impl LeafStyle {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_fill_colour(mut self, colour: impl Into<String>) -> Self {
        self.fill_colour = Some(colour.into());
        self
    }
}

/// Immutable configuration snapshot of a [TreeSession](crate::session::TreeSession).
///
/// Collection fields are reference counted so that the pipeline can tell
/// an untouched collection from a replaced one by identity. Every `with_*`
/// method returns a new snapshot; only the touched field gets a new
/// identity.
///
/// # Configuration
/// * [`with_projection`](Self::with_projection) - Layout projection (default rectangular)
/// * [`with_align_labels`](Self::with_align_labels) - Bounds for aligned leaf labels
/// * [`with_branch_zoom`](Self::with_branch_zoom), [`with_step_zoom`](Self::with_step_zoom)
///   - Zoom levels, scale factor `2^zoom`
/// * [`with_drawing_area`](Self::with_drawing_area) - Target size in drawing units
/// * [`with_root_id`](Self::with_root_id) - Show only the subtree of this node
/// * [`with_rotated_ids`](Self::with_rotated_ids), [`with_collapsed_ids`](Self::with_collapsed_ids)
/// * [`with_styles`](Self::with_styles), [`with_fill_colour`](Self::with_fill_colour)
///
/// # Example
/// ```
/// use phylograph::layout::Projection;
/// use phylograph::session::TreeProps;
///
/// let props = TreeProps::from_json(r#"{ "type": "cr", "branchZoom": 1, "collapsedIds": ["5"] }"#).unwrap();
/// assert_eq!(props.projection, Projection::Circular);
/// assert_eq!(props.branch_zoom, 1.0);
/// assert_eq!(&*props.collapsed_ids, ["5".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeProps {
    #[serde(alias = "type", alias = "treeType")]
    pub projection: Projection,
    #[serde(alias = "alignLeafLabels")]
    pub align_labels: bool,
    pub branch_zoom: f64,
    pub step_zoom: f64,
    #[serde(alias = "size")]
    pub drawing_area: DrawingArea,
    pub root_id: Option<String>,
    pub rotated_ids: Rc<[String]>,
    pub collapsed_ids: Rc<[String]>,
    pub styles: Rc<HashMap<String, LeafStyle>>,
    #[serde(alias = "fillColor")]
    pub fill_colour: String,
}

impl Default for TreeProps {
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            align_labels: false,
            branch_zoom: 0.0,
            step_zoom: 0.0,
            drawing_area: DrawingArea::default(),
            root_id: None,
            rotated_ids: Rc::from(Vec::new()),
            collapsed_ids: Rc::from(Vec::new()),
            styles: Rc::default(),
            fill_colour: DEFAULT_FILL_COLOUR.to_string(),
        }
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl TreeProps {
    /// Decodes a (partial) JSON configuration; missing fields take their
    /// defaults.
    ///
    /// # Errors
    /// [PhyloError::InvalidConfig] if the JSON is malformed or a field has
    /// the wrong type.
    pub fn from_json(json: &str) -> Result<Self, PhyloError> {
        serde_json::from_str(json).map_err(|e| PhyloError::InvalidConfig(e.to_string()))
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_align_labels(mut self, align_labels: bool) -> Self {
        self.align_labels = align_labels;
        self
    }

    pub fn with_branch_zoom(mut self, zoom: f64) -> Self {
        self.branch_zoom = zoom;
        self
    }

    pub fn with_step_zoom(mut self, zoom: f64) -> Self {
        self.step_zoom = zoom;
        self
    }

    pub fn with_drawing_area(mut self, width: f64, height: f64) -> Self {
        self.drawing_area = DrawingArea::new(width, height);
        self
    }

    /// Shows only the subtree of the node `root_id`.
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    /// Shows the whole tree again.
    pub fn without_root_id(mut self) -> Self {
        self.root_id = None;
        self
    }

    pub fn with_rotated_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rotated_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_collapsed_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collapsed_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_styles(mut self, styles: HashMap<String, LeafStyle>) -> Self {
        self.styles = Rc::new(styles);
        self
    }

    /// Sets the style of a single leaf, keeping the others.
    pub fn with_style(mut self, id: impl Into<String>, style: LeafStyle) -> Self {
        let mut styles = (*self.styles).clone();
        styles.insert(id.into(), style);
        self.styles = Rc::new(styles);
        self
    }

    pub fn with_fill_colour(mut self, colour: impl Into<String>) -> Self {
        self.fill_colour = colour.into();
        self
    }
}
