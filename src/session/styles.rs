//! Leaf styles resolved against a positioned graph.

use crate::model::NodeIndex;
use crate::session::colour::{ColourCache, Rgba};
use crate::session::graph::PositionedGraph;
use crate::session::props::LeafStyle;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;

/// Display attributes of one visible leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledLeaf {
    pub index: NodeIndex,
    /// Style label, or the leaf id
    pub label: String,
    pub fill: Rgba,
}

/// A scaled graph together with the resolved style of every visible leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledGraph {
    graph: Rc<PositionedGraph>,
    leaves: Vec<StyledLeaf>,
}

impl StyledGraph {
    /// The scaled graph the styles apply to.
    pub fn graph(&self) -> &PositionedGraph {
        &self.graph
    }

    /// Styled visible leaves, in pre-order.
    pub fn leaves(&self) -> &[StyledLeaf] {
        &self.leaves
    }

    /// Style of the leaf with the given id, if visible.
    pub fn leaf(&self, id: &str) -> Option<&StyledLeaf> {
        let index = self.graph.tree().find(id)?;
        self.leaves.iter().find(|leaf| leaf.index == index)
    }
}

/// Resolves label and fill colour of every visible leaf of `graph`.
///
/// Colours go through `cache`; unparseable colours (style or default) fall
/// back to the default fill, or to opaque black if that is unparseable too,
/// with a warning.
pub fn apply_styles(
    graph: Rc<PositionedGraph>,
    styles: &HashMap<String, LeafStyle>,
    fill_colour: &str,
    cache: &mut ColourCache,
) -> StyledGraph {
    let default_fill = resolve(cache, fill_colour, Rgba::BLACK);

    let leaves = graph
        .leaves()
        .iter()
        .map(|&index| {
            let node = graph.tree().node(index);
            let style = styles.get(node.id());
            let label = style
                .and_then(|s| s.label.clone())
                .unwrap_or_else(|| node.id().to_string());
            let fill = match style.and_then(|s| s.fill_colour.as_deref()) {
                Some(colour) => resolve(cache, colour, default_fill),
                None => default_fill,
            };
            StyledLeaf { index, label, fill }
        })
        .collect();

    StyledGraph { graph, leaves }
}

fn resolve(cache: &mut ColourCache, colour: &str, fallback: Rgba) -> Rgba {
    let (parsed, parsed_now) = cache.resolve(colour);
    match parsed {
        Some(rgba) => rgba,
        None => {
            if parsed_now {
                warn!(colour, "unparseable colour, using fallback");
            }
            fallback
        }
    }
}
