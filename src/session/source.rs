//! Tree sources.

use crate::error::PhyloError;
use crate::model::{NodeData, RawTree};
use crate::newick;
use serde::{Deserialize, Serialize};

/// Input of a [TreeSession](crate::session::TreeSession).
///
/// Serialised as the envelope `{ "type": "newick" | "biojs", "data": ... }`.
///
/// # Example
/// ```
/// use phylograph::session::Source;
///
/// let source = Source::from_json(r#"{ "type": "newick", "data": "(A,B);" }"#).unwrap();
/// assert_eq!(source, Source::from("(A,B);"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Source {
    /// Newick text
    Newick(String),
    /// A pre-parsed nested tree
    #[serde(rename = "biojs", alias = "graph")]
    Graph(NodeData),
}

impl Source {
    /// Decodes a JSON source envelope.
    ///
    /// # Errors
    /// [PhyloError::InvalidSource] if the JSON is malformed or of an unknown type.
    pub fn from_json(json: &str) -> Result<Self, PhyloError> {
        serde_json::from_str(json).map_err(|e| PhyloError::InvalidSource(e.to_string()))
    }

    /// Parses (Newick) or converts (graph) this source into a raw tree.
    ///
    /// # Errors
    /// [PhyloError::Parse] if the Newick text is invalid.
    pub fn to_raw(&self) -> Result<RawTree, PhyloError> {
        match self {
            Source::Newick(text) => Ok(newick::parse_str(text)?),
            Source::Graph(data) => Ok(RawTree::from_node_data(data)),
        }
    }
}

impl From<&str> for Source {
    fn from(newick: &str) -> Self {
        Source::Newick(newick.to_string())
    }
}

impl From<String> for Source {
    fn from(newick: String) -> Self {
        Source::Newick(newick)
    }
}

impl From<NodeData> for Source {
    fn from(data: NodeData) -> Self {
        Source::Graph(data)
    }
}
