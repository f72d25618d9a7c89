use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreName {
    pub name: String,
}

/// Genre list as sent by the upstream
///
/// Depending on the storage path the list arrives either already decoded or
/// as a JSON document embedded in a string. Both shapes are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Genres {
    List(Vec<GenreName>),
    Encoded(String),
}

impl Genres {
    /// Comma-separated genre names.
    ///
    /// An encoded list that fails to parse is returned verbatim.
    pub fn display_names(&self) -> String {
        match self {
            Genres::List(genres) => join_names(genres),
            Genres::Encoded(raw) => match serde_json::from_str::<Vec<GenreName>>(raw) {
                Ok(genres) => join_names(&genres),
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        genres = %raw,
                        "Unparseable genre list, showing raw value"
                    );
                    raw.clone()
                }
            },
        }
    }
}

fn join_names(genres: &[GenreName]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
