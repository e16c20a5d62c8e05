//! Genre and author types.

use crate::ids::{AuthorId, GenreId};
use serde::{Deserialize, Serialize};

/// Maximum number of genres a game can carry, and a filter can select.
pub const MAX_GENRES_PER_GAME: usize = 5;

/// A game genre such as "Strategy" or "Party".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

impl Genre {
    pub fn new(id: impl Into<GenreId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Look up a genre id by exact name.
    pub fn find_id(genres: &[Genre], name: &str) -> Option<GenreId> {
        genres.iter().find(|g| g.name == name).map(|g| g.id)
    }
}

/// A game designer or publisher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_id_is_exact() {
        let genres = vec![Genre::new(1, "Strategy"), Genre::new(2, "Party")];
        assert_eq!(Genre::find_id(&genres, "Party"), Some(GenreId::new(2)));
        assert_eq!(Genre::find_id(&genres, "party"), None);
        assert_eq!(Genre::find_id(&genres, "Cooperative"), None);
    }
}
