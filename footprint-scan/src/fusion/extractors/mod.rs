// Signal Extractors - Independent Pairwise Comparators
//
// Five signals, each reducing a pair of profile attributes to a 0.0-1.0
// similarity: username, avatar, bio, stylometry, links.
// Only the avatar signal touches the network.

pub mod avatar;
pub mod bio;
pub mod embedding;
pub mod links;
pub mod stylometry;
pub mod username;

pub use avatar::{avatar_similarity, AvatarCache, AvatarHash, AvatarHasher};
pub use bio::{bio_similarity, EmbeddingError, HashedEmbedder, TextEmbedder};
pub use embedding::load_embedder;
pub use links::link_overlap;
pub use stylometry::stylometry_similarity;
pub use username::{normalize_username, username_similarity};
