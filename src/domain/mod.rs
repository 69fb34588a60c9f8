pub mod card;
pub mod deck;
pub mod review;
pub mod session;

pub use card::{Card, NewCard};
pub use deck::{Deck, DeckTheme, NewDeck};
pub use review::{Rating, ReviewForm};
pub use session::{StudySession, UserStats};

/// Generate an opaque record id (128 random bits, hex encoded)
pub fn new_id() -> String {
  hex::encode(rand::random::<[u8; 16]>())
}
