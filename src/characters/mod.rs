//! Character profiles - stored stat blocks combatants are created from

mod profile;
mod store;

pub use profile::CharacterProfile;
pub use store::CharacterStore;
