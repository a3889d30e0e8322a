//! Wire and domain types shared by the entity client and the tracker UI.

pub mod domain;
pub mod error;
pub mod protocol;
