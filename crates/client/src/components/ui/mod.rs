//! UI primitives (Button, Card, Field, Notice)

pub mod button;
pub mod card;
pub mod field;
pub mod notice;

pub use button::*;
pub use card::*;
pub use field::*;
pub use notice::*;
