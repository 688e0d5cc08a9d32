pub mod coordinate;

pub use coordinate::{classifier_eq, Coordinate, DeclaredDependency};
