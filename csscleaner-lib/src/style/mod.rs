pub mod discard;
pub mod duplicates;
pub mod merge;
pub mod ordering;
pub mod owned_css;
pub mod reconcile;
