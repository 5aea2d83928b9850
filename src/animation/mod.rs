/// CSS timing functions.
pub mod ease;
