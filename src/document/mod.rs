//! Diagram documents: parsing, stroke enumeration and output assembly.

/// Overlay layers and per-variant documents.
pub mod assemble;
/// Stroke diagrams and cleanup of generated elements.
pub mod diagram;
/// Owned XML tree.
pub mod xml;
