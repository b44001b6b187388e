//! Core library for `crewcolor`.
//!
//! Holds the fixed color palette and the color board: the member count and
//! one color per member, persisted as independent keys through a
//! `crewcolor-storage` backend. Knows nothing about HTTP or templates.

pub mod board;
pub mod error;
pub mod palette;
