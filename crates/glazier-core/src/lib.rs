#![forbid(unsafe_code)]

//! Core: normalized frame geometry and physical unit conversion.
//!
//! # Role in Glazier
//! `glazier-core` is the numeric floor of the workspace. Every section of a
//! window frame is described by a [`Rect`] in normalized coordinates relative
//! to the whole frame, and every physical measurement is derived from those
//! fractions by a [`FrameSize`] in millimeters.
//!
//! # How it fits in the system
//! `glazier-layout` builds the section tree on top of these primitives and
//! `glazier-runtime` drives the tree through an editing session. Nothing in
//! this crate knows about sashes, catalogs or history.

pub mod geometry;
pub mod units;

pub use geometry::{Axis, Point, Rect, TILING_EPSILON};
pub use units::{FrameSize, fraction_to_mm, mm_to_fraction, round_mm};
