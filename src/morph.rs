//! Morphological tags and tagset conversion.
//!
//! Every corpus ships morphology in its own notation. This module normalizes
//! them all into one canonical 10-slot [`tag::Tag`] so that annotation queries
//! can be matched uniformly across corpora.
//!
//! # Modules
//!
//! - [`tag`] - The canonical tag and its merge/diff/wildcard algebra
//! - [`tagset`] - The [`tagset::Tagset`] conversion trait and ambiguity expansion
//! - [`positional`] - 9-position treebank codes (`v3spia---`)
//! - [`leipzig`] - Leipzig interlinear glosses (`GEN.PL`)
//! - [`features`] - UD-style feature bundles (`NOUN|Case=Gen|Number=Plur`)
//! - [`descriptive`] - Descriptive analyses (`noun masc/fem gen pl`)
//! - [`key`] - Index keys for lemmas and lemma-linked annotations

pub mod descriptive;
pub mod features;
pub mod key;
pub mod leipzig;
pub mod positional;
pub mod tag;
pub mod tagset;
