#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street address normalization and listing URL matching.
//!
//! Listing URLs found through a web search are frequently for the wrong
//! property (a neighbouring house, a different unit, the same street in
//! another city). This crate decides whether a candidate listing URL's path
//! actually encodes a given street address:
//!
//! 1. [`street_part`] isolates the street portion of a full address.
//! 2. [`normalize`] reduces it to lowercase alphanumeric tokens.
//! 3. [`matches`] (or [`AddressMatcher::matches`]) compares those tokens
//!    against the URL path.
//!
//! Everything here is pure and total: malformed input of any kind simply
//! produces a negative verdict.

pub mod matcher;
pub mod normalize;

pub use matcher::{AddressMatcher, DEFAULT_TRUSTED_PREFIX, MatchKind, matches, path_tokens};
pub use normalize::{NormalizedAddress, ROAD_SUFFIXES, is_road_suffix, normalize, street_part};
