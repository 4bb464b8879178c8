// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network-facing implementations of the pluginwatch capability traits.
//!
//! - [`HttpLinkProbe`]: bounded-time GET for arbitrary homepage links.
//! - [`GithubClient`]: repository metadata, public pages, and CI markers.
//! - [`BannerDateExtractor`]: archive date from a repository page.

pub mod github;
pub mod probe;
pub mod scrape;

pub use github::GithubClient;
pub use probe::{DEFAULT_TIMEOUT, HttpLinkProbe};
pub use scrape::BannerDateExtractor;
