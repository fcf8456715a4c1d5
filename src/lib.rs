//! The library code for the `seihon` static site generator. A build is one
//! linear pass over a book-style project:
//!
//! 1. Preparing the output tree and staging static assets ([`crate::assets`])
//! 2. Discovering chapters from the source directories ([`crate::chapter`])
//! 3. Rendering each chapter and the landing page to disk ([`crate::write`])
//!
//! Rendering a chapter is itself a small pipeline: markdown becomes an HTML
//! fragment ([`crate::markdown`]), `.md` cross-references in the fragment are
//! rewritten to their published `.html` names ([`crate::links`]), and the
//! result is spliced into the shared page template. [`crate::build`] stitches
//! the steps together; everything runs sequentially, so a failed run aborts
//! at the first error.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod assets;
pub mod build;
pub mod chapter;
pub mod config;
pub mod htmlrenderer;
pub mod links;
pub mod logger;
pub mod markdown;
pub mod write;
