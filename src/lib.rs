//! Bilingual (Spanish/English) content engine for a single-page portfolio.
//!
//! Translation data is loaded into a [`i18n::TranslationStore`], resolved by
//! dot-path through a [`i18n::KeyResolver`], and written into a
//! [`view::ViewPort`] by the renderers in [`render`]. [`site::Site`] ties them
//! together behind one language state.

pub mod config;
pub mod i18n;
pub mod render;
pub mod site;
pub mod view;

pub use site::Site;
