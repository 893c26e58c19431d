//! Menu UI.
//!
//! `menu` holds the engine proper. `menu_surface` is the renderer seam it
//! draws through and `scroll` the smoothing and track math behind the
//! scroll bar.
pub mod menu;
pub mod menu_surface;
pub mod scroll;
