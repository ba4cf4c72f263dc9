//! Core library for tidal-browse-adapter: exposes a TIDAL catalog as a host player's browse
//! tree and hands resolved streams to MPD.
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod playback;
pub mod router;
pub mod service;
pub mod uri;
