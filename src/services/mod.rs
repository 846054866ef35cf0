// Mediamarks services
// Media connectors that enrich URLs from providers, and the settings engine.

pub mod flickr_connector;
pub mod media_connector;
pub mod settings_engine;
pub mod vimeo_connector;
