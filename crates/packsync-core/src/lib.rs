mod entry;
mod manifest;
mod selector;

pub use entry::ModEntry;
pub use manifest::BuildManifest;
pub use selector::BuildSelector;
