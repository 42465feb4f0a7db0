mod bridge;
mod host;

pub use host::RhaiHost;
