mod config;
pub use config::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod export;
pub use export::*;

mod filename;
pub use filename::*;

mod measure;
pub use measure::*;

mod pack;
pub use pack::*;

mod render;
pub use render::*;
