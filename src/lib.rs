pub mod assets;
pub mod config;
pub mod logger;
pub mod meta;
pub mod pool;
pub mod refs;
pub mod results;
pub mod text;
pub mod util;
