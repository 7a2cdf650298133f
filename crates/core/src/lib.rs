pub mod config;
pub mod value;

pub use config::load_dotenv;
pub use value::*;
