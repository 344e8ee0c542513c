pub mod console;
pub mod http;
pub mod mock;
pub mod text;
