pub use self::codegen::{generate_code, CodeGenerator};
pub use self::json::export_json;

mod codegen;
mod json;
