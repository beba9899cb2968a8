pub mod invoker;
pub mod output_writer;
pub mod validator;

pub use invoker::{ExtractionCommand, ExtractionInvoker, ExtractionOutput};
pub use output_writer::{IdlWriter, BANNER};
pub use validator::validate_extracted_text;
