mod encode;
mod path;
mod substitute;
mod template;

pub use encode::EncodingContext;
pub use path::{parse_value_path, PathError, PathSegment, ValuePath};
pub use substitute::{substitute, unresolved_names};
pub use template::{is_valid_variable_name, parse_template, Segment, Template};
