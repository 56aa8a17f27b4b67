mod dates;
mod error;
mod options;
mod parser;
mod spec;
mod value;

pub use dates::{format_date, parse_date, today};
pub use error::{DefinitionError, FieldError};
pub use options::{
    OptionEntry, OptionGroup, OptionItem, find_option, flatten_options, normalize,
};
pub use parser::{FieldDefinition, FormDefinition, parse_form_definition};
pub use spec::{BindingMode, DateMode, FieldSpec, Variant};
pub use value::{ResolvedValue, ValueShape};
