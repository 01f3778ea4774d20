//! Task documents: the data model and the Task Block Parser.

pub mod fields;
pub mod parser;
pub mod priority;
pub mod result;
pub mod task;

pub use fields::{classify_line, BlockLine, FieldLabel, FieldValue};
pub use parser::{parse_tasks, parse_tasks_file, spec_name_from_path};
pub use priority::Priority;
pub use result::{ParseResult, ParseWarning};
pub use task::{AcceptanceCriterion, Task, DONE_GLYPH, NO_DEPENDENCIES, UNASSIGNED_PHASE};
