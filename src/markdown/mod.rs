//! Line-oriented markdown helpers.
//!
//! Only the conventions used by spec-kit documents are recognized: ATX
//! headings, fenced code blocks (so headings inside them are ignored), and
//! plain line counting. There is no document tree.

mod heading;
mod section;
mod truncate;

pub use heading::{parse_heading, scan_lines, Heading, ScannedLine};
pub use section::{
    extract, extract_section, find_section, ExtractedSection, RawSection, SectionQuery,
};
pub use truncate::{line_count, truncate_lines, truncation_marker, Truncated};
