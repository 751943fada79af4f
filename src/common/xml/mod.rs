//! XML text helpers shared by the markup writers.

mod escape;

pub use escape::{append_encoded, escape_xml_attr};
