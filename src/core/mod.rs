// Core modules implementing schema loading, object modeling, document
// conversion, and error modeling.
pub mod doc;
pub mod error;
pub mod object;
pub mod rep;
pub mod schema;
