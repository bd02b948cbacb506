// DBF decoding, the in-memory table model, and error modeling.
pub mod dbf;
pub mod error;
pub mod table;
