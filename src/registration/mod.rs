//! Event registration forms: building, filling in, reviewing and exporting.

pub mod aggregator;
pub mod builder;
pub mod drafts;
pub mod export;
pub mod renderer;

pub use aggregator::{aggregate, RegistrationTable};
pub use builder::FormSchemaBuilder;
pub use drafts::{DraftEdit, DraftStore, DraftView};
pub use export::{export_filename, to_csv};
pub use renderer::{FormView, RegistrationForm};
