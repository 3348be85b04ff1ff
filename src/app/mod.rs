// Application layer: use cases over the pipeline and the record stores

pub mod cleanse_use_case;

pub use cleanse_use_case::CleanseService;
