mod atividade_model;
mod blob_model;

pub use atividade_model::*;
pub use blob_model::*;
