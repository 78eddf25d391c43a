mod graph;
mod load;
mod parse;

pub use graph::{Occupation, OccupationData, SimilarityLink};
pub use load::load_occupation_data;
