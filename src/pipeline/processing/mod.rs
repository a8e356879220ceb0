// Pipeline processing: record cleaning and service extraction

pub mod normalize;
