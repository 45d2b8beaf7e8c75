pub mod encoder;
pub mod encoding_schema;
pub mod feature_vector;

pub use encoder::FeatureEncoder;
pub use encoding_schema::{CategoricalField, EncodingSchema};
pub use feature_vector::{EncodedFeatureVector, ReindexReport};
