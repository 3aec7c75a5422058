//! Model module: species, the classifier capability and the registry that
//! owns one classifier per species.

pub mod classifier;
pub mod registry;
pub mod species;

pub use classifier::{Classifier, OnnxClassifier};
pub use registry::{ModelRegistry, SharedClassifier};
pub use species::Species;
