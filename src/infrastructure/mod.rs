pub mod dataset;
pub mod logging;
pub mod model_store;
pub mod report_writer;

pub use dataset::LoanDataset;
pub use model_store::ModelStore;
pub use report_writer::ReportWriter;
