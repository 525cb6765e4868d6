mod ask;
mod health;
mod image;
mod index;
mod metrics;
mod notify;
mod pdf;

pub use ask::ask_handler;
pub use health::health_handler;
pub use image::image_handler;
pub use index::index_handler;
pub use metrics::metrics_handler;
pub use notify::notify_handler;
pub use pdf::pdf_handler;
