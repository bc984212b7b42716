//! Service layer for business logic
//!
//! Handlers stay thin and delegate here:
//! - [`UploadService`] stores originals and registers them
//! - [`CompositionService`] draws the greeting and writes the JPEG
//! - [`RetentionSweeper`] purges expired files on a cron schedule
//!
//! Services are cheap to clone and share their state through the
//! [`ImageRegistry`] and the sandboxed storage directory.

pub mod composition;
pub mod greeting_template;
pub mod image_registry;
pub mod overlay_font;
pub mod retention_sweeper;
pub mod upload;

pub use composition::{CompositionService, TextStyle};
pub use greeting_template::GreetingTemplate;
pub use image_registry::ImageRegistry;
pub use overlay_font::OverlayFont;
pub use retention_sweeper::RetentionSweeper;
pub use upload::UploadService;
