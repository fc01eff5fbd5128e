//! Search provider implementations.

mod civitai;
mod iconify;

pub use civitai::Civitai;
pub use iconify::Iconify;

pub(crate) use iconify::ICONIFY_API_ROOT;
