//! HTTP adapters - the public redirect surface.

pub mod redirect;

pub use redirect::{redirect_router, RedirectAppState};
