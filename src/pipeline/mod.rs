//! Pipeline stages for image-batch-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different delivery sink) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! select ──▶ prepare ──▶ layout ──▶ compose ──▶ sink
//! (filter,   (decode,    (fit to    (page ops:  (serialise,
//!  order)     downscale)  page)      image+text) deliver)
//! ```
//!
//! 1. [`select`]  — drop unsupported candidates, order the rest
//!    deterministically
//! 2. [`prepare`] — decode one image, apply the size guard, downscale and
//!    re-encode at the configured quality; runs in `spawn_blocking` because
//!    decoding is CPU-bound
//! 3. [`layout`]  — compute the centered, aspect-preserving placement
//!    rectangle inside the printable area
//! 4. [`compose`] — build the page's drawing operations: placed image,
//!    caption, page-number footer
//! 5. [`sink`]    — serialise the finished document once and hand the bytes
//!    to a delivery mechanism

pub mod compose;
pub mod layout;
pub mod prepare;
pub mod select;
pub mod sink;
